//! Part A benefit calendar
//!
//! One calendar serves one adjudication session. For each network it holds a
//! benefit period per Part A category plus the inpatient and SNF
//! qualifying-stay stores, and answers two questions about a claim:
//! whether an SNF stay is covered at all, and which benefit-period days a
//! stay occupies.

use chrono::{Days, NaiveDate};
use tracing::trace;

use core_kernel::temporal::sub_days_saturating;
use core_kernel::QUALIFYING_STAY_WINDOW;
use domain_benefits::{BenefitCategory, DayRange, NetworkType, Plan};
use crate::benefit_period::BenefitPeriod;
use crate::claim::MedicalClaim;
use crate::claim_store::ClaimStore;
use crate::error::ClaimError;

/// Calendar state for a single network
#[derive(Debug, Clone)]
struct NetworkCalendar {
    /// In registration order: inpatient hospital, inpatient mental health, SNF
    periods: Vec<BenefitPeriod>,
    inpatient: ClaimStore,
    snf: ClaimStore,
    required_days: u32,
}

impl NetworkCalendar {
    fn new(plan: &Plan, network: NetworkType) -> Result<Self, ClaimError> {
        let combine = plan.combine_inpatient_day_count();
        let periods = BenefitCategory::part_a()
            .into_iter()
            .map(|category| {
                let kind = plan.benefit_period_kind(&category, network);
                BenefitPeriod::new(kind, category, combine)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let required_days = plan.snf_required_days(network);

        Ok(Self {
            periods,
            inpatient: ClaimStore::inpatient(required_days),
            snf: ClaimStore::snf(required_days),
            required_days,
        })
    }
}

/// Benefit periods and qualifying-stay stores for one session
#[derive(Debug, Clone)]
pub struct Calendar {
    in_network: NetworkCalendar,
    out_network: NetworkCalendar,
    last_part_a_admission: Option<NaiveDate>,
}

impl Calendar {
    /// Builds the calendar for a plan
    ///
    /// Fails if the plan names a benefit period the engine does not support.
    pub fn new(plan: &Plan) -> Result<Self, ClaimError> {
        Ok(Self {
            in_network: NetworkCalendar::new(plan, NetworkType::InNetwork)?,
            out_network: NetworkCalendar::new(plan, NetworkType::OutNetwork)?,
            last_part_a_admission: None,
        })
    }

    fn network(&self, network: NetworkType) -> &NetworkCalendar {
        match network {
            NetworkType::InNetwork => &self.in_network,
            NetworkType::OutNetwork => &self.out_network,
        }
    }

    fn network_mut(&mut self, network: NetworkType) -> &mut NetworkCalendar {
        match network {
            NetworkType::InNetwork => &mut self.in_network,
            NetworkType::OutNetwork => &mut self.out_network,
        }
    }

    /// Benefit periods registered for a network
    pub fn benefit_periods(&self, network: NetworkType) -> &[BenefitPeriod] {
        &self.network(network).periods
    }

    /// Whether an SNF claim follows a qualifying stay
    ///
    /// With no required prior days every SNF stay is covered. Otherwise the
    /// claim needs either an inpatient stay of the required length that
    /// began at least that many days before admission, or an earlier SNF
    /// stay, ending no more than 30 days before admission.
    pub fn is_snf_claim_covered(&self, claim: &MedicalClaim) -> Result<bool, ClaimError> {
        if !claim.benefit_category.is_snf() {
            return Err(ClaimError::invalid_claim(format!(
                "category {} is not a skilled nursing category",
                claim.benefit_category
            )));
        }

        let calendar = self.network(claim.network_type);
        if calendar.required_days == 0 {
            return Ok(true);
        }

        let starting_before =
            sub_days_saturating(claim.admitted, Days::new(u64::from(calendar.required_days)));
        let ending_after = sub_days_saturating(claim.admitted, QUALIFYING_STAY_WINDOW);

        let qualifying_inpatient = match calendar.inpatient.cached() {
            Some(prior) => {
                ending_after <= prior.effective_discharge()? && prior.admitted <= starting_before
            }
            None => false,
        };
        let qualifying_snf = match calendar.snf.cached() {
            Some(prior) => ending_after <= prior.effective_discharge()?,
            None => false,
        };

        Ok(qualifying_inpatient || qualifying_snf)
    }

    /// Benefit-period day range for a claim
    ///
    /// Non-Part-A claims occupy `1..=length_of_stay` and leave the calendar
    /// untouched. A Part A claim is shown to every period of its network and
    /// then offered to the qualifying-stay stores; when more than one period
    /// answers, the last one wins. Part A admissions must not go backwards.
    pub fn day_counts(&mut self, claim: &MedicalClaim) -> Result<DayRange, ClaimError> {
        let category = &claim.benefit_category;
        let mut range = DayRange::new(1, claim.length_of_stay);

        if !category.is_part_a() {
            return Ok(range);
        }

        if category.is_snf() && !self.is_snf_claim_covered(claim)? {
            return Err(ClaimError::UncoveredSnfClaim {
                admitted: claim.admitted,
            });
        }

        if let Some(previous) = self.last_part_a_admission {
            if claim.admitted < previous {
                return Err(ClaimError::AdmissionOrderViolation {
                    previous,
                    admitted: claim.admitted,
                });
            }
        }
        self.last_part_a_admission = Some(claim.admitted);

        let calendar = self.network_mut(claim.network_type);
        for period in calendar.periods.iter_mut() {
            if let Some(days) = period.add_claim(claim)? {
                range = days;
            }
        }

        calendar.inpatient.cache_if_applicable(claim)?;
        calendar.snf.cache_if_applicable(claim)?;

        trace!(
            category = %category,
            network = %claim.network_type,
            start = range.start,
            end = range.end,
            "Counted benefit-period days"
        );
        Ok(range)
    }
}
