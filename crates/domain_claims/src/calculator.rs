//! Claim adjudication
//!
//! The calculator folds an admission-ordered claim sequence for one person
//! against one plan. Each claim goes through the same steps:
//!
//! 1. split cost into covered and uncovered (uncovered category, failed SNF
//!    eligibility, days beyond the last tier)
//! 2. apply the deductible, limited by the tightest remaining deductible room
//! 3. apply copay/coinsurance to the rest of the covered cost (lesser-of rule)
//! 4. cap the claim's covered OOP at the tightest remaining OOP-limit room
//! 5. shrink the deductible if the OOP limit cut into it
//!
//! Each session owns its calendar, resolver cache and accumulator; nothing
//! is shared between sessions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, Span};

use core_kernel::{Limit, SessionId};
use domain_benefits::{
    max_covered_days, shared_oop, CostSharingResolver, CostSharingTier, DayRange, NetworkType,
    Plan, ThresholdKind,
};
use crate::accumulator::{ClaimContribution, CostAccumulator, CostBreakdown};
use crate::calendar::Calendar;
use crate::claim::{MedicalClaim, RawClaim};
use crate::error::ClaimError;

/// How raw claims are prepared before adjudication
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationOptions {
    /// Treat every claim as incurred in this network
    #[serde(default)]
    pub force_network: Option<NetworkType>,
    /// Cut stays that run into the next year at January 1
    #[serde(default)]
    pub truncate_at_year_boundary: bool,
}

impl CalculationOptions {
    /// Options used by production runs: everything in-network, no truncation
    pub fn in_network() -> Self {
        Self {
            force_network: Some(NetworkType::InNetwork),
            truncate_at_year_boundary: false,
        }
    }

    /// Normalizes a raw claim under these options
    pub fn prepare(&self, raw: &RawClaim) -> Result<MedicalClaim, ClaimError> {
        let claim = MedicalClaim::normalized(raw, self.force_network);
        if self.truncate_at_year_boundary {
            claim.truncated_at_year_boundary()
        } else {
            Ok(claim)
        }
    }
}

/// Covered part of a claim and the benefit-period days it was covered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CoveredPortion {
    cost: Decimal,
    days: Option<DayRange>,
}

impl CoveredPortion {
    fn none() -> Self {
        Self { cost: Decimal::ZERO, days: None }
    }
}

/// One adjudication session: one person, one plan, one claim sequence
#[derive(Debug)]
pub struct Calculator<'a> {
    session_id: SessionId,
    plan: &'a Plan,
    resolver: CostSharingResolver<'a>,
    calendar: Calendar,
    accumulator: CostAccumulator,
}

impl<'a> Calculator<'a> {
    /// Starts a session
    ///
    /// Fails before any claim is seen if the plan's benefit periods are unsupported.
    pub fn new(plan: &'a Plan) -> Result<Self, ClaimError> {
        Ok(Self {
            session_id: SessionId::new_v7(),
            plan,
            resolver: CostSharingResolver::new(plan),
            calendar: Calendar::new(plan)?,
            accumulator: CostAccumulator::new(),
        })
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Running totals
    pub fn totals(&self) -> &CostBreakdown {
        self.accumulator.totals()
    }

    /// Adjudicates the next claim and folds it into the totals
    pub fn process(&mut self, claim: &MedicalClaim) -> Result<ClaimContribution, ClaimError> {
        let category = &claim.benefit_category;
        let network = claim.network_type;

        if claim.cost <= Decimal::ZERO || category.is_uncategorized() {
            let contribution = ClaimContribution::zero(category.clone(), network);
            self.accumulator.accumulate(&contribution);
            return Ok(contribution);
        }

        let tiers = self.resolver.tiers(category, network);
        let covered = self.covered_portion(claim, tiers.as_deref())?;
        let uncovered_oop = claim.cost - covered.cost;

        let deductibles = self.resolver.threshold(category, ThresholdKind::Deductible)?;
        let deductible = match self.accumulator.deductible_room(&deductibles, network, category) {
            Limit::Unlimited => Decimal::ZERO,
            Limit::Amount(room) => covered.cost.min(room),
        };

        let shared_cost = covered.cost - deductible;
        let shared = match (&tiers, covered.days) {
            (Some(tiers), Some(days)) if shared_cost > Decimal::ZERO => {
                shared_oop(shared_cost, tiers, category, days)
            }
            _ => Decimal::ZERO,
        };

        let oop_limits = self.resolver.threshold(category, ThresholdKind::OopLimit)?;
        let covered_oop = self
            .accumulator
            .oop_room(&oop_limits, network, category)
            .cap(deductible + shared);
        // An OOP limit can cut into what counts toward the deductible
        let deductible = deductible.min(covered_oop);

        let contribution = ClaimContribution {
            category: category.clone(),
            network,
            allowed: claim.cost,
            deductible,
            covered_oop,
            uncovered_oop,
        };

        debug!(
            category = %category,
            network = %network,
            admitted = %claim.admitted,
            cost = %claim.cost,
            covered_cost = %covered.cost,
            deductible = %deductible,
            covered_oop = %covered_oop,
            uncovered_oop = %uncovered_oop,
            "Adjudicated claim"
        );

        self.accumulator.accumulate(&contribution);
        Ok(contribution)
    }

    fn covered_portion(
        &mut self,
        claim: &MedicalClaim,
        tiers: Option<&[CostSharingTier]>,
    ) -> Result<CoveredPortion, ClaimError> {
        let category = &claim.benefit_category;

        let Some(tiers) = tiers else {
            return Ok(CoveredPortion::none());
        };
        if category.is_snf() && !self.calendar.is_snf_claim_covered(claim)? {
            debug!(admitted = %claim.admitted, "SNF claim has no qualifying prior stay");
            return Ok(CoveredPortion::none());
        }

        let max_days = max_covered_days(tiers)?;

        let days = if category.is_part_a() {
            let days = self.calendar.day_counts(claim)?;
            if days.start > days.end {
                return Err(ClaimError::InvertedDayRange {
                    category: category.to_string(),
                    start: days.start,
                    end: days.end,
                });
            }
            days
        } else {
            DayRange::new(0, claim.length_of_stay)
        };

        let portion = match max_days {
            Some(max_days) if max_days < days.start => CoveredPortion::none(),
            Some(max_days) if max_days < days.end => {
                let cost_per_day = claim.cost / Decimal::from(days.len());
                let covered_days = DayRange::new(days.start, max_days);
                CoveredPortion {
                    cost: cost_per_day * Decimal::from(covered_days.len()),
                    days: Some(covered_days),
                }
            }
            _ => CoveredPortion {
                cost: claim.cost,
                days: Some(days),
            },
        };
        Ok(portion)
    }

    /// Ends the session, applying the plan's MSA deposit
    pub fn finish(self) -> CostBreakdown {
        let claims = self.accumulator.claim_count();
        let breakdown = self.accumulator.finalize(self.plan.msa_deposit());

        info!(
            session_id = %self.session_id,
            plan_id = %self.plan.plan_id,
            claims,
            oop = %breakdown.oop,
            allowed = %breakdown.allowed,
            "Adjudication complete"
        );
        breakdown
    }
}

/// Adjudicates claims against a plan using each claim's recorded network
pub fn calculate(claims: &[RawClaim], plan: &Plan) -> Result<CostBreakdown, ClaimError> {
    calculate_with(claims, plan, CalculationOptions::default())
}

/// Adjudicates claims against a plan
///
/// Claims must be in admission order. Any error aborts the whole session.
#[instrument(
    skip(claims, plan),
    fields(plan_id = %plan.plan_id, claims = claims.len(), session_id = tracing::field::Empty)
)]
pub fn calculate_with(
    claims: &[RawClaim],
    plan: &Plan,
    options: CalculationOptions,
) -> Result<CostBreakdown, ClaimError> {
    let mut calculator = Calculator::new(plan)?;
    Span::current().record("session_id", tracing::field::display(calculator.session_id()));

    for raw in claims {
        let claim = options.prepare(raw)?;
        calculator.process(&claim)?;
    }

    Ok(calculator.finish())
}
