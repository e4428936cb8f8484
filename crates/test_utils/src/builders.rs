//! Test Data Builders
//!
//! Provides builder patterns for constructing claims and plans with sensible
//! defaults. Tests specify only the fields they care about.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::PlanId;
use domain_benefits::{
    BenefitCategory, BenefitPeriodKind, CategoryBenefit, CoinsuranceSpec, CopaySpec, CostSharingTier,
    NetworkBenefit, NetworkScope, NetworkType, Plan, PlanThreshold, ThresholdKind,
};
use domain_claims::{MedicalClaim, RawClaim};

use crate::fixtures::DateFixtures;

/// Builder for claim records
///
/// Defaults to a $100 in-network office visit (category 12) on the fixture
/// admission date with a zero-day stay.
#[derive(Debug, Clone)]
pub struct ClaimBuilder {
    admitted: NaiveDate,
    discharged: Option<NaiveDate>,
    benefit_category: Option<BenefitCategory>,
    network_type: Option<NetworkType>,
    length_of_stay: u32,
    cost: Option<Decimal>,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            admitted: DateFixtures::admission(),
            discharged: None,
            benefit_category: Some(BenefitCategory::from("12")),
            network_type: Some(NetworkType::InNetwork),
            length_of_stay: 0,
            cost: Some(dec!(100)),
        }
    }

    /// Inpatient hospital stay
    pub fn hospital_stay(admitted: NaiveDate, length_of_stay: u32) -> Self {
        Self::new()
            .with_category(BenefitCategory::inpatient_hospital())
            .with_admitted(admitted)
            .with_length_of_stay(length_of_stay)
    }

    /// Skilled nursing facility stay
    pub fn snf_stay(admitted: NaiveDate, length_of_stay: u32) -> Self {
        Self::new()
            .with_category(BenefitCategory::skilled_nursing())
            .with_admitted(admitted)
            .with_length_of_stay(length_of_stay)
    }

    pub fn with_admitted(mut self, admitted: NaiveDate) -> Self {
        self.admitted = admitted;
        self
    }

    /// Sets the recorded discharge date; defaults to admission plus length of stay
    pub fn with_discharged(mut self, discharged: NaiveDate) -> Self {
        self.discharged = Some(discharged);
        self
    }

    pub fn with_length_of_stay(mut self, days: u32) -> Self {
        self.length_of_stay = days;
        self
    }

    pub fn with_category(mut self, category: impl Into<BenefitCategory>) -> Self {
        self.benefit_category = Some(category.into());
        self
    }

    pub fn without_category(mut self) -> Self {
        self.benefit_category = None;
        self
    }

    pub fn with_network(mut self, network: NetworkType) -> Self {
        self.network_type = Some(network);
        self
    }

    pub fn without_network(mut self) -> Self {
        self.network_type = None;
        self
    }

    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn without_cost(mut self) -> Self {
        self.cost = None;
        self
    }

    /// Builds the raw claim record
    pub fn build(self) -> RawClaim {
        let discharged = self.discharged.unwrap_or_else(|| {
            self.admitted
                .checked_add_days(Days::new(u64::from(self.length_of_stay)))
                .expect("discharge date in range")
        });

        RawClaim {
            admitted: self.admitted,
            discharged,
            benefit_category: self.benefit_category,
            network_type: self.network_type,
            length_of_stay: self.length_of_stay,
            cost: self.cost,
        }
    }

    /// Builds the claim in its normalized form
    pub fn build_normalized(self) -> MedicalClaim {
        MedicalClaim::normalized(&self.build(), None)
    }
}

/// Per-day copay tier ending on `interval_max`
pub fn per_day_copay(amount: Decimal, interval_max: Option<u32>) -> CostSharingTier {
    CostSharingTier::copay(CopaySpec {
        max: Some(amount),
        per_day: true,
        interval_max,
        ..Default::default()
    })
}

/// Flat copay tier
pub fn flat_copay(amount: Decimal) -> CostSharingTier {
    CostSharingTier::copay(CopaySpec {
        max: Some(amount),
        ..Default::default()
    })
}

/// Coinsurance tier charging `percent` of cost
pub fn coinsurance(percent: Decimal) -> CostSharingTier {
    CostSharingTier::coinsurance(CoinsuranceSpec {
        max: Some(percent),
        ..Default::default()
    })
}

/// Builder for plans
///
/// Starts from a plan with no benefits, so every category is uncovered
/// until configured.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    plan: Plan,
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new("H0001-001-0")
    }
}

impl PlanBuilder {
    pub fn new(plan_id: &str) -> Self {
        Self {
            plan: Plan::new(PlanId::new(plan_id)),
        }
    }

    pub fn with_state(mut self, state_fips: &str) -> Self {
        self.plan.state_fips = Some(state_fips.to_string());
        self
    }

    pub fn with_msa_deposit(mut self, deposit: Decimal) -> Self {
        self.plan.msa_deposit = Some(deposit);
        self
    }

    pub fn combine_inpatient_day_count(mut self, combine: bool) -> Self {
        self.plan.benefits.combine_inpatient_day_count = combine;
        self
    }

    fn threshold(
        mut self,
        kind: ThresholdKind,
        scope: NetworkScope,
        amount: Decimal,
        categories: &[&str],
    ) -> Self {
        let threshold = PlanThreshold::annual(amount, categories.iter().map(|code| BenefitCategory::from(*code)));
        let table = match kind {
            ThresholdKind::Deductible => &mut self.plan.deductibles,
            ThresholdKind::OopLimit => &mut self.plan.oop_limits,
        };
        match scope {
            NetworkScope::Composite => table.composite = Some(threshold),
            NetworkScope::InNetwork => table.in_network = Some(threshold),
            NetworkScope::OutNetwork => table.out_network = Some(threshold),
        }
        self
    }

    /// Plan-wide deductible covering `categories`
    pub fn with_deductible(self, scope: NetworkScope, amount: Decimal, categories: &[&str]) -> Self {
        self.threshold(ThresholdKind::Deductible, scope, amount, categories)
    }

    /// Plan-wide OOP limit covering `categories`
    pub fn with_oop_limit(self, scope: NetworkScope, amount: Decimal, categories: &[&str]) -> Self {
        self.threshold(ThresholdKind::OopLimit, scope, amount, categories)
    }

    pub fn with_category_deductible(mut self, category: &str, amount: Decimal) -> Self {
        self.category_mut(category).deductibles = Some(amount);
        self
    }

    pub fn with_category_oop_limit(mut self, category: &str, amount: Decimal) -> Self {
        self.category_mut(category).oop_limits = Some(amount);
        self
    }

    /// Single-tier cost sharing for a non-Part-A category
    pub fn with_tier(mut self, category: &str, scope: NetworkScope, tier: CostSharingTier) -> Self {
        let benefit = self.network_benefit_mut(category, scope);
        benefit.copay = tier.copay;
        benefit.coinsurance = tier.coinsurance;
        self
    }

    /// Day-interval tiers for a Part A category, keyed by first day
    pub fn with_day_intervals(
        mut self,
        category: &str,
        scope: NetworkScope,
        intervals: &[(u32, CostSharingTier)],
    ) -> Self {
        self.network_benefit_mut(category, scope).day_intervals =
            Some(intervals.iter().copied().collect());
        self
    }

    pub fn with_benefit_period(mut self, category: &str, network: NetworkType, kind: BenefitPeriodKind) -> Self {
        self.network_benefit_mut(category, network.into()).benefit_period = Some(kind);
        self
    }

    /// Prior inpatient days required before SNF stays are covered
    pub fn with_snf_required_days(mut self, network: NetworkType, days: u32) -> Self {
        self.network_benefit_mut(BenefitCategory::SKILLED_NURSING, network.into())
            .required_days = Some(days);
        self
    }

    pub fn build(self) -> Plan {
        self.plan
    }

    fn category_mut(&mut self, category: &str) -> &mut CategoryBenefit {
        self.plan
            .benefits
            .categories
            .entry(BenefitCategory::from(category))
            .or_default()
    }

    fn network_benefit_mut(&mut self, category: &str, scope: NetworkScope) -> &mut NetworkBenefit {
        let benefit = self.category_mut(category);
        let slot = match scope {
            NetworkScope::Composite => &mut benefit.composite,
            NetworkScope::InNetwork => &mut benefit.in_network,
            NetworkScope::OutNetwork => &mut benefit.out_network,
        };
        slot.get_or_insert_with(NetworkBenefit::default)
    }
}
