//! Plan benefit definition
//!
//! A typed view of a canonical benefit-plan document:
//!
//! ```text
//! {
//!   "plan_id": "H1234-001-0",
//!   "msa_deposit": 0,
//!   "deductibles": { "composite": { "amount": 500, "period": 365, "categories": ["12", "25"] } },
//!   "oop_limits":  { "in_network": { "amount": 6700, "period": 365, "categories": [...] } },
//!   "benefits": {
//!     "combine_inpatient_day_count": false,
//!     "categories": {
//!       "25": { "in_network": { "benefit_period": "original_medicare",
//!                               "day_intervals": { "1": {...}, "61": {...} } } },
//!       "12": { "in_network": { "copay": { "max": 20 } }, "oop_limits": 1000 }
//!     }
//!   }
//! }
//! ```
//!
//! Part A categories carry a `day_intervals` table keyed by the first day of
//! each tier; every other category carries a single tier directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use core_kernel::PlanId;
use crate::category::BenefitCategory;

/// Plan-wide thresholds are annual
pub const ANNUAL_PERIOD_DAYS: u32 = 365;

/// Network a claim was incurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    InNetwork,
    OutNetwork,
}

impl NetworkType {
    pub const ALL: [NetworkType; 2] = [NetworkType::InNetwork, NetworkType::OutNetwork];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::InNetwork => "in_network",
            NetworkType::OutNetwork => "out_network",
        }
    }
}

impl Default for NetworkType {
    fn default() -> Self {
        NetworkType::InNetwork
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope a benefit table or threshold is defined at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkScope {
    /// Jointly across in-network and out-of-network spending
    Composite,
    InNetwork,
    OutNetwork,
}

impl From<NetworkType> for NetworkScope {
    fn from(network: NetworkType) -> Self {
        match network {
            NetworkType::InNetwork => NetworkScope::InNetwork,
            NetworkType::OutNetwork => NetworkScope::OutNetwork,
        }
    }
}

impl fmt::Display for NetworkScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkScope::Composite => "composite",
            NetworkScope::InNetwork => "in_network",
            NetworkScope::OutNetwork => "out_network",
        };
        f.write_str(name)
    }
}

/// Threshold families tracked per scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    Deductible,
    OopLimit,
}

impl fmt::Display for ThresholdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdKind::Deductible => f.write_str("deductible"),
            ThresholdKind::OopLimit => f.write_str("oop_limit"),
        }
    }
}

/// How covered days accumulate for a Part A category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BenefitPeriodKind {
    /// Day counts restart with every stay
    PerStay,
    /// Day counts accumulate over the plan year
    Annual,
    /// Day counts accumulate until 60 days pass without a stay
    OriginalMedicare,
    /// A benefit-period name the engine does not know
    Unsupported(String),
}

impl From<String> for BenefitPeriodKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "stay" => BenefitPeriodKind::PerStay,
            "year" => BenefitPeriodKind::Annual,
            "original_medicare" => BenefitPeriodKind::OriginalMedicare,
            _ => BenefitPeriodKind::Unsupported(name),
        }
    }
}

impl From<BenefitPeriodKind> for String {
    fn from(kind: BenefitPeriodKind) -> Self {
        match kind {
            BenefitPeriodKind::PerStay => "stay".to_string(),
            BenefitPeriodKind::Annual => "year".to_string(),
            BenefitPeriodKind::OriginalMedicare => "original_medicare".to_string(),
            BenefitPeriodKind::Unsupported(name) => name,
        }
    }
}

/// Flat or per-day copay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopaySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    /// Whether the amount is charged per day of the tier
    #[serde(default)]
    pub per_day: bool,
    /// Last day of the day interval; absent means open-ended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_max: Option<u32>,
}

impl CopaySpec {
    /// The amount charged: `max` when given, else `min`
    ///
    /// Preferring the maximum over-estimates rather than under-estimates.
    pub fn sharing_value(&self) -> Option<Decimal> {
        self.max.or(self.min)
    }

    /// Copay owed for `days` days in this tier
    pub fn cost_for_days(&self, days: u32) -> Decimal {
        let multiplier = if self.per_day { Decimal::from(days) } else { Decimal::ONE };
        multiplier * self.sharing_value().unwrap_or(Decimal::ZERO)
    }
}

/// Percentage-of-cost coinsurance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinsuranceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_max: Option<u32>,
}

impl CoinsuranceSpec {
    /// The percentage charged: `max` when given, else `min`
    pub fn sharing_value(&self) -> Option<Decimal> {
        self.max.or(self.min)
    }

    /// Share of cost owed as a fraction; an unspecified percentage is 100%
    pub fn rate(&self) -> Decimal {
        self.sharing_value()
            .map_or(Decimal::ONE, |percent| percent / Decimal::ONE_HUNDRED)
    }
}

/// One cost-sharing tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSharingTier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copay: Option<CopaySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinsurance: Option<CoinsuranceSpec>,
}

impl CostSharingTier {
    pub fn copay(copay: CopaySpec) -> Self {
        Self { copay: Some(copay), coinsurance: None }
    }

    pub fn coinsurance(coinsurance: CoinsuranceSpec) -> Self {
        Self { copay: None, coinsurance: Some(coinsurance) }
    }
}

/// Benefits for one category in one network scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkBenefit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copay: Option<CopaySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinsurance: Option<CoinsuranceSpec>,
    /// Part A tiers keyed by the first day of each interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_intervals: Option<BTreeMap<u32, CostSharingTier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefit_period: Option<BenefitPeriodKind>,
    /// Prior inpatient days required before SNF care is covered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_days: Option<u32>,
}

impl NetworkBenefit {
    /// The single tier a non-Part-A category is shared under
    pub fn own_tier(&self) -> CostSharingTier {
        CostSharingTier {
            copay: self.copay,
            coinsurance: self.coinsurance,
        }
    }
}

/// Benefits for one category across network scopes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBenefit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_network: Option<NetworkBenefit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_network: Option<NetworkBenefit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<NetworkBenefit>,
    /// Category-scoped deductible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deductibles: Option<Decimal>,
    /// Category-scoped out-of-pocket limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oop_limits: Option<Decimal>,
}

impl CategoryBenefit {
    pub fn scope(&self, scope: NetworkScope) -> Option<&NetworkBenefit> {
        match scope {
            NetworkScope::Composite => self.composite.as_ref(),
            NetworkScope::InNetwork => self.in_network.as_ref(),
            NetworkScope::OutNetwork => self.out_network.as_ref(),
        }
    }

    pub fn network(&self, network: NetworkType) -> Option<&NetworkBenefit> {
        self.scope(network.into())
    }

    pub fn threshold(&self, kind: ThresholdKind) -> Option<Decimal> {
        match kind {
            ThresholdKind::Deductible => self.deductibles,
            ThresholdKind::OopLimit => self.oop_limits,
        }
    }
}

/// Plan-wide threshold at one scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanThreshold {
    pub amount: Decimal,
    /// Length of the accumulation period in days
    pub period: u32,
    /// Categories whose spending counts toward this threshold
    #[serde(default)]
    pub categories: BTreeSet<BenefitCategory>,
}

impl PlanThreshold {
    /// Creates an annual threshold covering `categories`
    pub fn annual(amount: Decimal, categories: impl IntoIterator<Item = BenefitCategory>) -> Self {
        Self {
            amount,
            period: ANNUAL_PERIOD_DAYS,
            categories: categories.into_iter().collect(),
        }
    }

    pub fn applies_to(&self, category: &BenefitCategory) -> bool {
        self.categories.contains(category)
    }
}

/// Deductibles or OOP limits at the three plan-wide scopes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<PlanThreshold>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_network: Option<PlanThreshold>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_network: Option<PlanThreshold>,
}

impl ThresholdTable {
    pub fn scope(&self, scope: NetworkScope) -> Option<&PlanThreshold> {
        match scope {
            NetworkScope::Composite => self.composite.as_ref(),
            NetworkScope::InNetwork => self.in_network.as_ref(),
            NetworkScope::OutNetwork => self.out_network.as_ref(),
        }
    }
}

/// Category benefit tables plus plan-level day-count rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Benefits {
    /// Whether inpatient categories share one day count
    #[serde(default)]
    pub combine_inpatient_day_count: bool,
    #[serde(default)]
    pub categories: BTreeMap<BenefitCategory, CategoryBenefit>,
}

/// A benefit plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: PlanId,
    /// State the plan is offered in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_fips: Option<String>,
    /// Medical savings account deposit that offsets out-of-pocket spending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msa_deposit: Option<Decimal>,
    #[serde(default)]
    pub deductibles: ThresholdTable,
    #[serde(default)]
    pub oop_limits: ThresholdTable,
    #[serde(default)]
    pub benefits: Benefits,
}

impl Plan {
    /// Creates a plan with no benefits; every category is uncovered
    pub fn new(plan_id: PlanId) -> Self {
        Self {
            plan_id,
            state_fips: None,
            msa_deposit: None,
            deductibles: ThresholdTable::default(),
            oop_limits: ThresholdTable::default(),
            benefits: Benefits::default(),
        }
    }

    pub fn category(&self, category: &BenefitCategory) -> Option<&CategoryBenefit> {
        self.benefits.categories.get(category)
    }

    pub fn thresholds(&self, kind: ThresholdKind) -> &ThresholdTable {
        match kind {
            ThresholdKind::Deductible => &self.deductibles,
            ThresholdKind::OopLimit => &self.oop_limits,
        }
    }

    /// Benefit-period rule for a category in a network
    ///
    /// Only the network's own table is consulted, never the composite one.
    pub fn benefit_period_kind(
        &self,
        category: &BenefitCategory,
        network: NetworkType,
    ) -> Option<&BenefitPeriodKind> {
        self.category(category)
            .and_then(|benefit| benefit.network(network))
            .and_then(|benefit| benefit.benefit_period.as_ref())
    }

    pub fn combine_inpatient_day_count(&self) -> bool {
        self.benefits.combine_inpatient_day_count
    }

    /// Prior inpatient days required for SNF coverage; 0 means none required
    pub fn snf_required_days(&self, network: NetworkType) -> u32 {
        self.category(&BenefitCategory::skilled_nursing())
            .and_then(|benefit| benefit.network(network))
            .and_then(|benefit| benefit.required_days)
            .unwrap_or(0)
    }

    pub fn msa_deposit(&self) -> Decimal {
        self.msa_deposit.unwrap_or(Decimal::ZERO)
    }
}
