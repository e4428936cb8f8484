//! Cost-sharing resolution
//!
//! Answers three questions about a plan for one claim:
//! - which cost-sharing tiers apply to a category in a network
//! - what deductible and out-of-pocket thresholds apply, at every scope
//! - how much of a shared cost the member owes under those tiers
//!
//! Lookups are memoized per resolver. A resolver borrows exactly one plan and
//! lives for one adjudication session, so its cache can never go stale or grow
//! across unrelated sessions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

use core_kernel::Limit;
use crate::category::BenefitCategory;
use crate::error::BenefitError;
use crate::plan::{
    CostSharingTier, NetworkScope, NetworkType, Plan, ThresholdKind, ANNUAL_PERIOD_DAYS,
};

/// An inclusive range of benefit-period days a claim occupies
///
/// Part A claims get their range from the benefit calendar; other claims use
/// `0..=length_of_stay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub start: u32,
    pub end: u32,
}

impl DayRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of days in the range; zero when the range is inverted
    pub fn len(&self) -> u32 {
        self.end.saturating_add(1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A threshold resolved at all four scopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedThresholds {
    pub composite: Limit,
    pub in_network: Limit,
    pub out_network: Limit,
    pub category: Limit,
}

impl ScopedThresholds {
    pub fn unlimited() -> Self {
        Self {
            composite: Limit::Unlimited,
            in_network: Limit::Unlimited,
            out_network: Limit::Unlimited,
            category: Limit::Unlimited,
        }
    }

    pub fn network(&self, network: NetworkType) -> Limit {
        match network {
            NetworkType::InNetwork => self.in_network,
            NetworkType::OutNetwork => self.out_network,
        }
    }

    fn set_scope(&mut self, scope: NetworkScope, limit: Limit) {
        match scope {
            NetworkScope::Composite => self.composite = limit,
            NetworkScope::InNetwork => self.in_network = limit,
            NetworkScope::OutNetwork => self.out_network = limit,
        }
    }
}

/// Session-scoped, memoizing view over one plan's cost sharing
#[derive(Debug)]
pub struct CostSharingResolver<'a> {
    plan: &'a Plan,
    tiers: HashMap<(BenefitCategory, NetworkType), Option<Vec<CostSharingTier>>>,
    thresholds: HashMap<(BenefitCategory, ThresholdKind), ScopedThresholds>,
}

impl<'a> CostSharingResolver<'a> {
    pub fn new(plan: &'a Plan) -> Self {
        Self {
            plan,
            tiers: HashMap::new(),
            thresholds: HashMap::new(),
        }
    }

    pub fn plan(&self) -> &'a Plan {
        self.plan
    }

    /// Ordered cost-sharing tiers, or `None` when the category is uncovered
    pub fn tiers(
        &mut self,
        category: &BenefitCategory,
        network: NetworkType,
    ) -> Option<Vec<CostSharingTier>> {
        let plan = self.plan;
        self.tiers
            .entry((category.clone(), network))
            .or_insert_with(|| lookup_tiers(plan, category, network))
            .clone()
    }

    /// Deductible or OOP-limit thresholds for a category at every scope
    pub fn threshold(
        &mut self,
        category: &BenefitCategory,
        kind: ThresholdKind,
    ) -> Result<ScopedThresholds, BenefitError> {
        let key = (category.clone(), kind);
        if let Some(cached) = self.thresholds.get(&key) {
            return Ok(*cached);
        }
        let resolved = lookup_threshold(self.plan, category, kind)?;
        self.thresholds.insert(key, resolved);
        Ok(resolved)
    }
}

/// Uncached tier lookup
///
/// The network's own table is used when present, otherwise the composite
/// table for the category.
pub fn lookup_tiers(
    plan: &Plan,
    category: &BenefitCategory,
    network: NetworkType,
) -> Option<Vec<CostSharingTier>> {
    let patched = category.patched();
    let benefit = plan.category(&patched)?;

    for scope in [NetworkScope::from(network), NetworkScope::Composite] {
        let Some(network_benefit) = benefit.scope(scope) else {
            continue;
        };

        if patched.is_part_a() {
            if let Some(intervals) = &network_benefit.day_intervals {
                // BTreeMap iteration is already in ascending first-day order
                return Some(intervals.values().copied().collect());
            }
        } else {
            return Some(vec![network_benefit.own_tier()]);
        }
    }

    trace!(category = %patched, network = %network, "Category uncovered");
    None
}

/// Uncached threshold lookup
///
/// A plan-wide threshold applies only to the categories it lists; the
/// category scope comes from the category's own benefit table.
pub fn lookup_threshold(
    plan: &Plan,
    category: &BenefitCategory,
    kind: ThresholdKind,
) -> Result<ScopedThresholds, BenefitError> {
    let patched = category.patched();
    let table = plan.thresholds(kind);
    let mut resolved = ScopedThresholds::unlimited();

    for scope in [NetworkScope::Composite, NetworkScope::InNetwork, NetworkScope::OutNetwork] {
        match table.scope(scope) {
            Some(threshold) if threshold.applies_to(&patched) => {
                if threshold.period != ANNUAL_PERIOD_DAYS {
                    return Err(BenefitError::InvalidThresholdPeriod {
                        kind: kind.to_string(),
                        scope: scope.to_string(),
                        period: threshold.period,
                    });
                }
                resolved.set_scope(scope, Limit::Amount(threshold.amount));
            }
            _ => resolved.set_scope(scope, Limit::Unlimited),
        }
    }

    resolved.category = Limit::from_option(
        plan.category(&patched).and_then(|benefit| benefit.threshold(kind)),
    );

    Ok(resolved)
}

/// Last coverable benefit-period day, from the final tier; `None` is open-ended
///
/// Copay and coinsurance must agree on where coverage stops when both are given.
pub fn max_covered_days(tiers: &[CostSharingTier]) -> Result<Option<u32>, BenefitError> {
    let last = tiers
        .last()
        .ok_or_else(|| BenefitError::validation("cost-sharing tier list is empty"))?;

    // A zero interval end is treated as open-ended
    let copay_max = last.copay.map(|copay| copay.interval_max.filter(|day| *day > 0));
    let coinsurance_max = last
        .coinsurance
        .map(|coinsurance| coinsurance.interval_max.filter(|day| *day > 0));

    match (copay_max, coinsurance_max) {
        (Some(copay), Some(coinsurance)) if copay != coinsurance => {
            Err(BenefitError::IntervalMaxMismatch { copay, coinsurance })
        }
        (Some(copay), _) => Ok(copay),
        (None, Some(coinsurance)) => Ok(coinsurance),
        (None, None) => Ok(None),
    }
}

/// Member share of `shared_cost` under `tiers`
///
/// Part A claims are walked tier by tier over their day range; each tier
/// charges the larger of its coinsurance and copay. Other categories use
/// their single tier. The result never exceeds `shared_cost`.
pub fn shared_oop(
    shared_cost: Decimal,
    tiers: &[CostSharingTier],
    category: &BenefitCategory,
    days: DayRange,
) -> Decimal {
    if shared_cost <= Decimal::ZERO || days.is_empty() {
        return Decimal::ZERO;
    }

    let owed = if category.is_part_a() {
        tiered_shared_cost(shared_cost, tiers, days)
    } else {
        tiers.first().map_or(Decimal::ZERO, |tier| {
            let coinsurance_cost = tier
                .coinsurance
                .map_or(Decimal::ZERO, |coinsurance| coinsurance.rate() * shared_cost);
            let copay_cost = tier
                .copay
                .map_or(Decimal::ZERO, |copay| copay.cost_for_days(days.len()));
            coinsurance_cost.max(copay_cost)
        })
    };

    // Lesser-of rule
    owed.min(shared_cost)
}

#[derive(Clone, Copy)]
enum Share {
    Coinsurance,
    Copay,
}

fn tiered_shared_cost(shared_cost: Decimal, tiers: &[CostSharingTier], days: DayRange) -> Decimal {
    let day_end = u64::from(days.end);
    let cost_per_day = shared_cost / Decimal::from(days.len());

    let mut cost = Decimal::ZERO;
    let mut current_day = u64::from(days.start);

    for tier in tiers {
        let mut best: Option<(Decimal, u64)> = None;

        for share in [Share::Coinsurance, Share::Copay] {
            let interval_max = match share {
                Share::Coinsurance => tier.coinsurance.map(|c| c.interval_max),
                Share::Copay => tier.copay.map(|c| c.interval_max),
            };
            // Share type absent from this tier
            let Some(interval_max) = interval_max else {
                continue;
            };
            // Zero is open-ended, as in max_covered_days, not a tier that ends before day 1
            let interval_max = interval_max.filter(|day| *day > 0).map(u64::from);

            if interval_max.is_some_and(|last_day| current_day > last_day) {
                continue;
            }

            let (days_in_tier, next_day) = match interval_max {
                Some(last_day) if day_end >= last_day => (last_day + 1 - current_day, last_day + 1),
                _ => ((day_end + 1).saturating_sub(current_day), day_end + 1),
            };
            let days_in_tier = u32::try_from(days_in_tier).unwrap_or(u32::MAX);

            let share_cost = match share {
                Share::Coinsurance => {
                    let rate = tier.coinsurance.map_or(Decimal::ONE, |c| c.rate());
                    rate * cost_per_day * Decimal::from(days_in_tier)
                }
                Share::Copay => tier
                    .copay
                    .map_or(Decimal::ZERO, |copay| copay.cost_for_days(days_in_tier)),
            };

            // Ties go to the later share type
            if best.map_or(true, |(best_cost, _)| share_cost >= best_cost) {
                best = Some((share_cost, next_day));
            }
        }

        if let Some((tier_cost, next_day)) = best {
            cost += tier_cost;
            current_day = next_day;
        }

        if current_day > day_end {
            break;
        }
    }

    cost
}
