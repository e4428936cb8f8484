//! Cost accumulation
//!
//! A session folds every claim's contribution into one [`CostAccumulator`].
//! Amounts are tracked at composite scope, per network and per category so
//! that the remaining room under each deductible and OOP limit can be read
//! back before the next claim is adjudicated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{non_negative, Limit};
use domain_benefits::{BenefitCategory, NetworkType, ScopedThresholds};

/// Amounts at composite, network and category scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub composite: Decimal,
    pub in_network: Decimal,
    pub out_network: Decimal,
    pub categories: BTreeMap<BenefitCategory, Decimal>,
}

impl Breakdown {
    pub fn network(&self, network: NetworkType) -> Decimal {
        match network {
            NetworkType::InNetwork => self.in_network,
            NetworkType::OutNetwork => self.out_network,
        }
    }

    pub fn category(&self, category: &BenefitCategory) -> Decimal {
        self.categories.get(category).copied().unwrap_or(Decimal::ZERO)
    }

    fn add(&mut self, network: NetworkType, category: &BenefitCategory, amount: Decimal) {
        self.composite += amount;
        match network {
            NetworkType::InNetwork => self.in_network += amount,
            NetworkType::OutNetwork => self.out_network += amount,
        }
        *self.categories.entry(category.clone()).or_insert(Decimal::ZERO) += amount;
    }

    /// Room left under the tightest of the composite, network and category
    /// thresholds given what this breakdown has already counted
    pub fn room(
        &self,
        thresholds: &ScopedThresholds,
        network: NetworkType,
        category: &BenefitCategory,
    ) -> Limit {
        thresholds
            .composite
            .remaining(self.composite)
            .lesser(thresholds.network(network).remaining(self.network(network)))
            .lesser(thresholds.category.remaining(self.category(category)))
    }
}

/// Result of adjudicating a claim sequence against one plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Member out-of-pocket cost
    ///
    /// While accumulating this is the covered OOP only; once finalized it
    /// includes uncovered cost net of any MSA deposit, never below zero.
    pub oop: Decimal,
    pub allowed: Decimal,
    pub uncovered: Decimal,
    /// Covered OOP; counts toward OOP limits
    pub covered_breakdown: Breakdown,
    pub uncovered_breakdown: Breakdown,
    /// Portion of covered OOP applied to deductibles
    pub deductible_breakdown: Breakdown,
}

/// What one claim adds to the running totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimContribution {
    pub category: BenefitCategory,
    pub network: NetworkType,
    pub allowed: Decimal,
    pub deductible: Decimal,
    pub covered_oop: Decimal,
    pub uncovered_oop: Decimal,
}

impl ClaimContribution {
    /// A claim that adds nothing (zero cost or uncategorized)
    pub fn zero(category: BenefitCategory, network: NetworkType) -> Self {
        Self {
            category,
            network,
            allowed: Decimal::ZERO,
            deductible: Decimal::ZERO,
            covered_oop: Decimal::ZERO,
            uncovered_oop: Decimal::ZERO,
        }
    }
}

/// Running totals for one session
#[derive(Debug, Clone, Default)]
pub struct CostAccumulator {
    totals: CostBreakdown,
    claims: usize,
}

impl CostAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals so far
    pub fn totals(&self) -> &CostBreakdown {
        &self.totals
    }

    /// Number of claims accumulated
    pub fn claim_count(&self) -> usize {
        self.claims
    }

    /// Deductible room for a claim in `network` and `category`
    pub fn deductible_room(
        &self,
        deductibles: &ScopedThresholds,
        network: NetworkType,
        category: &BenefitCategory,
    ) -> Limit {
        self.totals.deductible_breakdown.room(deductibles, network, category)
    }

    /// OOP-limit room for a claim in `network` and `category`
    pub fn oop_room(
        &self,
        oop_limits: &ScopedThresholds,
        network: NetworkType,
        category: &BenefitCategory,
    ) -> Limit {
        self.totals.covered_breakdown.room(oop_limits, network, category)
    }

    pub fn accumulate(&mut self, contribution: &ClaimContribution) {
        let ClaimContribution {
            category,
            network,
            allowed,
            deductible,
            covered_oop,
            uncovered_oop,
        } = contribution;

        self.totals.allowed += *allowed;
        self.totals.covered_breakdown.add(*network, category, *covered_oop);
        self.totals.uncovered_breakdown.add(*network, category, *uncovered_oop);
        self.totals.deductible_breakdown.add(*network, category, *deductible);
        self.totals.oop += *covered_oop;
        self.totals.uncovered += *uncovered_oop;
        self.claims += 1;
    }

    /// Closes the session; the MSA deposit offsets covered and uncovered OOP
    pub fn finalize(self, msa_deposit: Decimal) -> CostBreakdown {
        let mut totals = self.totals;
        totals.oop = non_negative(totals.oop + totals.uncovered - msa_deposit);
        totals
    }
}
