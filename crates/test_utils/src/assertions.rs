//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for cost breakdowns that give
//! more meaningful error messages than standard assertions.

use rust_decimal::Decimal;

use core_kernel::Limit;
use domain_benefits::DayRange;
use domain_claims::{Breakdown, ClaimContribution, CostBreakdown};

/// Asserts that two amounts differ by no more than `tolerance`
///
/// # Panics
///
/// Panics if the amounts differ by more than tolerance
pub fn assert_amount_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a day range has the given bounds
pub fn assert_day_range(actual: Option<DayRange>, start: u32, end: u32) {
    assert_eq!(
        actual,
        Some(DayRange::new(start, end)),
        "Expected day range {}..={}, got {:?}",
        start,
        end,
        actual
    );
}

/// Asserts that a breakdown's scopes agree: composite is the sum of both
/// networks and of all categories
pub fn assert_breakdown_consistent(name: &str, breakdown: &Breakdown) {
    assert_eq!(
        breakdown.composite,
        breakdown.in_network + breakdown.out_network,
        "{}: composite {} != in-network {} + out-of-network {}",
        name,
        breakdown.composite,
        breakdown.in_network,
        breakdown.out_network
    );

    let category_total: Decimal = breakdown.categories.values().copied().sum();
    assert_eq!(
        breakdown.composite, category_total,
        "{}: composite {} != category total {}",
        name, breakdown.composite, category_total
    );
}

/// Asserts the accounting identities of a finished breakdown
pub fn assert_cost_breakdown_consistent(costs: &CostBreakdown) {
    assert_breakdown_consistent("covered", &costs.covered_breakdown);
    assert_breakdown_consistent("uncovered", &costs.uncovered_breakdown);
    assert_breakdown_consistent("deductible", &costs.deductible_breakdown);

    assert_eq!(costs.uncovered, costs.uncovered_breakdown.composite);
    assert!(costs.oop >= Decimal::ZERO, "Final OOP is negative: {}", costs.oop);
    assert!(
        costs.deductible_breakdown.composite <= costs.covered_breakdown.composite,
        "Deductible {} exceeds covered OOP {}",
        costs.deductible_breakdown.composite,
        costs.covered_breakdown.composite
    );
}

/// Asserts that a claim stayed within the room available before it was processed
pub fn assert_contribution_within_room(
    contribution: &ClaimContribution,
    deductible_room: Limit,
    oop_room: Limit,
) {
    assert!(
        Limit::Amount(contribution.deductible) <= deductible_room,
        "Deductible {} exceeds room {}",
        contribution.deductible,
        deductible_room
    );
    assert!(
        Limit::Amount(contribution.covered_oop) <= oop_room,
        "Covered OOP {} exceeds room {}",
        contribution.covered_oop,
        oop_room
    );
    assert!(
        contribution.deductible <= contribution.covered_oop,
        "Deductible {} exceeds covered OOP {}",
        contribution.deductible,
        contribution.covered_oop
    );
}

/// Asserts that a claim contributed nothing
pub fn assert_zero_contribution(contribution: &ClaimContribution) {
    assert_eq!(contribution.allowed, Decimal::ZERO, "allowed");
    assert_eq!(contribution.deductible, Decimal::ZERO, "deductible");
    assert_eq!(contribution.covered_oop, Decimal::ZERO, "covered_oop");
    assert_eq!(contribution.uncovered_oop, Decimal::ZERO, "uncovered_oop");
}
