//! Property-Based Test Generators
//!
//! Provides proptest strategies for claim histories and plan thresholds that
//! respect the engine's input contract: claims in admission order and Part A
//! stays of at least one day.

use chrono::Days;
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_benefits::{BenefitCategory, NetworkScope, NetworkType, Plan};
use domain_claims::RawClaim;

use crate::builders::{ClaimBuilder, PlanBuilder};
use crate::fixtures::{DateFixtures, PlanFixtures};

/// Strategy for amounts in cents up to $`max_dollars`
pub fn amount_strategy(max_dollars: i64) -> impl Strategy<Value = Decimal> {
    (0i64..=max_dollars * 100).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for claim costs, including the zero and negative costs the
/// engine must ignore
pub fn cost_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        8 => amount_strategy(20_000),
        1 => Just(Decimal::ZERO),
        1 => (1i64..10_000i64).prop_map(|cents| Decimal::new(-cents, 2)),
    ]
}

/// Strategy for benefit categories, weighted toward the ones fixtures cover
pub fn category_strategy() -> impl Strategy<Value = BenefitCategory> {
    prop_oneof![
        3 => Just(BenefitCategory::from("12")),
        3 => Just(BenefitCategory::from("13")),
        2 => Just(BenefitCategory::inpatient_hospital()),
        1 => Just(BenefitCategory::inpatient_mental_health()),
        2 => Just(BenefitCategory::skilled_nursing()),
        1 => Just(BenefitCategory::uncategorized()),
        1 => (1u32..=BenefitCategory::MAX_CODE).prop_map(BenefitCategory::from),
    ]
}

pub fn network_strategy() -> impl Strategy<Value = NetworkType> {
    prop_oneof![Just(NetworkType::InNetwork), Just(NetworkType::OutNetwork)]
}

/// Strategy for one claim `offset` days into the fixture claim year
fn claim_strategy() -> impl Strategy<Value = (u64, RawClaim)> {
    (0u64..330, 0u32..40, category_strategy(), network_strategy(), cost_strategy()).prop_map(
        |(offset, stay, category, network, cost)| {
            // Part A stays are at least one day long
            let length_of_stay = if category.is_part_a() { stay.max(1) } else { stay.min(1) };
            let admitted = DateFixtures::on(1, 1)
                .checked_add_days(Days::new(offset))
                .expect("admission within claim year");
            let claim = ClaimBuilder::new()
                .with_admitted(admitted)
                .with_length_of_stay(length_of_stay)
                .with_category(category)
                .with_network(network)
                .with_cost(cost)
                .build();
            (offset, claim)
        },
    )
}

/// Strategy for an admission-ordered claim history of up to `max_len` claims
pub fn claim_history_strategy(max_len: usize) -> impl Strategy<Value = Vec<RawClaim>> {
    proptest::collection::vec(claim_strategy(), 0..=max_len).prop_map(|mut claims| {
        claims.sort_by_key(|(offset, _)| *offset);
        claims.into_iter().map(|(_, claim)| claim).collect()
    })
}

/// Strategy for the standard plan with varied thresholds and MSA deposit
pub fn threshold_plan_strategy() -> impl Strategy<Value = Plan> {
    (
        amount_strategy(2_000),
        amount_strategy(8_000),
        proptest::option::of(amount_strategy(1_500)),
        amount_strategy(3_000),
    )
        .prop_map(|(deductible, oop_limit, category_limit, msa)| {
            let mut plan = PlanBuilder::default()
                .with_deductible(NetworkScope::Composite, deductible, &["12", "13", "25", "26", "44"])
                .with_oop_limit(NetworkScope::Composite, oop_limit, &["12", "13", "25", "26", "44"])
                .with_msa_deposit(msa)
                .build();
            plan.benefits = PlanFixtures::standard().benefits;
            if let Some(limit) = category_limit {
                if let Some(benefit) = plan.benefits.categories.get_mut(&BenefitCategory::from("13")) {
                    benefit.oop_limits = Some(limit);
                }
            }
            plan
        })
}
