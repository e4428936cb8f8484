//! Tests for cost-sharing resolution

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use core_kernel::Limit;
use domain_benefits::resolver::{lookup_threshold, lookup_tiers};
use domain_benefits::{
    max_covered_days, shared_oop, BenefitCategory, BenefitError, CoinsuranceSpec, CopaySpec,
    CostSharingResolver, CostSharingTier, DayRange, NetworkType, Plan, ThresholdKind,
};

fn plan() -> Plan {
    serde_json::from_value(json!({
        "plan_id": "H5555-002",
        "deductibles": {
            "composite": { "amount": 250, "period": 365, "categories": ["2", "25"] },
            "out_network": { "amount": 1000, "period": 365, "categories": ["2"] }
        },
        "oop_limits": {
            "composite": { "amount": 9000, "period": 365, "categories": ["2", "25", "37"] }
        },
        "benefits": {
            "categories": {
                "2": {
                    "composite": { "coinsurance": { "max": 20 } },
                    "deductibles": 100
                },
                "25": {
                    "in_network": {
                        "day_intervals": {
                            "1":  { "copay": { "max": 295, "per_day": true, "interval_max": 6 } },
                            "7":  { "copay": { "max": 0, "per_day": true, "interval_max": 90 } }
                        }
                    },
                    "out_network": { "coinsurance": { "max": 40 } }
                },
                "37": { "in_network": { "copay": { "max": 40 } } }
            }
        }
    }))
    .unwrap()
}

mod tier_tests {
    use super::*;

    #[test]
    fn test_patched_category_falls_back_to_composite() {
        let plan = plan();
        // Ambulance code 1 reads the table of code 2, which only has a composite entry
        let tiers = lookup_tiers(&plan, &BenefitCategory::from("1"), NetworkType::InNetwork).unwrap();

        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0].coinsurance.unwrap().max, Some(dec!(20)));
    }

    #[test]
    fn test_part_a_tiers_in_day_order() {
        let plan = plan();
        let tiers = lookup_tiers(&plan, &BenefitCategory::inpatient_hospital(), NetworkType::InNetwork).unwrap();

        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].copay.unwrap().interval_max, Some(6));
        assert_eq!(max_covered_days(&tiers), Ok(Some(90)));
    }

    #[test]
    fn test_part_a_without_day_intervals_is_uncovered() {
        let plan = plan();
        assert!(lookup_tiers(&plan, &BenefitCategory::inpatient_hospital(), NetworkType::OutNetwork).is_none());
    }

    #[test]
    fn test_unknown_category_is_uncovered() {
        let plan = plan();
        assert!(lookup_tiers(&plan, &BenefitCategory::from("14"), NetworkType::InNetwork).is_none());
        assert!(lookup_tiers(&plan, &BenefitCategory::from("37"), NetworkType::OutNetwork).is_none());
    }

    #[test]
    fn test_resolver_caches_per_session() {
        let plan = plan();
        let mut resolver = CostSharingResolver::new(&plan);
        let first = resolver.tiers(&BenefitCategory::from("33"), NetworkType::InNetwork);
        let second = resolver.tiers(&BenefitCategory::from("33"), NetworkType::InNetwork);

        assert_eq!(first, second);
        assert_eq!(first.unwrap()[0].copay.unwrap().max, Some(dec!(40)));
    }
}

mod threshold_tests {
    use super::*;

    #[test]
    fn test_scopes_apply_only_to_listed_categories() {
        let plan = plan();
        let deductibles = lookup_threshold(&plan, &BenefitCategory::from("2"), ThresholdKind::Deductible).unwrap();

        assert_eq!(deductibles.composite, Limit::Amount(dec!(250)));
        assert_eq!(deductibles.in_network, Limit::Unlimited);
        assert_eq!(deductibles.out_network, Limit::Amount(dec!(1000)));
        assert_eq!(deductibles.category, Limit::Amount(dec!(100)));
        assert_eq!(deductibles.network(NetworkType::OutNetwork), Limit::Amount(dec!(1000)));
    }

    #[test]
    fn test_unlisted_category_is_unlimited() {
        let plan = plan();
        let limits = lookup_threshold(&plan, &BenefitCategory::from("14"), ThresholdKind::OopLimit).unwrap();

        assert_eq!(limits.composite, Limit::Unlimited);
        assert_eq!(limits.category, Limit::Unlimited);
    }

    #[test]
    fn test_non_annual_period_is_rejected() {
        let mut plan = plan();
        plan.oop_limits.composite.as_mut().unwrap().period = 30;

        let result = lookup_threshold(&plan, &BenefitCategory::from("37"), ThresholdKind::OopLimit);
        assert!(matches!(
            result,
            Err(BenefitError::InvalidThresholdPeriod { period: 30, .. })
        ));
    }

    #[test]
    fn test_period_only_checked_for_applicable_scope() {
        let mut plan = plan();
        plan.oop_limits.composite.as_mut().unwrap().period = 30;

        // Category 14 is not listed, so the bad period never applies to it
        assert!(lookup_threshold(&plan, &BenefitCategory::from("14"), ThresholdKind::OopLimit).is_ok());
    }
}

mod shared_oop_tests {
    use super::*;

    #[test]
    fn test_inpatient_copay_across_two_tiers() {
        let plan = plan();
        let tiers = lookup_tiers(&plan, &BenefitCategory::inpatient_hospital(), NetworkType::InNetwork).unwrap();

        // Days 1-10: six days at $295, four at $0
        let owed = shared_oop(dec!(20000), &tiers, &BenefitCategory::inpatient_hospital(), DayRange::new(1, 10));
        assert_eq!(owed, dec!(1770));
    }

    #[test]
    fn test_claim_resuming_mid_tier() {
        let plan = plan();
        let tiers = lookup_tiers(&plan, &BenefitCategory::inpatient_hospital(), NetworkType::InNetwork).unwrap();

        // A second stay in the same benefit period starting on day 5
        let owed = shared_oop(dec!(20000), &tiers, &BenefitCategory::inpatient_hospital(), DayRange::new(5, 8));
        assert_eq!(owed, dec!(590));
    }

    #[test]
    fn test_part_b_per_day_copay_counts_range_inclusively() {
        let tiers = vec![CostSharingTier::copay(CopaySpec {
            max: Some(dec!(10)),
            per_day: true,
            ..Default::default()
        })];

        // Non-Part-A ranges start at day 0
        let owed = shared_oop(dec!(500), &tiers, &BenefitCategory::from("13"), DayRange::new(0, 2));
        assert_eq!(owed, dec!(30));
    }

    #[test]
    fn test_part_b_coinsurance() {
        let tiers = vec![CostSharingTier::coinsurance(CoinsuranceSpec {
            max: Some(dec!(20)),
            ..Default::default()
        })];

        let owed = shared_oop(dec!(800), &tiers, &BenefitCategory::from("2"), DayRange::new(0, 0));
        assert_eq!(owed, dec!(160));
    }

    #[test]
    fn test_nothing_shared_without_cost() {
        let tiers = vec![CostSharingTier::copay(CopaySpec { max: Some(dec!(10)), ..Default::default() })];
        assert_eq!(
            shared_oop(Decimal::ZERO, &tiers, &BenefitCategory::from("13"), DayRange::new(0, 0)),
            Decimal::ZERO
        );
    }
}

fn tier_strategy() -> impl Strategy<Value = CostSharingTier> {
    (
        proptest::option::of((0i64..100_000i64, any::<bool>())),
        proptest::option::of(0i64..100i64),
        proptest::option::of(1u32..200u32),
    )
        .prop_map(|(copay, coinsurance, interval_max)| CostSharingTier {
            copay: copay.map(|(cents, per_day)| CopaySpec {
                max: Some(Decimal::new(cents, 2)),
                per_day,
                interval_max,
                ..Default::default()
            }),
            coinsurance: coinsurance.map(|percent| CoinsuranceSpec {
                max: Some(Decimal::from(percent)),
                interval_max,
                ..Default::default()
            }),
        })
}

proptest! {
    #[test]
    fn prop_shared_oop_never_exceeds_shared_cost(
        cents in 1i64..10_000_000i64,
        tiers in proptest::collection::vec(tier_strategy(), 1..4),
        start in 1u32..120u32,
        length in 1u32..60u32,
        part_a in any::<bool>(),
    ) {
        let shared_cost = Decimal::new(cents, 2);
        let category = if part_a { BenefitCategory::inpatient_hospital() } else { BenefitCategory::from("13") };
        let owed = shared_oop(shared_cost, &tiers, &category, DayRange::new(start, start + length - 1));

        prop_assert!(owed <= shared_cost);
        prop_assert!(owed >= Decimal::ZERO);
    }
}
