//! Tests for parsing plan benefit documents

use rust_decimal_macros::dec;
use serde_json::json;

use domain_benefits::{BenefitCategory, BenefitPeriodKind, NetworkType, Plan};

fn sample_plan() -> Plan {
    serde_json::from_value(json!({
        "plan_id": "H1234-001-0",
        "state_fips": "42",
        "msa_deposit": 1500,
        "deductibles": {
            "composite": { "amount": 500, "period": 365, "categories": ["12", "25", 44] }
        },
        "oop_limits": {
            "in_network": { "amount": 6700, "period": 365, "categories": ["12", "25", "44"] }
        },
        "benefits": {
            "combine_inpatient_day_count": true,
            "categories": {
                "25": {
                    "in_network": {
                        "benefit_period": "original_medicare",
                        "day_intervals": {
                            "1":  { "copay": { "max": 300, "per_day": true, "interval_max": 5 } },
                            "6":  { "copay": { "max": 0, "per_day": true, "interval_max": 90 } }
                        }
                    }
                },
                "44": {
                    "in_network": {
                        "benefit_period": "stay",
                        "required_days": 3,
                        "day_intervals": {
                            "21": { "copay": { "max": 160, "per_day": true, "interval_max": 100 } },
                            "1":  { "copay": { "max": 0, "per_day": true, "interval_max": 20 } }
                        }
                    }
                },
                "12": {
                    "in_network": { "copay": { "min": 5, "max": 20 } },
                    "out_network": { "coinsurance": { "max": 40 } },
                    "oop_limits": 1000
                }
            }
        }
    }))
    .expect("plan parses")
}

#[test]
fn test_plan_top_level_fields() {
    let plan = sample_plan();

    assert_eq!(plan.plan_id.as_str(), "H1234-001-0");
    assert_eq!(plan.state_fips.as_deref(), Some("42"));
    assert_eq!(plan.msa_deposit(), dec!(1500));
    assert!(plan.combine_inpatient_day_count());
}

#[test]
fn test_threshold_categories_accept_numeric_codes() {
    let plan = sample_plan();
    let composite = plan.deductibles.composite.as_ref().unwrap();

    assert!(composite.applies_to(&BenefitCategory::skilled_nursing()));
    assert!(composite.applies_to(&BenefitCategory::from("12")));
    assert!(!composite.applies_to(&BenefitCategory::from("13")));
}

#[test]
fn test_day_intervals_are_ordered_numerically() {
    let plan = sample_plan();
    let snf = plan
        .category(&BenefitCategory::skilled_nursing())
        .and_then(|benefit| benefit.network(NetworkType::InNetwork))
        .unwrap();

    let starts: Vec<u32> = snf.day_intervals.as_ref().unwrap().keys().copied().collect();
    assert_eq!(starts, vec![1, 21]);
}

#[test]
fn test_benefit_period_and_required_days() {
    let plan = sample_plan();

    assert_eq!(
        plan.benefit_period_kind(&BenefitCategory::inpatient_hospital(), NetworkType::InNetwork),
        Some(&BenefitPeriodKind::OriginalMedicare)
    );
    assert_eq!(
        plan.benefit_period_kind(&BenefitCategory::skilled_nursing(), NetworkType::InNetwork),
        Some(&BenefitPeriodKind::PerStay)
    );
    assert_eq!(
        plan.benefit_period_kind(&BenefitCategory::inpatient_hospital(), NetworkType::OutNetwork),
        None
    );
    assert_eq!(plan.snf_required_days(NetworkType::InNetwork), 3);
    assert_eq!(plan.snf_required_days(NetworkType::OutNetwork), 0);
}

#[test]
fn test_unknown_benefit_period_is_preserved() {
    let plan: Plan = serde_json::from_value(json!({
        "plan_id": "H0000-000",
        "benefits": { "categories": { "25": { "in_network": { "benefit_period": "lifetime" } } } }
    }))
    .unwrap();

    assert_eq!(
        plan.benefit_period_kind(&BenefitCategory::inpatient_hospital(), NetworkType::InNetwork),
        Some(&BenefitPeriodKind::Unsupported("lifetime".to_string()))
    );
}

#[test]
fn test_missing_plan_id_is_rejected() {
    let result: Result<Plan, _> = serde_json::from_value(json!({ "benefits": {} }));
    assert!(result.is_err());
}

#[test]
fn test_plan_roundtrip_preserves_benefits() {
    let plan = sample_plan();
    let json = serde_json::to_value(&plan).unwrap();
    let reparsed: Plan = serde_json::from_value(json).unwrap();

    assert_eq!(reparsed, plan);
}
