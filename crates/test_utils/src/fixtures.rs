//! Pre-built Test Fixtures
//!
//! Provides ready-to-use dates, claims and plans. The plans mirror the shape
//! of real canonical benefit documents so they double as parsing fixtures.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::json;

use core_kernel::PersonId;
use domain_benefits::{BenefitPeriodKind, NetworkScope, NetworkType, Plan};
use domain_claims::RawClaim;

use crate::builders::{per_day_copay, ClaimBuilder, PlanBuilder};

/// Fixture for service dates
pub struct DateFixtures;

impl DateFixtures {
    /// The claim year used throughout the fixtures
    pub const CLAIM_YEAR: i32 = 2024;

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
    }

    /// A date in the fixture claim year
    pub fn on(month: u32, day: u32) -> NaiveDate {
        Self::date(Self::CLAIM_YEAR, month, day)
    }

    /// Default admission date for built claims
    pub fn admission() -> NaiveDate {
        Self::on(1, 15)
    }
}

/// Fixture for people
pub struct PersonFixtures;

impl PersonFixtures {
    pub fn person_id() -> PersonId {
        PersonId::new("764308502")
    }
}

/// Fixture for plans
pub struct PlanFixtures;

impl PlanFixtures {
    /// A plan with no benefits; every claim is wholly uncovered
    pub fn uncovered() -> Plan {
        PlanBuilder::new("H0000-000-0").build()
    }

    /// A representative Medicare Advantage plan
    ///
    /// - office visits (12): $20 copay; specialist (13): 20% coinsurance
    /// - $250 composite deductible on categories 13 and 25
    /// - $3,400 in-network OOP limit on 12, 13, 25 and 44
    /// - inpatient hospital (25): Original Medicare periods, $300/day for days 1-5,
    ///   $0 for days 6-90
    /// - inpatient mental health (26): per-stay periods, $250/day for days 1-4,
    ///   $0 for days 5-90
    /// - SNF (44): per-stay periods, 3 prior inpatient days required, $0 for days
    ///   1-20, $196/day for days 21-100
    pub fn standard() -> Plan {
        serde_json::from_value(json!({
            "plan_id": "H1234-001-0",
            "state_fips": "42",
            "msa_deposit": 0,
            "deductibles": {
                "composite": { "amount": 250, "period": 365, "categories": ["13", "25"] }
            },
            "oop_limits": {
                "in_network": { "amount": 3400, "period": 365, "categories": ["12", "13", "25", "44"] }
            },
            "benefits": {
                "combine_inpatient_day_count": false,
                "categories": {
                    "12": { "in_network": { "copay": { "max": 20 } } },
                    "13": { "in_network": { "coinsurance": { "max": 20 } } },
                    "25": {
                        "in_network": {
                            "benefit_period": "original_medicare",
                            "day_intervals": {
                                "1": { "copay": { "max": 300, "per_day": true, "interval_max": 5 } },
                                "6": { "copay": { "max": 0, "per_day": true, "interval_max": 90 } }
                            }
                        }
                    },
                    "26": {
                        "in_network": {
                            "benefit_period": "stay",
                            "day_intervals": {
                                "1": { "copay": { "max": 250, "per_day": true, "interval_max": 4 } },
                                "5": { "copay": { "max": 0, "per_day": true, "interval_max": 90 } }
                            }
                        }
                    },
                    "44": {
                        "in_network": {
                            "benefit_period": "stay",
                            "required_days": 3,
                            "day_intervals": {
                                "1": { "copay": { "max": 0, "per_day": true, "interval_max": 20 } },
                                "21": { "copay": { "max": 196, "per_day": true, "interval_max": 100 } }
                            }
                        }
                    }
                }
            }
        }))
        .expect("standard plan fixture parses")
    }

    /// Inpatient hospital coverage only, with the given benefit-period rule
    /// and $100/day for days 1-10, $0 for days 11-60
    pub fn inpatient_only(kind: BenefitPeriodKind) -> Plan {
        PlanBuilder::new("H2000-002-0")
            .with_day_intervals(
                "25",
                NetworkScope::InNetwork,
                &[(1, per_day_copay(dec!(100), Some(10))), (11, per_day_copay(dec!(0), Some(60)))],
            )
            .with_benefit_period("25", NetworkType::InNetwork, kind)
            .build()
    }
}

/// Fixture for claim histories
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// A short year of mixed claims, in admission order
    pub fn mixed_history() -> Vec<RawClaim> {
        vec![
            ClaimBuilder::new().with_admitted(DateFixtures::on(1, 10)).with_cost(dec!(150)).build(),
            ClaimBuilder::new()
                .with_category("13")
                .with_admitted(DateFixtures::on(2, 3))
                .with_cost(dec!(900))
                .build(),
            ClaimBuilder::hospital_stay(DateFixtures::on(3, 1), 6).with_cost(dec!(18000)).build(),
            ClaimBuilder::snf_stay(DateFixtures::on(3, 12), 25).with_cost(dec!(12500)).build(),
            ClaimBuilder::new()
                .with_category("14")
                .with_admitted(DateFixtures::on(7, 19))
                .with_cost(dec!(400))
                .build(),
        ]
    }
}
