//! Tests for the Part A calendar and SNF eligibility

use domain_benefits::{BenefitCategory, BenefitPeriodKind, DayRange, NetworkType};
use domain_claims::{Calendar, ClaimError, ClaimStore, MedicalClaim};
use test_utils::{ClaimBuilder, DateFixtures, PlanBuilder, PlanFixtures};

fn hospital(month: u32, day: u32, length_of_stay: u32) -> MedicalClaim {
    ClaimBuilder::hospital_stay(DateFixtures::on(month, day), length_of_stay).build_normalized()
}

fn snf(month: u32, day: u32, length_of_stay: u32) -> MedicalClaim {
    ClaimBuilder::snf_stay(DateFixtures::on(month, day), length_of_stay).build_normalized()
}

// ============================================================================
// Construction Tests
// ============================================================================

mod construction_tests {
    use super::*;

    #[test]
    fn test_one_period_per_part_a_category_and_network() {
        let calendar = Calendar::new(&PlanFixtures::standard()).unwrap();

        for network in NetworkType::ALL {
            let categories: Vec<&BenefitCategory> = calendar
                .benefit_periods(network)
                .iter()
                .map(|period| period.category())
                .collect();
            assert_eq!(
                categories,
                BenefitCategory::part_a().iter().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_unsupported_benefit_period_fails_construction() {
        let plan = PlanBuilder::default()
            .with_benefit_period(
                "26",
                NetworkType::OutNetwork,
                BenefitPeriodKind::Unsupported("lifetime".to_string()),
            )
            .build();

        let result = Calendar::new(&plan);
        assert!(matches!(
            result,
            Err(ClaimError::UnsupportedBenefitPeriod { ref name, .. }) if name == "lifetime"
        ));
    }
}

// ============================================================================
// SNF Eligibility Tests
// ============================================================================

mod snf_eligibility_tests {
    use super::*;

    #[test]
    fn test_no_required_days_always_covered() {
        let plan = PlanBuilder::default()
            .with_snf_required_days(NetworkType::InNetwork, 0)
            .build();
        let calendar = Calendar::new(&plan).unwrap();

        assert!(calendar.is_snf_claim_covered(&snf(6, 1, 10)).unwrap());
    }

    #[test]
    fn test_covered_after_qualifying_inpatient_stay() {
        let mut calendar = Calendar::new(&PlanFixtures::standard()).unwrap();
        calendar.day_counts(&hospital(3, 1, 5)).unwrap();

        // Inpatient stay ended March 6, within 30 days
        assert!(calendar.is_snf_claim_covered(&snf(3, 20, 10)).unwrap());
        // More than 30 days after discharge
        assert!(!calendar.is_snf_claim_covered(&snf(4, 10, 10)).unwrap());
    }

    #[test]
    fn test_inpatient_stay_must_meet_required_days() {
        let mut calendar = Calendar::new(&PlanFixtures::standard()).unwrap();
        calendar.day_counts(&hospital(3, 1, 2)).unwrap();

        assert!(!calendar.is_snf_claim_covered(&snf(3, 5, 10)).unwrap());
    }

    #[test]
    fn test_inpatient_stay_must_start_required_days_before_admission() {
        let mut calendar = Calendar::new(&PlanFixtures::standard()).unwrap();
        calendar.day_counts(&hospital(3, 1, 5)).unwrap();

        // Admitted two days into the hospital stay
        assert!(!calendar.is_snf_claim_covered(&snf(3, 3, 10)).unwrap());
    }

    #[test]
    fn test_covered_after_prior_snf_stay() {
        let mut calendar = Calendar::new(&PlanFixtures::standard()).unwrap();
        calendar.day_counts(&hospital(3, 1, 5)).unwrap();
        calendar.day_counts(&snf(3, 20, 10)).unwrap();

        // The March 20 SNF stay ended March 30
        assert!(calendar.is_snf_claim_covered(&snf(4, 25, 5)).unwrap());
        assert!(!calendar.is_snf_claim_covered(&snf(5, 5, 5)).unwrap());
    }

    #[test]
    fn test_networks_are_tracked_separately() {
        let plan = PlanBuilder::default()
            .with_snf_required_days(NetworkType::InNetwork, 3)
            .with_snf_required_days(NetworkType::OutNetwork, 3)
            .build();
        let mut calendar = Calendar::new(&plan).unwrap();
        calendar.day_counts(&hospital(3, 1, 5)).unwrap();

        let out_of_network = ClaimBuilder::snf_stay(DateFixtures::on(3, 20), 10)
            .with_network(NetworkType::OutNetwork)
            .build_normalized();
        assert!(!calendar.is_snf_claim_covered(&out_of_network).unwrap());
    }

    #[test]
    fn test_non_snf_claim_is_rejected() {
        let calendar = Calendar::new(&PlanFixtures::standard()).unwrap();
        assert!(calendar.is_snf_claim_covered(&hospital(3, 1, 5)).is_err());
    }

    #[test]
    fn test_store_tracks_latest_discharge() {
        let mut store = ClaimStore::inpatient(3);
        let long_stay = hospital(3, 1, 30);
        store.cache_if_applicable(&long_stay).unwrap();
        store.cache_if_applicable(&hospital(3, 10, 4)).unwrap();

        assert_eq!(store.cached(), Some(&long_stay));
    }
}

// ============================================================================
// Day Count Tests
// ============================================================================

mod day_count_tests {
    use super::*;

    #[test]
    fn test_part_b_claim_spans_its_stay() {
        let mut calendar = Calendar::new(&PlanFixtures::standard()).unwrap();
        let visit = ClaimBuilder::new().with_length_of_stay(2).build_normalized();

        assert_eq!(calendar.day_counts(&visit).unwrap(), DayRange::new(1, 2));
    }

    #[test]
    fn test_part_a_claim_uses_its_benefit_period() {
        let mut calendar = Calendar::new(&PlanFixtures::standard()).unwrap();

        assert_eq!(calendar.day_counts(&hospital(3, 1, 5)).unwrap(), DayRange::new(1, 5));
        // Same Original Medicare period
        assert_eq!(calendar.day_counts(&hospital(4, 1, 5)).unwrap(), DayRange::new(6, 10));
    }

    #[test]
    fn test_category_without_period_defaults_to_whole_stay() {
        let mut calendar = Calendar::new(&PlanFixtures::uncovered()).unwrap();

        assert_eq!(calendar.day_counts(&hospital(3, 1, 5)).unwrap(), DayRange::new(1, 5));
        assert_eq!(calendar.day_counts(&hospital(4, 1, 5)).unwrap(), DayRange::new(1, 5));
    }

    #[test]
    fn test_admissions_must_not_go_backwards() {
        let mut calendar = Calendar::new(&PlanFixtures::standard()).unwrap();
        calendar.day_counts(&hospital(3, 1, 5)).unwrap();

        let result = calendar.day_counts(&hospital(2, 1, 5));
        assert!(matches!(result, Err(ClaimError::AdmissionOrderViolation { .. })));
    }

    #[test]
    fn test_part_b_claims_do_not_affect_ordering() {
        let mut calendar = Calendar::new(&PlanFixtures::standard()).unwrap();
        calendar.day_counts(&hospital(3, 1, 5)).unwrap();

        let earlier_visit = ClaimBuilder::new().with_admitted(DateFixtures::on(1, 2)).build_normalized();
        assert!(calendar.day_counts(&earlier_visit).is_ok());
    }

    #[test]
    fn test_uncovered_snf_claim_is_rejected() {
        let mut calendar = Calendar::new(&PlanFixtures::standard()).unwrap();
        let result = calendar.day_counts(&snf(3, 1, 10));

        assert!(matches!(result, Err(ClaimError::UncoveredSnfClaim { .. })));
    }
}
