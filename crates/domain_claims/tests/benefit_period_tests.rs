//! Tests for benefit-period day counting

use domain_benefits::{BenefitCategory, BenefitPeriodKind};
use domain_claims::{BenefitPeriod, ClaimError, MedicalClaim};
use test_utils::{assert_day_range, ClaimBuilder, DateFixtures};

fn period(kind: BenefitPeriodKind, category: BenefitCategory, combine: bool) -> BenefitPeriod {
    BenefitPeriod::new(Some(&kind), category, combine).unwrap()
}

fn hospital(month: u32, day: u32, length_of_stay: u32) -> MedicalClaim {
    ClaimBuilder::hospital_stay(DateFixtures::on(month, day), length_of_stay).build_normalized()
}

// ============================================================================
// Per-Stay Tests
// ============================================================================

mod per_stay_tests {
    use super::*;

    #[test]
    fn test_day_count_resets_each_stay() {
        let mut period = period(BenefitPeriodKind::PerStay, BenefitCategory::inpatient_hospital(), false);

        assert_day_range(period.add_claim(&hospital(2, 1, 5)).unwrap(), 1, 5);
        assert_day_range(period.add_claim(&hospital(2, 10, 3)).unwrap(), 1, 3);
        assert_eq!(period.day_count(), 3);
    }

    #[test]
    fn test_zero_length_stay_is_an_error() {
        let mut period = period(BenefitPeriodKind::PerStay, BenefitCategory::inpatient_hospital(), false);
        let result = period.add_claim(&hospital(2, 1, 0));

        assert!(matches!(result, Err(ClaimError::ZeroLengthStay { .. })));
    }
}

// ============================================================================
// Annual Tests
// ============================================================================

mod annual_tests {
    use super::*;

    #[test]
    fn test_day_count_accumulates() {
        let mut period = period(BenefitPeriodKind::Annual, BenefitCategory::inpatient_hospital(), false);

        assert_day_range(period.add_claim(&hospital(2, 1, 5)).unwrap(), 1, 5);
        assert_day_range(period.add_claim(&hospital(9, 10, 3)).unwrap(), 6, 8);
    }

    #[test]
    fn test_no_reset_across_year_boundary() {
        let mut period = period(BenefitPeriodKind::Annual, BenefitCategory::inpatient_hospital(), false);
        let next_year = ClaimBuilder::hospital_stay(DateFixtures::date(2025, 2, 1), 2).build_normalized();

        period.add_claim(&hospital(12, 1, 5)).unwrap();
        assert_day_range(period.add_claim(&next_year).unwrap(), 6, 7);
    }
}

// ============================================================================
// Original Medicare Tests
// ============================================================================

mod original_medicare_tests {
    use super::*;

    #[test]
    fn test_admission_61_days_after_discharge_starts_new_period() {
        let mut period =
            period(BenefitPeriodKind::OriginalMedicare, BenefitCategory::inpatient_hospital(), false);

        // Discharged January 6; March 7 is 61 days later
        period.add_claim(&hospital(1, 1, 5)).unwrap();
        assert_day_range(period.add_claim(&hospital(3, 7, 3)).unwrap(), 1, 3);
    }

    #[test]
    fn test_admission_60_days_after_discharge_continues_period() {
        let mut period =
            period(BenefitPeriodKind::OriginalMedicare, BenefitCategory::inpatient_hospital(), false);

        period.add_claim(&hospital(1, 1, 5)).unwrap();
        assert_day_range(period.add_claim(&hospital(3, 6, 3)).unwrap(), 6, 8);
    }

    #[test]
    fn test_window_uses_effective_discharge() {
        let mut period =
            period(BenefitPeriodKind::OriginalMedicare, BenefitCategory::inpatient_hospital(), false);

        // Recorded discharge is late, but admission + stay ends January 6
        let first = ClaimBuilder::hospital_stay(DateFixtures::on(1, 1), 5)
            .with_discharged(DateFixtures::on(2, 1))
            .build_normalized();
        period.add_claim(&first).unwrap();

        assert_day_range(period.add_claim(&hospital(3, 7, 3)).unwrap(), 1, 3);
    }

    #[test]
    fn test_combined_inpatient_day_count() {
        let mut period =
            period(BenefitPeriodKind::OriginalMedicare, BenefitCategory::inpatient_hospital(), true);
        let mental_health = ClaimBuilder::new()
            .with_category(BenefitCategory::inpatient_mental_health())
            .with_admitted(DateFixtures::on(2, 1))
            .with_length_of_stay(4)
            .build_normalized();

        // Mental-health days count toward the hospital period but get no range from it
        assert_eq!(period.add_claim(&mental_health).unwrap(), None);
        assert_day_range(period.add_claim(&hospital(2, 10, 2)).unwrap(), 5, 6);
    }

    #[test]
    fn test_separate_inpatient_day_counts() {
        let mut period =
            period(BenefitPeriodKind::OriginalMedicare, BenefitCategory::inpatient_hospital(), false);
        let mental_health = ClaimBuilder::new()
            .with_category(BenefitCategory::inpatient_mental_health())
            .with_admitted(DateFixtures::on(2, 1))
            .with_length_of_stay(4)
            .build_normalized();

        period.add_claim(&mental_health).unwrap();
        assert_day_range(period.add_claim(&hospital(2, 10, 2)).unwrap(), 1, 2);
    }

    #[test]
    fn test_snf_period_counts_snf_stays() {
        let mut period =
            period(BenefitPeriodKind::OriginalMedicare, BenefitCategory::skilled_nursing(), true);
        let stay = |day, length| {
            ClaimBuilder::snf_stay(DateFixtures::on(4, day), length).build_normalized()
        };

        assert_day_range(period.add_claim(&stay(1, 10)).unwrap(), 1, 10);
        assert_day_range(period.add_claim(&stay(20, 15)).unwrap(), 11, 25);
    }
}
