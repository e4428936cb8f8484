//! Benefit periods
//!
//! A benefit period tracks how many covered days a Part A category has used
//! and decides where a new stay falls on the plan's day-interval tiers. The
//! calendar keeps one period per (network, Part A category) and shows every
//! Part A claim to every period of the claim's network; a period only
//! answers for claims of its own category, but Original Medicare periods
//! also use other categories' stays to keep their window open.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::BENEFIT_PERIOD_GAP;
use domain_benefits::{BenefitCategory, BenefitPeriodKind, DayRange};
use crate::claim::MedicalClaim;
use crate::error::ClaimError;

/// Day-count state for one Part A category in one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BenefitPeriod {
    /// Day counts restart with every stay
    PerStay {
        category: BenefitCategory,
        day_count: u32,
    },
    /// Day counts accumulate for the life of the period
    ///
    /// There is no reset at a year boundary: a period must only be shown
    /// claims from a single plan year.
    Annual {
        category: BenefitCategory,
        day_count: u32,
    },
    /// Day counts accumulate until an admission comes more than 60 days
    /// after the latest discharge
    OriginalMedicare {
        category: BenefitCategory,
        day_count: u32,
        /// Latest effective discharge in the open period; `None` before the first stay
        end_date: Option<NaiveDate>,
        combine_inpatient_day_count: bool,
    },
    /// No benefit-period rule is configured; never answers
    Null { category: BenefitCategory },
}

impl BenefitPeriod {
    /// Creates the period configured for a category
    ///
    /// An absent configuration yields a `Null` period.
    pub fn new(
        kind: Option<&BenefitPeriodKind>,
        category: BenefitCategory,
        combine_inpatient_day_count: bool,
    ) -> Result<Self, ClaimError> {
        let period = match kind {
            None => BenefitPeriod::Null { category },
            Some(BenefitPeriodKind::PerStay) => BenefitPeriod::PerStay { category, day_count: 0 },
            Some(BenefitPeriodKind::Annual) => BenefitPeriod::Annual { category, day_count: 0 },
            Some(BenefitPeriodKind::OriginalMedicare) => BenefitPeriod::OriginalMedicare {
                category,
                day_count: 0,
                end_date: None,
                combine_inpatient_day_count,
            },
            Some(BenefitPeriodKind::Unsupported(name)) => {
                return Err(ClaimError::UnsupportedBenefitPeriod {
                    name: name.clone(),
                    category: category.to_string(),
                })
            }
        };
        Ok(period)
    }

    pub fn category(&self) -> &BenefitCategory {
        match self {
            BenefitPeriod::PerStay { category, .. }
            | BenefitPeriod::Annual { category, .. }
            | BenefitPeriod::OriginalMedicare { category, .. }
            | BenefitPeriod::Null { category } => category,
        }
    }

    /// Days used so far in the current period
    pub fn day_count(&self) -> u32 {
        match self {
            BenefitPeriod::PerStay { day_count, .. }
            | BenefitPeriod::Annual { day_count, .. }
            | BenefitPeriod::OriginalMedicare { day_count, .. } => *day_count,
            BenefitPeriod::Null { .. } => 0,
        }
    }

    /// Records a claim and returns its day range when the claim's category
    /// is this period's category
    pub fn add_claim(&mut self, claim: &MedicalClaim) -> Result<Option<DayRange>, ClaimError> {
        let matches = *self.category() == claim.benefit_category;

        match self {
            BenefitPeriod::PerStay { category, day_count } => {
                if !matches {
                    return Ok(None);
                }
                if claim.length_of_stay == 0 {
                    return Err(ClaimError::ZeroLengthStay {
                        category: category.to_string(),
                    });
                }
                *day_count = claim.length_of_stay;
                Ok(Some(DayRange::new(1, *day_count)))
            }

            BenefitPeriod::Annual { day_count, .. } => {
                if !matches {
                    return Ok(None);
                }
                let start = day_count.saturating_add(1);
                *day_count = day_count.saturating_add(claim.length_of_stay);
                Ok(Some(DayRange::new(start, *day_count)))
            }

            BenefitPeriod::OriginalMedicare {
                category,
                day_count,
                end_date,
                combine_inpatient_day_count,
            } => {
                if !is_open(*end_date, claim.admitted) {
                    debug!(
                        category = %category,
                        admitted = %claim.admitted,
                        days_used = *day_count,
                        "Benefit period closed; starting a new one"
                    );
                    *day_count = 0;
                    *end_date = None;
                }

                // Any Part A stay extends the period, whatever its category
                let discharge = claim.effective_discharge()?;
                *end_date = Some(end_date.map_or(discharge, |end| end.max(discharge)));

                let counts_toward_period = (category.is_snf() && claim.benefit_category.is_snf())
                    || (!*combine_inpatient_day_count && matches)
                    || (*combine_inpatient_day_count && claim.benefit_category.is_inpatient());

                let start = day_count.saturating_add(1);
                if counts_toward_period {
                    *day_count = day_count.saturating_add(claim.length_of_stay);
                }

                Ok(matches.then(|| DayRange::new(start, *day_count)))
            }

            BenefitPeriod::Null { .. } => Ok(None),
        }
    }
}

fn is_open(end_date: Option<NaiveDate>, admitted: NaiveDate) -> bool {
    match end_date.and_then(|end| end.checked_add_days(BENEFIT_PERIOD_GAP)) {
        Some(closes_after) => admitted <= closes_after,
        // A fresh period is always open
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_benefits::NetworkType;
    use rust_decimal::Decimal;

    fn claim(category: BenefitCategory, admitted: NaiveDate, length_of_stay: u32) -> MedicalClaim {
        MedicalClaim {
            admitted,
            discharged: admitted,
            benefit_category: category,
            network_type: NetworkType::InNetwork,
            length_of_stay,
            cost: Decimal::ONE_HUNDRED,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unsupported_kind_fails_construction() {
        let result = BenefitPeriod::new(
            Some(&BenefitPeriodKind::Unsupported("lifetime".to_string())),
            BenefitCategory::inpatient_hospital(),
            false,
        );
        assert!(matches!(result, Err(ClaimError::UnsupportedBenefitPeriod { .. })));
    }

    #[test]
    fn test_per_stay_rejects_zero_length_stay() {
        let mut period =
            BenefitPeriod::new(Some(&BenefitPeriodKind::PerStay), BenefitCategory::skilled_nursing(), false)
                .unwrap();
        let result = period.add_claim(&claim(BenefitCategory::skilled_nursing(), date(2024, 1, 1), 0));
        assert!(matches!(result, Err(ClaimError::ZeroLengthStay { .. })));
    }

    #[test]
    fn test_other_categories_are_ignored() {
        let mut period =
            BenefitPeriod::new(Some(&BenefitPeriodKind::Annual), BenefitCategory::inpatient_hospital(), false)
                .unwrap();
        let range = period
            .add_claim(&claim(BenefitCategory::skilled_nursing(), date(2024, 1, 1), 4))
            .unwrap();

        assert_eq!(range, None);
        assert_eq!(period.day_count(), 0);
    }

    #[test]
    fn test_original_medicare_window_extended_by_other_category() {
        let mut period = BenefitPeriod::new(
            Some(&BenefitPeriodKind::OriginalMedicare),
            BenefitCategory::inpatient_hospital(),
            false,
        )
        .unwrap();

        period
            .add_claim(&claim(BenefitCategory::inpatient_hospital(), date(2024, 1, 1), 5))
            .unwrap();
        // An SNF stay keeps the hospital period open without using its days
        period
            .add_claim(&claim(BenefitCategory::skilled_nursing(), date(2024, 2, 20), 20))
            .unwrap();
        let range = period
            .add_claim(&claim(BenefitCategory::inpatient_hospital(), date(2024, 5, 1), 3))
            .unwrap();

        assert_eq!(range, Some(DayRange::new(6, 8)));
    }

    #[test]
    fn test_null_period_never_answers() {
        let mut period = BenefitPeriod::new(None, BenefitCategory::inpatient_hospital(), false).unwrap();
        let range = period
            .add_claim(&claim(BenefitCategory::inpatient_hospital(), date(2024, 1, 1), 5))
            .unwrap();
        assert_eq!(range, None);
    }
}
