//! Medical claims
//!
//! Claims arrive from the claim-history collaborator as [`RawClaim`] records
//! with a few optional fields. Adjudication works on [`MedicalClaim`], the
//! normalized form with every field resolved and the category already patched.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::temporal::{add_days, first_day_of_next_year, in_same_year};
use domain_benefits::{BenefitCategory, NetworkType};
use crate::error::ClaimError;

/// A claim as recorded in a person's claim history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawClaim {
    pub admitted: NaiveDate,
    pub discharged: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefit_category: Option<BenefitCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_type: Option<NetworkType>,
    pub length_of_stay: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
}

/// A claim ready for adjudication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalClaim {
    pub admitted: NaiveDate,
    /// Recorded discharge date; only used to place the claim in a proration window
    pub discharged: NaiveDate,
    pub benefit_category: BenefitCategory,
    pub network_type: NetworkType,
    pub length_of_stay: u32,
    pub cost: Decimal,
}

impl MedicalClaim {
    /// Normalizes a raw claim
    ///
    /// The category is patched, a missing category becomes uncategorized, a
    /// missing network is in-network and a missing cost is zero.
    /// `force_network` overrides the recorded network.
    pub fn normalized(raw: &RawClaim, force_network: Option<NetworkType>) -> Self {
        let benefit_category = raw
            .benefit_category
            .as_ref()
            .map_or_else(BenefitCategory::uncategorized, BenefitCategory::patched);

        Self {
            admitted: raw.admitted,
            discharged: raw.discharged,
            benefit_category,
            network_type: force_network.or(raw.network_type).unwrap_or_default(),
            length_of_stay: raw.length_of_stay,
            cost: raw.cost.unwrap_or(Decimal::ZERO),
        }
    }

    /// Discharge date used for benefit-period bookkeeping: admission plus length of stay
    pub fn effective_discharge(&self) -> Result<NaiveDate, ClaimError> {
        Ok(add_days(self.admitted, self.length_of_stay)?)
    }

    /// Returns true if the recorded stay crosses into the next calendar year
    pub fn spans_year_boundary(&self) -> bool {
        !in_same_year(self.admitted, self.discharged)
    }

    /// Cuts a stay that runs into the next year at January 1
    ///
    /// Cost is scaled by the share of days kept. Claims within one year and
    /// zero-length stays are returned unchanged.
    pub fn truncated_at_year_boundary(mut self) -> Result<Self, ClaimError> {
        if !self.spans_year_boundary() || self.length_of_stay == 0 {
            return Ok(self);
        }

        let next_year = first_day_of_next_year(self.admitted)?;
        let kept_days = u32::try_from((next_year - self.admitted).num_days())
            .map_err(|_| ClaimError::invalid_claim("stay length overflows"))?;

        self.cost = self.cost * Decimal::from(kept_days) / Decimal::from(self.length_of_stay);
        self.length_of_stay = kept_days;
        self.discharged = next_year;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw(category: Option<&str>) -> RawClaim {
        RawClaim {
            admitted: date(2024, 3, 1),
            discharged: date(2024, 3, 4),
            benefit_category: category.map(BenefitCategory::from),
            network_type: None,
            length_of_stay: 3,
            cost: None,
        }
    }

    #[test]
    fn test_normalized_defaults() {
        let claim = MedicalClaim::normalized(&raw(None), None);

        assert!(claim.benefit_category.is_uncategorized());
        assert_eq!(claim.network_type, NetworkType::InNetwork);
        assert_eq!(claim.cost, Decimal::ZERO);
    }

    #[test]
    fn test_normalized_patches_category_and_forces_network() {
        let mut record = raw(Some("18"));
        record.network_type = Some(NetworkType::OutNetwork);

        let claim = MedicalClaim::normalized(&record, None);
        assert_eq!(claim.benefit_category.code(), "19");
        assert_eq!(claim.network_type, NetworkType::OutNetwork);

        let forced = MedicalClaim::normalized(&record, Some(NetworkType::InNetwork));
        assert_eq!(forced.network_type, NetworkType::InNetwork);
    }

    #[test]
    fn test_effective_discharge_ignores_recorded_date() {
        let mut claim = MedicalClaim::normalized(&raw(Some("25")), None);
        claim.discharged = date(2024, 3, 20);

        assert_eq!(claim.effective_discharge().unwrap(), date(2024, 3, 4));
    }

    #[test]
    fn test_truncated_at_year_boundary() {
        let claim = MedicalClaim {
            admitted: date(2024, 12, 27),
            discharged: date(2025, 1, 6),
            benefit_category: BenefitCategory::inpatient_hospital(),
            network_type: NetworkType::InNetwork,
            length_of_stay: 10,
            cost: dec!(1000),
        };

        let truncated = claim.truncated_at_year_boundary().unwrap();
        assert_eq!(truncated.length_of_stay, 5);
        assert_eq!(truncated.cost, dec!(500));
        assert_eq!(truncated.discharged, date(2025, 1, 1));
    }

    #[test]
    fn test_truncation_leaves_same_year_claims() {
        let claim = MedicalClaim::normalized(&raw(Some("25")), None);
        assert_eq!(claim.clone().truncated_at_year_boundary().unwrap(), claim);
    }
}
