//! Qualifying-stay cache for SNF eligibility
//!
//! An SNF stay is covered only if it follows a qualifying stay closely
//! enough. Each store keeps the single qualifying claim of its class with the
//! latest discharge seen so far; that is the only claim an eligibility check
//! needs.

use serde::{Deserialize, Serialize};

use crate::claim::MedicalClaim;
use crate::error::ClaimError;

/// Which prior stays a store remembers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimClass {
    /// Inpatient hospital or mental-health stays of at least the required length
    Inpatient,
    /// Skilled nursing stays of any length
    Snf,
}

/// Cache of the latest-discharging qualifying claim of one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimStore {
    class: ClaimClass,
    required_days: u32,
    cached: Option<MedicalClaim>,
}

impl ClaimStore {
    pub fn new(class: ClaimClass, required_days: u32) -> Self {
        Self {
            class,
            required_days,
            cached: None,
        }
    }

    pub fn inpatient(required_days: u32) -> Self {
        Self::new(ClaimClass::Inpatient, required_days)
    }

    pub fn snf(required_days: u32) -> Self {
        Self::new(ClaimClass::Snf, required_days)
    }

    pub fn class(&self) -> ClaimClass {
        self.class
    }

    pub fn cached(&self) -> Option<&MedicalClaim> {
        self.cached.as_ref()
    }

    /// Returns true if the claim is the kind of stay this store remembers
    pub fn qualifies(&self, claim: &MedicalClaim) -> bool {
        match self.class {
            ClaimClass::Inpatient => {
                claim.benefit_category.is_inpatient() && claim.length_of_stay >= self.required_days
            }
            ClaimClass::Snf => claim.benefit_category.is_snf(),
        }
    }

    /// Caches the claim if it qualifies and discharges strictly later than
    /// the cached one; returns whether it was cached
    pub fn cache_if_applicable(&mut self, claim: &MedicalClaim) -> Result<bool, ClaimError> {
        if !self.qualifies(claim) {
            return Ok(false);
        }

        let discharges_later = match &self.cached {
            None => true,
            Some(cached) => cached.effective_discharge()? < claim.effective_discharge()?,
        };

        if discharges_later {
            self.cached = Some(claim.clone());
        }
        Ok(discharges_later)
    }
}
