//! Benefit categories
//!
//! Claims and plan benefit tables are keyed by a numeric benefit-category
//! code ("1" through "49"). Part A covers the institutional categories:
//!
//! | Code | Service                      |
//! |------|------------------------------|
//! | 25   | Inpatient hospital           |
//! | 26   | Inpatient mental health      |
//! | 44   | Skilled nursing facility     |
//!
//! Every other code in range is Part B. Code "0" marks a claim that could
//! not be categorized.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A benefit-category code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BenefitCategory(String);

impl BenefitCategory {
    pub const UNCATEGORIZED: &'static str = "0";
    pub const INPATIENT_HOSPITAL: &'static str = "25";
    pub const INPATIENT_MENTAL_HEALTH: &'static str = "26";
    pub const SKILLED_NURSING: &'static str = "44";

    /// Highest category code with benefit definitions
    pub const MAX_CODE: u32 = 49;

    /// Creates a category from its code
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn uncategorized() -> Self {
        Self::new(Self::UNCATEGORIZED)
    }

    pub fn inpatient_hospital() -> Self {
        Self::new(Self::INPATIENT_HOSPITAL)
    }

    pub fn inpatient_mental_health() -> Self {
        Self::new(Self::INPATIENT_MENTAL_HEALTH)
    }

    pub fn skilled_nursing() -> Self {
        Self::new(Self::SKILLED_NURSING)
    }

    /// All Part A categories, in the order benefit periods are registered
    pub fn part_a() -> [BenefitCategory; 3] {
        [
            Self::inpatient_hospital(),
            Self::inpatient_mental_health(),
            Self::skilled_nursing(),
        ]
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn is_uncategorized(&self) -> bool {
        self.0 == Self::UNCATEGORIZED
    }

    pub fn is_inpatient(&self) -> bool {
        self.0 == Self::INPATIENT_HOSPITAL || self.0 == Self::INPATIENT_MENTAL_HEALTH
    }

    pub fn is_snf(&self) -> bool {
        self.0 == Self::SKILLED_NURSING
    }

    /// Institutional categories with day-interval cost sharing
    pub fn is_part_a(&self) -> bool {
        self.is_inpatient() || self.is_snf()
    }

    /// Any in-range category that is not Part A
    pub fn is_part_b(&self) -> bool {
        let in_range = self
            .0
            .parse::<u32>()
            .map(|code| (1..=Self::MAX_CODE).contains(&code))
            .unwrap_or(false);
        in_range && !self.is_part_a()
    }

    /// The category whose benefit table applies to claims in this category
    ///
    /// Claims canonicalization files ambulance, emergency and urgent care
    /// claims under the more generous "admitted" codes (1, 18, 47); those are
    /// read with their less generous counterparts. Several other codes have
    /// no benefit table of their own and borrow a sibling's.
    pub fn patched(&self) -> BenefitCategory {
        let patched = match self.0.as_str() {
            "1" => "2",   // ambulance
            "18" => "19", // emergency care
            "47" => "48", // urgently needed care
            "21" | "22" | "23" => "20", // hearing services
            "27" => "28", // renal disease
            "33" | "34" | "38" => "37", // outpatient mental health
            "36" => "35",
            other => other,
        };
        BenefitCategory::new(patched)
    }
}

impl Default for BenefitCategory {
    fn default() -> Self {
        Self::uncategorized()
    }
}

impl fmt::Display for BenefitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BenefitCategory {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<u32> for BenefitCategory {
    fn from(code: u32) -> Self {
        Self::new(code.to_string())
    }
}

// Claim feeds carry category codes both as strings and as integers.
impl<'de> Deserialize<'de> for BenefitCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawCode {
            Text(String),
            Number(u64),
        }

        Ok(match RawCode::deserialize(deserializer)? {
            RawCode::Text(code) => BenefitCategory(code),
            RawCode::Number(code) => BenefitCategory(code.to_string()),
        })
    }
}
