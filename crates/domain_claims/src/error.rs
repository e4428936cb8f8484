//! Claims domain errors

use chrono::NaiveDate;
use thiserror::Error;

use core_kernel::{CoreError, TemporalError};
use domain_benefits::BenefitError;

/// Errors that abort an adjudication session
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Part A claim admitted {admitted} after a Part A claim admitted {previous}; claims must be in admission order")]
    AdmissionOrderViolation {
        previous: NaiveDate,
        admitted: NaiveDate,
    },

    #[error("Per-stay benefit period for category {category} requires a positive length of stay")]
    ZeroLengthStay { category: String },

    #[error("SNF claim admitted {admitted} has no qualifying prior stay")]
    UncoveredSnfClaim { admitted: NaiveDate },

    #[error("Inverted day range {start}..={end} for category {category}")]
    InvertedDayRange {
        category: String,
        start: u32,
        end: u32,
    },

    #[error("Unsupported benefit period '{name}' for category {category}")]
    UnsupportedBenefitPeriod { name: String, category: String },

    #[error("Invalid claim: {0}")]
    InvalidClaim(String),

    #[error(transparent)]
    Benefit(#[from] BenefitError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClaimError {
    pub fn invalid_claim(message: impl Into<String>) -> Self {
        ClaimError::InvalidClaim(message.into())
    }
}

impl From<TemporalError> for ClaimError {
    fn from(err: TemporalError) -> Self {
        ClaimError::Core(err.into())
    }
}
