//! Benefit domain errors
//!
//! Every variant here is a plan configuration problem. None of them are
//! recoverable inside an adjudication session.

use thiserror::Error;

/// Errors that can occur while reading a plan's benefit definition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BenefitError {
    /// Plan-wide thresholds must be annual
    #[error("{kind} threshold at {scope} scope has period {period} days (only 365 is supported)")]
    InvalidThresholdPeriod {
        kind: String,
        scope: String,
        period: u32,
    },

    /// Copay and coinsurance disagree on where the last day interval ends
    /// (`None` is open-ended)
    #[error("Day interval mismatch: copay ends at {copay:?}, coinsurance ends at {coinsurance:?}")]
    IntervalMaxMismatch {
        copay: Option<u32>,
        coinsurance: Option<u32>,
    },

    /// Other malformed benefit data
    #[error("Validation error: {0}")]
    Validation(String),
}

impl BenefitError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        BenefitError::Validation(message.into())
    }
}
