//! Batch error handling

use thiserror::Error;

use core_kernel::PortError;
use domain_claims::ClaimError;

/// Errors that stop a batch run
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid setting {setting}: {message}")]
    InvalidSetting { setting: String, message: String },

    #[error("Port error: {0}")]
    Port(#[from] PortError),

    #[error("Adjudication error: {0}")]
    Claim(#[from] ClaimError),
}

impl BatchError {
    pub fn invalid_setting(setting: impl Into<String>, message: impl Into<String>) -> Self {
        BatchError::InvalidSetting {
            setting: setting.into(),
            message: message.into(),
        }
    }
}
