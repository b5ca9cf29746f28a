//! SDK Error Types

use iothub_core::domain::DomainError;
use iothub_core::AppError;
use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registry operation failed; tool errors display verbatim
    #[error(transparent)]
    Registry(#[from] AppError),
}

impl SdkError {
    /// The external tool's own error text, if that is where the failure came from
    pub fn tool_message(&self) -> Option<&str> {
        match self {
            SdkError::Registry(e) => e.tool_message(),
            SdkError::Config(_) => None,
        }
    }
}

impl From<config::ConfigError> for SdkError {
    fn from(e: config::ConfigError) -> Self {
        SdkError::Config(e.to_string())
    }
}

impl From<DomainError> for SdkError {
    fn from(e: DomainError) -> Self {
        SdkError::Config(e.to_string())
    }
}
