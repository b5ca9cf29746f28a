// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The tool answered, but not with the document shape we expected
    #[error("Unexpected response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Pass-through of whatever the external tool reported
    #[error(transparent)]
    Execution(#[from] crate::port::ExecutionError),
}

impl AppError {
    /// The tool's own error text, when the failure came from the tool
    pub fn tool_message(&self) -> Option<&str> {
        match self {
            AppError::Execution(crate::port::ExecutionError::ToolFailed { message, .. }) => {
                Some(message)
            }
            _ => None,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
