// Command Runner Port
// Abstraction over the external registry tool (subprocess in production, scripted in tests)

use async_trait::async_trait;
use thiserror::Error;

/// Execution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process timeout after {0}ms")]
    Timeout(u64),

    /// The tool ran and reported an error; `message` is its own text, untouched
    #[error("{message}")]
    ToolFailed {
        exit_code: Option<i32>,
        message: String,
    },

    #[error("Invalid tool output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl ExecutionError {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecutionError::ToolFailed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

/// Command Runner trait
///
/// Implementations:
/// - AzCliRunner: spawns the `az` executable
/// - MockCommandRunner: records argv and replays scripted responses
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the tool with `args` and return its parsed JSON output
    ///
    /// A successful run with no output yields `Value::Null`.
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the tool cannot be started
    /// - ExecutionError::ToolFailed if the tool exits unsuccessfully
    /// - ExecutionError::InvalidOutput if stdout is not JSON
    /// - ExecutionError::Timeout if the run exceeds the configured limit
    async fn run(&self, args: &[String]) -> Result<serde_json::Value, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted outcome of one mock invocation
    #[derive(Debug, Clone)]
    pub enum MockResponse {
        /// Tool printed this JSON document
        Json(serde_json::Value),
        /// Tool exited with `exit_code` and printed `message` on stderr
        Fail { exit_code: i32, message: String },
        /// Tool could not be started
        SpawnFailed(String),
    }

    /// Mock Command Runner for testing
    ///
    /// Responses are consumed in order; once exhausted every call returns `null`.
    #[derive(Clone, Default)]
    pub struct MockCommandRunner {
        responses: Arc<Mutex<VecDeque<MockResponse>>>,
        calls: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl MockCommandRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_json(value: serde_json::Value) -> Self {
            let runner = Self::new();
            runner.push(MockResponse::Json(value));
            runner
        }

        pub fn with_failure(exit_code: i32, message: impl Into<String>) -> Self {
            let runner = Self::new();
            runner.push(MockResponse::Fail {
                exit_code,
                message: message.into(),
            });
            runner
        }

        pub fn push(&self, response: MockResponse) {
            self.responses.lock().unwrap().push_back(response);
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn last_call(&self) -> Option<Vec<String>> {
            self.calls.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl CommandRunner for MockCommandRunner {
        async fn run(&self, args: &[String]) -> Result<serde_json::Value, ExecutionError> {
            self.calls.lock().unwrap().push(args.to_vec());

            let next = self.responses.lock().unwrap().pop_front();

            match next {
                None => Ok(serde_json::Value::Null),
                Some(MockResponse::Json(value)) => Ok(value),
                Some(MockResponse::Fail { exit_code, message }) => {
                    Err(ExecutionError::ToolFailed {
                        exit_code: Some(exit_code),
                        message,
                    })
                }
                Some(MockResponse::SpawnFailed(msg)) => Err(ExecutionError::SpawnFailed(msg)),
            }
        }
    }
}
