// az CLI runner implementation
// reason: async-trait, tokio for async process management
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use iothub_core::application::command::redact_args;
use iothub_core::port::{CommandRunner, ExecutionError};

/// `az` is a batch wrapper on Windows and must be named with its extension
#[cfg(windows)]
pub const DEFAULT_PROGRAM: &str = "az.cmd";
#[cfg(not(windows))]
pub const DEFAULT_PROGRAM: &str = "az";

/// Parent environment variables the tool needs to find its profile,
/// extensions, proxy settings and interpreter
pub const DEFAULT_ENV_ALLOWLIST: &[&str] = &[
    "PATH",
    "HOME",
    "USER",
    "LANG",
    "LC_ALL",
    "TMPDIR",
    "AZURE_CONFIG_DIR",
    "AZURE_EXTENSION_DIR",
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "NO_PROXY",
    "REQUESTS_CA_BUNDLE",
    "SYSTEMROOT",
    "USERPROFILE",
    "APPDATA",
    "LOCALAPPDATA",
    "TEMP",
    "TMP",
    "PATHEXT",
    "COMSPEC",
];

/// Flags appended to every invocation so stdout is always one JSON document
const OUTPUT_ARGS: [&str; 3] = ["--output", "json", "--only-show-errors"];

/// Runs the registry tool as a child process
/// Spawns with a cleared environment rebuilt from an allowlist
pub struct AzCliRunner {
    program: PathBuf,
    env_allowlist: Vec<String>,
    timeout: Option<Duration>,
}

impl AzCliRunner {
    /// Create a new runner
    ///
    /// # Arguments
    /// * `program` - Tool executable (name resolved through `PATH`, or a path)
    /// * `env_allowlist` - Parent environment variables passed through to the tool
    ///
    /// # Example
    /// ```ignore
    /// let runner = AzCliRunner::new("az", vec!["PATH".to_string(), "HOME".to_string()])
    ///     .with_timeout(Duration::from_secs(60));
    /// ```
    pub fn new(program: impl Into<PathBuf>, env_allowlist: Vec<String>) -> Self {
        Self {
            program: program.into(),
            env_allowlist,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Filter environment variables to allowlist only
    fn filter_env<I>(&self, env: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        env.into_iter()
            .filter(|(k, _)| self.env_allowlist.contains(k))
            .collect()
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(&self, args: &[String]) -> Result<Output, ExecutionError> {
        let filtered_env = self.filter_env(std::env::vars());

        let child = Command::new(&self.program)
            .args(args)
            .args(OUTPUT_ARGS)
            .env_clear()
            .envs(&filtered_env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ExecutionError::SpawnFailed(format!("{}: {}", self.program.display(), e))
            })?;

        if let Some(limit) = self.timeout {
            // Dropping the wait future on expiry kills the child (kill_on_drop)
            match timeout(limit, child.wait_with_output()).await {
                Ok(Ok(output)) => Ok(output),
                Ok(Err(e)) => Err(ExecutionError::IoError(e.to_string())),
                Err(_) => Err(ExecutionError::Timeout(limit.as_millis() as u64)),
            }
        } else {
            child
                .wait_with_output()
                .await
                .map_err(|e| ExecutionError::IoError(e.to_string()))
        }
    }

    /// Map process output to the parsed JSON document or the tool's own error
    fn parse_output(output: Output) -> Result<serde_json::Value, ExecutionError> {
        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(ExecutionError::ToolFailed {
                exit_code: output.status.code(),
                message,
            });
        }

        let body = stdout.trim();
        if body.is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(body).map_err(|e| ExecutionError::InvalidOutput(e.to_string()))
    }
}

#[async_trait]
impl CommandRunner for AzCliRunner {
    async fn run(&self, args: &[String]) -> Result<serde_json::Value, ExecutionError> {
        let started = Instant::now();

        debug!(
            program = %self.program.display(),
            args = %redact_args(args),
            timeout_ms = ?self.timeout.map(|t| t.as_millis()),
            "Starting tool invocation"
        );

        let result = self
            .spawn_and_wait(args)
            .await
            .and_then(Self::parse_output);
        let duration_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(
                program = %self.program.display(),
                duration_ms = duration_ms,
                "Tool invocation completed"
            ),
            Err(e) => warn!(
                program = %self.program.display(),
                duration_ms = duration_ms,
                exit_code = ?e.exit_code(),
                error = %e,
                "Tool invocation failed"
            ),
        }

        result
    }
}
