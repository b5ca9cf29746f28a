//! Client Configuration
//!
//! Layered: serde defaults, then a TOML file, then `IOTHUB_*` environment
//! variables. Callers (the CLI) apply their own overrides on the result.
//!
//! ```toml
//! connection_string = "HostName=my-hub.azure-devices.net;SharedAccessKeyName=iothubowner;SharedAccessKey=..."
//! az_path = "~/.local/bin/az"
//! timeout_secs = 120
//! env_allowlist = ["PATH", "HOME", "AZURE_CONFIG_DIR"]
//! ```

use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use iothub_core::domain::ConnectionString;
use iothub_infra_system::{AzCliRunner, DEFAULT_ENV_ALLOWLIST, DEFAULT_PROGRAM};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, SdkError};

pub const ENV_PREFIX: &str = "IOTHUB";
const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub connection_string: Option<String>,
    #[serde(default = "default_az_path")]
    pub az_path: String,
    /// 0 disables the limit
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_env_allowlist")]
    pub env_allowlist: Vec<String>,
}

fn default_az_path() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_env_allowlist() -> Vec<String> {
    DEFAULT_ENV_ALLOWLIST.iter().map(|s| s.to_string()).collect()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            az_path: default_az_path(),
            timeout_secs: default_timeout_secs(),
            env_allowlist: default_env_allowlist(),
        }
    }
}

impl std::fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryConfig")
            .field(
                "connection_string",
                &self.connection_string.as_ref().map(|_| "<set>"),
            )
            .field("az_path", &self.az_path)
            .field("timeout_secs", &self.timeout_secs)
            .field("env_allowlist", &self.env_allowlist)
            .finish()
    }
}

impl RegistryConfig {
    /// Per-user config file (`~/.config/iothub/config.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "iothub").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load configuration
    ///
    /// An explicit `path` must exist (`~` is expanded); the per-user default
    /// file is optional.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                let expanded = PathBuf::from(shellexpand::tilde(p).into_owned());
                builder = builder.add_source(
                    File::from(expanded)
                        .format(FileFormat::Toml)
                        .required(true),
                );
            }
            None => {
                if let Some(default) = Self::default_path() {
                    tracing::debug!(path = %default.display(), "Looking for default config file");
                    builder = builder.add_source(
                        File::from(default)
                            .format(FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("env_allowlist"),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    pub fn parsed_connection_string(&self) -> Result<ConnectionString> {
        let raw = self.connection_string.as_deref().ok_or_else(|| {
            SdkError::Config(format!(
                "no connection string (set {}_CONNECTION_STRING or connection_string in the config file)",
                ENV_PREFIX
            ))
        })?;
        Ok(ConnectionString::parse(raw)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Build the process adapter described by this configuration
    pub fn runner(&self) -> AzCliRunner {
        let program = shellexpand::tilde(&self.az_path).into_owned();
        let runner = AzCliRunner::new(program, self.env_allowlist.clone());
        match self.timeout() {
            Some(limit) => runner.with_timeout(limit),
            None => runner,
        }
    }
}
