// IoT Hub Infrastructure - System Adapters
// Implements: CommandRunner

pub mod az_cli_runner;

pub use az_cli_runner::{AzCliRunner, DEFAULT_ENV_ALLOWLIST, DEFAULT_PROGRAM};
