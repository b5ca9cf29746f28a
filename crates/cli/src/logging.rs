// Log setup for the CLI
//
// Logs go to stderr so `--json` output on stdout stays machine readable.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FORMAT_VAR: &str = "IOTHUB_LOG_FORMAT";

fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "iothub=warn",
        1 => "iothub=info",
        _ => "iothub=debug",
    }
}

/// `RUST_LOG` wins over `-v`
pub fn init(verbose: u8) -> Result<()> {
    let log_format = std::env::var(LOG_FORMAT_VAR).unwrap_or_else(|_| "compact".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))?;

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
