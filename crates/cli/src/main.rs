//! IoT Hub CLI - Command-line interface for the IoT Hub device registry

mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use iothub_sdk::{
    DeviceStatus, IoTHubRegistryManager, RegistryConfig, TwinUpdate, IOT_EXTENSION,
};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "iothub")]
#[command(about = "IoT Hub device registry CLI (drives `az iot hub`)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Hub connection string (service policy, e.g. iothubowner)
    #[arg(long, global = true, env = "IOTHUB_CONNECTION_STRING", hide_env_values = true)]
    connection_string: Option<String>,

    /// Config file (default: per-user config dir)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Path to the az executable
    #[arg(long, global = true)]
    az_path: Option<String>,

    /// Per-command timeout in seconds (0 = no limit)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Print the records as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Device twin operations
    #[command(subcommand)]
    Twin(TwinCommand),

    /// Device identity operations
    #[command(subcommand)]
    Device(DeviceCommand),

    /// Check the az installation and hub configuration
    Doctor,
}

#[derive(Subcommand)]
enum TwinCommand {
    /// Show a device twin
    Show {
        /// Device ID
        device_id: String,
    },

    /// Update desired properties and/or tags
    Update {
        /// Device ID
        device_id: String,

        /// Desired properties as a JSON object
        #[arg(long)]
        desired: Option<String>,

        /// Tags as a JSON object
        #[arg(long)]
        tags: Option<String>,

        /// Only apply if the twin still has this etag
        #[arg(long)]
        etag: Option<String>,
    },

    /// List device twins
    List {
        /// Maximum number of twins
        #[arg(long)]
        top: Option<u32>,
    },
}

#[derive(Subcommand)]
enum DeviceCommand {
    /// Register a device with symmetric key (SAS) authentication
    Create {
        /// Device ID
        device_id: String,

        /// Base64 primary key
        #[arg(long)]
        primary_key: String,

        /// Base64 secondary key
        #[arg(long)]
        secondary_key: String,

        /// enabled | disabled
        #[arg(long, default_value = "enabled")]
        status: DeviceStatus,
    },

    /// Register a device with self-signed X.509 authentication
    CreateX509 {
        /// Device ID
        device_id: String,

        /// Primary certificate thumbprint (hex)
        #[arg(long)]
        primary_thumbprint: String,

        /// Secondary certificate thumbprint (hex)
        #[arg(long)]
        secondary_thumbprint: String,

        /// enabled | disabled
        #[arg(long, default_value = "enabled")]
        status: DeviceStatus,
    },

    /// Show a device identity
    Show {
        /// Device ID
        device_id: String,
    },

    /// List device identities
    List {
        /// Maximum number of devices
        #[arg(long)]
        top: Option<u32>,
    },

    /// Enable or disable a device
    SetStatus {
        /// Device ID
        device_id: String,

        /// enabled | disabled
        status: DeviceStatus,

        /// Free-form reason stored with the status
        #[arg(long)]
        reason: Option<String>,
    },

    /// Delete a device identity
    Delete {
        /// Device ID
        device_id: String,

        /// Only delete if the device still has this etag
        #[arg(long)]
        etag: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let config = load_config(&cli)?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Doctor => doctor(&config).await,
        Commands::Twin(command) => {
            let registry = connect(&config)?;
            run_twin(&registry, command, cli.json).await
        }
        Commands::Device(command) => {
            let registry = connect(&config)?;
            run_device(&registry, command, cli.json).await
        }
    }
}

/// File and environment first, then whatever was given on the command line
fn load_config(cli: &Cli) -> Result<RegistryConfig> {
    let mut config =
        RegistryConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(connection_string) = &cli.connection_string {
        config.connection_string = Some(connection_string.clone());
    }
    if let Some(az_path) = &cli.az_path {
        config.az_path = az_path.clone();
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }

    Ok(config)
}

fn connect(config: &RegistryConfig) -> Result<IoTHubRegistryManager> {
    IoTHubRegistryManager::from_config(config).context("Cannot connect to the registry")
}

fn parse_object(raw: &str, what: &str) -> Result<Map<String, Value>> {
    let value: Value =
        serde_json::from_str(raw).with_context(|| format!("Invalid JSON for --{}", what))?;
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("--{} must be a JSON object, got {}", what, other),
    }
}

async fn run_twin(registry: &IoTHubRegistryManager, command: TwinCommand, json: bool) -> Result<()> {
    match command {
        TwinCommand::Show { device_id } => {
            let twin = registry.get_twin(&device_id).await?;
            if json {
                output::print_json(&twin)?;
            } else {
                output::print_twin(&format!("Twin of {}", device_id), &twin)?;
            }
        }

        TwinCommand::Update {
            device_id,
            desired,
            tags,
            etag,
        } => {
            let update = TwinUpdate {
                desired: desired.as_deref().map(|d| parse_object(d, "desired")).transpose()?,
                tags: tags.as_deref().map(|t| parse_object(t, "tags")).transpose()?,
                etag,
            };
            if update.is_empty() {
                anyhow::bail!("Nothing to update: pass --desired and/or --tags");
            }

            let twin = registry.update_twin_with(&device_id, update).await?;
            if json {
                output::print_json(&twin)?;
            } else {
                output::print_twin(&format!("✓ Twin of {} updated", device_id), &twin)?;
            }
        }

        TwinCommand::List { top } => {
            let twins = registry.list_twins(top).await?;
            if json {
                output::print_json(&twins)?;
            } else {
                output::print_twins(&twins);
            }
        }
    }

    Ok(())
}

async fn run_device(
    registry: &IoTHubRegistryManager,
    command: DeviceCommand,
    json: bool,
) -> Result<()> {
    match command {
        DeviceCommand::Create {
            device_id,
            primary_key,
            secondary_key,
            status,
        } => {
            let device = registry
                .create_device_with_sas(&device_id, &primary_key, &secondary_key, status)
                .await?;
            if json {
                output::print_json(&device)?;
            } else {
                output::print_device(&format!("✓ Device {} created", device_id), &device);
            }
        }

        DeviceCommand::CreateX509 {
            device_id,
            primary_thumbprint,
            secondary_thumbprint,
            status,
        } => {
            let device = registry
                .create_device_with_x509(
                    &device_id,
                    &primary_thumbprint,
                    &secondary_thumbprint,
                    status,
                )
                .await?;
            if json {
                output::print_json(&device)?;
            } else {
                output::print_device(&format!("✓ Device {} created", device_id), &device);
            }
        }

        DeviceCommand::Show { device_id } => {
            let device = registry.get_device(&device_id).await?;
            if json {
                output::print_json(&device)?;
            } else {
                output::print_device(&format!("Device {}", device_id), &device);
            }
        }

        DeviceCommand::List { top } => {
            let devices = registry.list_devices(top).await?;
            if json {
                output::print_json(&devices)?;
            } else {
                output::print_devices(&devices);
            }
        }

        DeviceCommand::SetStatus {
            device_id,
            status,
            reason,
        } => {
            let device = registry
                .update_device_status(&device_id, status, reason.as_deref())
                .await?;
            if json {
                output::print_json(&device)?;
            } else {
                println!(
                    "{} {}",
                    format!("✓ Device {} is now", device_id).green().bold(),
                    output::status_label(status)
                );
            }
        }

        DeviceCommand::Delete { device_id, etag } => {
            registry.delete_device(&device_id, etag.as_deref()).await?;
            if !json {
                println!("{}", format!("✓ Device {} deleted", device_id).green().bold());
            }
        }
    }

    Ok(())
}

async fn doctor(config: &RegistryConfig) -> Result<()> {
    println!("{}", "IoT Hub CLI Doctor".cyan().bold());
    println!();

    match RegistryConfig::default_path() {
        Some(path) => println!("  {} {}", "Config file:".bold(), path.display()),
        None => println!("  {} {}", "Config file:".bold(), "no home directory".yellow()),
    }
    println!("  {} {}", "az path:".bold(), config.az_path);
    match config.timeout() {
        Some(timeout) => println!("  {} {}s", "Timeout:".bold(), timeout.as_secs()),
        None => println!("  {} none", "Timeout:".bold()),
    }
    println!();

    match IoTHubRegistryManager::probe_tool(config).await {
        Ok(version) => {
            output::print_tool(&version);
            if version.iot_extension().is_none() {
                println!(
                    "  {} {} extension missing (az extension add --name {})",
                    "✗".red(),
                    IOT_EXTENSION,
                    IOT_EXTENSION
                );
            }
        }
        Err(e) => {
            println!("  {} {}", "az:".bold(), "ERROR".red());
            println!("  {} {}", "Error:".bold(), e);
        }
    }
    println!();

    match config.parsed_connection_string() {
        Ok(connection_string) => {
            println!("  {} {}", "Hub:".bold(), connection_string.hub_name().green());
            println!(
                "  {} {}",
                "Policy:".bold(),
                connection_string.key_name().unwrap_or("-")
            );
            if connection_string.is_device_scoped() {
                println!(
                    "  {} device-scoped connection string, registry calls will be rejected",
                    "✗".red()
                );
            }
        }
        Err(e) => println!("  {} {}", "Hub:".bold(), e.to_string().yellow()),
    }

    Ok(())
}
