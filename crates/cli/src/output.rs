// Table and JSON rendering for registry records

use anyhow::Result;
use colored::Colorize;
use iothub_sdk::{Device, DeviceStatus, ToolVersion, Twin};
use serde::Serialize;
use std::fmt::Display;
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub struct DeviceRow {
    #[tabled(rename = "Device ID")]
    device_id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Connection")]
    connection: String,
    #[tabled(rename = "Auth")]
    auth: String,
    #[tabled(rename = "Edge")]
    edge: String,
    #[tabled(rename = "Last Activity")]
    last_activity: String,
}

impl From<&Device> for DeviceRow {
    fn from(device: &Device) -> Self {
        let last_activity = match device.last_activity_time {
            Some(t) if device.has_ever_connected() => t.to_rfc3339(),
            _ => "never".to_string(),
        };

        Self {
            device_id: device.device_id.clone(),
            status: or_dash(device.status),
            connection: or_dash(device.connection_state),
            auth: or_dash(device.auth_type()),
            edge: if device.is_edge() { "yes" } else { "no" }.to_string(),
            last_activity,
        }
    }
}

#[derive(Tabled)]
pub struct TwinRow {
    #[tabled(rename = "Device ID")]
    device_id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Connection")]
    connection: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Desired")]
    desired: usize,
    #[tabled(rename = "Reported")]
    reported: usize,
}

impl From<&Twin> for TwinRow {
    fn from(twin: &Twin) -> Self {
        Self {
            device_id: twin.device_id.clone(),
            status: or_dash(twin.status),
            connection: or_dash(twin.connection_state),
            version: or_dash(twin.version),
            desired: user_keys(&twin.properties.desired),
            reported: user_keys(&twin.properties.reported),
        }
    }
}

fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Property count without the `$metadata`/`$version` bookkeeping keys
fn user_keys(props: &serde_json::Map<String, serde_json::Value>) -> usize {
    props.keys().filter(|k| !k.starts_with('$')).count()
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_device(headline: &str, device: &Device) {
    println!("{}", headline.green().bold());
    println!();
    println!("{}", Table::new([DeviceRow::from(device)]));

    if let Some(reason) = &device.status_reason {
        println!("  {} {}", "Status reason:".bold(), reason);
    }
    if let Some(etag) = &device.etag {
        println!("  {} {}", "Etag:".bold(), etag);
    }
}

pub fn print_devices(devices: &[Device]) {
    if devices.is_empty() {
        println!("{}", "No devices registered".yellow());
        return;
    }

    let rows: Vec<DeviceRow> = devices.iter().map(DeviceRow::from).collect();
    println!("{}", Table::new(rows));
    println!("{} device(s)", devices.len());
}

pub fn print_twin(headline: &str, twin: &Twin) -> Result<()> {
    println!("{}", headline.green().bold());
    println!();
    println!("{}", Table::new([TwinRow::from(twin)]));
    println!();

    if let Some(tags) = &twin.tags {
        println!("{}", "Tags:".cyan().bold());
        println!("{}", serde_json::to_string_pretty(tags)?);
    }
    println!("{}", "Desired:".cyan().bold());
    println!("{}", serde_json::to_string_pretty(&twin.properties.desired)?);
    println!("{}", "Reported:".cyan().bold());
    println!("{}", serde_json::to_string_pretty(&twin.properties.reported)?);

    Ok(())
}

pub fn print_twins(twins: &[Twin]) {
    if twins.is_empty() {
        println!("{}", "No device twins".yellow());
        return;
    }

    let rows: Vec<TwinRow> = twins.iter().map(TwinRow::from).collect();
    println!("{}", Table::new(rows));
    println!("{} twin(s)", twins.len());
}

pub fn print_tool(version: &ToolVersion) {
    println!("  {} {}", "azure-cli:".bold(), version.azure_cli.green());
    for (name, ext_version) in &version.extensions {
        println!("  {} {}", format!("{}:", name).bold(), ext_version);
    }
}

pub fn status_label(status: DeviceStatus) -> colored::ColoredString {
    match status {
        DeviceStatus::Enabled => status.to_string().green(),
        DeviceStatus::Disabled => status.to_string().yellow(),
        DeviceStatus::Unknown => status.to_string().red(),
    }
}
