//! Simple SDK Example
//!
//! Walks one device through its lifecycle: create, read, twin update, disable, delete.
//!
//! # Usage
//!
//! 1. Install the CLI and extension:
//!    ```bash
//!    az extension add --name azure-iot
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    IOTHUB_CONNECTION_STRING="HostName=...;SharedAccessKeyName=iothubowner;SharedAccessKey=..." \
//!        cargo run --example simple
//!    ```

use iothub_sdk::{DeviceStatus, IoTHubRegistryManager, RegistryConfig};
use serde_json::json;

const DEVICE_ID: &str = "sdk-example-device";
const PRIMARY_KEY: &str = "cHJpbWFyeS1rZXktcHJpbWFyeS1rZXktMDEyMzQ1Ng==";
const SECONDARY_KEY: &str = "c2Vjb25kYXJ5LWtleS1zZWNvbmRhcnkta2V5LTAxMjM=";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("IoT Hub SDK - Simple Example");
    println!("============================\n");

    // 1. Load configuration
    println!("1. Loading configuration...");
    let config = RegistryConfig::load(None)?;
    let registry = IoTHubRegistryManager::from_config(&config)?;
    let version = registry.tool_version().await?;
    println!("   ✓ Hub: {}", registry.hub_name());
    println!(
        "   ✓ az {} (azure-iot {})\n",
        version.azure_cli,
        version.iot_extension().unwrap_or("missing")
    );

    // 2. Create a device
    println!("2. Creating device {}...", DEVICE_ID);
    let device = registry
        .create_device_with_sas(DEVICE_ID, PRIMARY_KEY, SECONDARY_KEY, DeviceStatus::Enabled)
        .await?;
    println!("   ✓ Device created:");
    println!("     - Generation: {}", device.generation_id.as_deref().unwrap_or("-"));
    println!("     - Etag: {}\n", device.etag.as_deref().unwrap_or("-"));

    // 3. Update desired properties
    println!("3. Updating twin...");
    let mut twin = registry.get_twin(DEVICE_ID).await?;
    twin.set_desired("telemetryInterval", json!(30));
    let twin = registry.update_twin(DEVICE_ID, &twin).await?;
    println!("   ✓ Twin version: {:?}", twin.version);
    println!("     - Desired: {}\n", twin.desired_json()?);

    // 4. Disable the device
    println!("4. Disabling device...");
    let device = registry
        .update_device_status(DEVICE_ID, DeviceStatus::Disabled, Some("sdk example finished"))
        .await?;
    println!("   ✓ Status: {:?}\n", device.status);

    // 5. Delete the device
    println!("5. Deleting device...");
    registry.delete_device(DEVICE_ID, None).await?;
    println!("   ✓ Deleted");

    println!("\n✓ Example completed successfully!");

    Ok(())
}
