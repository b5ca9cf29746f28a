//! IoT Hub SDK - Rust client for the Azure IoT Hub device registry
//!
//! Drives the `az` CLI (with the `azure-iot` extension) and maps its JSON
//! output to typed records. Authentication, transport and error semantics
//! are the tool's; errors it reports come back verbatim.
//!
//! # Example
//!
//! ```no_run
//! use iothub_sdk::{DeviceStatus, IoTHubRegistryManager, RegistryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // connection_string from ~/.config/iothub/config.toml or IOTHUB_CONNECTION_STRING
//!     let config = RegistryConfig::load(None)?;
//!     let registry = IoTHubRegistryManager::from_config(&config)?;
//!
//!     let device = registry
//!         .create_device_with_sas(
//!             "sensor-01",
//!             "cHJpbWFyeS1rZXktcHJpbWFyeS1rZXktMDEyMzQ1Ng==",
//!             "c2Vjb25kYXJ5LWtleS1zZWNvbmRhcnkta2V5LTAxMjM=",
//!             DeviceStatus::Enabled,
//!         )
//!         .await?;
//!     println!("created {}", device.device_id);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;

pub use crate::client::IoTHubRegistryManager;
pub use crate::config::{RegistryConfig, ENV_PREFIX};
pub use crate::error::{Result, SdkError};
pub use iothub_core::application::TwinUpdate;
pub use iothub_core::domain::{
    AuthenticationType, ConnectionState, ConnectionString, Device, DeviceStatus, ToolVersion,
    Twin, TwinProperties, IOT_EXTENSION,
};
