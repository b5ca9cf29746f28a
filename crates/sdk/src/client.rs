//! IoT Hub Registry Manager

use iothub_core::application::{tool_version, RegistryService, TwinUpdate};
use iothub_core::domain::{ConnectionString, Device, DeviceStatus, ToolVersion, Twin};
use iothub_core::port::CommandRunner;
use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::error::Result;

/// IoT Hub device registry client
///
/// Every call runs one `az iot hub ...` command with the hub connection
/// string as `--login` and maps the JSON it prints.
///
/// # Example
///
/// ```no_run
/// use iothub_sdk::IoTHubRegistryManager;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = IoTHubRegistryManager::new(
///     "HostName=my-hub.azure-devices.net;SharedAccessKeyName=iothubowner;SharedAccessKey=...",
/// )?;
/// let twin = registry.get_twin("sensor-01").await?;
/// println!("reported: {:?}", twin.properties.reported);
/// # Ok(())
/// # }
/// ```
pub struct IoTHubRegistryManager {
    service: RegistryService,
}

impl IoTHubRegistryManager {
    /// Client using the `az` found on `PATH` with default settings
    pub fn new(connection_string: impl Into<String>) -> Result<Self> {
        Self::from_config(&RegistryConfig::default().with_connection_string(connection_string))
    }

    /// Client wired from a loaded [`RegistryConfig`]
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let connection_string = config.parsed_connection_string()?;
        let runner = Arc::new(config.runner());

        tracing::debug!(
            hub = %connection_string.hub_name(),
            program = %runner.program().display(),
            "Registry client configured"
        );

        Ok(Self {
            service: RegistryService::new(runner, connection_string),
        })
    }

    /// Client over a caller-supplied runner (tests, alternative transports)
    pub fn with_runner(
        runner: Arc<dyn CommandRunner>,
        connection_string: impl Into<String>,
    ) -> Result<Self> {
        let connection_string = ConnectionString::parse(connection_string)?;
        Ok(Self {
            service: RegistryService::new(runner, connection_string),
        })
    }

    /// Query the installed tool without a hub connection (`az version`)
    pub async fn probe_tool(config: &RegistryConfig) -> Result<ToolVersion> {
        let runner = config.runner();
        Ok(tool_version(&runner).await?)
    }

    pub fn hub_name(&self) -> &str {
        self.service.hub_name()
    }

    /// Fetch a device twin
    pub async fn get_twin(&self, device_id: &str) -> Result<Twin> {
        Ok(self.service.get_twin(device_id).await?)
    }

    /// Push `twin`'s desired properties to `device_id`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use iothub_sdk::IoTHubRegistryManager;
    /// # async fn example(registry: IoTHubRegistryManager) -> Result<(), Box<dyn std::error::Error>> {
    /// let mut twin = registry.get_twin("sensor-01").await?;
    /// twin.set_desired("interval", serde_json::json!(60));
    /// let updated = registry.update_twin("sensor-01", &twin).await?;
    /// assert_eq!(updated.properties.desired["interval"], 60);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update_twin(&self, device_id: &str, twin: &Twin) -> Result<Twin> {
        Ok(self.service.update_twin(device_id, twin).await?)
    }

    /// Update desired properties and/or tags, optionally conditional on an etag
    pub async fn update_twin_with(&self, device_id: &str, update: TwinUpdate) -> Result<Twin> {
        Ok(self.service.update_twin_with(device_id, update).await?)
    }

    pub async fn list_twins(&self, top: Option<u32>) -> Result<Vec<Twin>> {
        Ok(self.service.list_twins(top).await?)
    }

    pub async fn create_device_with_sas(
        &self,
        device_id: &str,
        primary_key: &str,
        secondary_key: &str,
        status: DeviceStatus,
    ) -> Result<Device> {
        Ok(self
            .service
            .create_device_with_sas(device_id, primary_key, secondary_key, status)
            .await?)
    }

    pub async fn create_device_with_x509(
        &self,
        device_id: &str,
        primary_thumbprint: &str,
        secondary_thumbprint: &str,
        status: DeviceStatus,
    ) -> Result<Device> {
        Ok(self
            .service
            .create_device_with_x509(device_id, primary_thumbprint, secondary_thumbprint, status)
            .await?)
    }

    pub async fn get_device(&self, device_id: &str) -> Result<Device> {
        Ok(self.service.get_device(device_id).await?)
    }

    pub async fn list_devices(&self, top: Option<u32>) -> Result<Vec<Device>> {
        Ok(self.service.list_devices(top).await?)
    }

    pub async fn update_device_status(
        &self,
        device_id: &str,
        status: DeviceStatus,
        reason: Option<&str>,
    ) -> Result<Device> {
        Ok(self
            .service
            .update_device_status(device_id, status, reason)
            .await?)
    }

    pub async fn delete_device(&self, device_id: &str, etag: Option<&str>) -> Result<()> {
        Ok(self.service.delete_device(device_id, etag).await?)
    }

    /// Installed `az` and extension versions
    pub async fn tool_version(&self) -> Result<ToolVersion> {
        Ok(self.service.tool_version().await?)
    }
}
