// Registry Service - Device identity and twin use cases
// Each operation is one tool invocation followed by mapping its JSON output

pub mod request;
pub mod validate;

#[cfg(test)]
mod validate_test;

pub use request::TwinUpdate;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::command::{quote_etag, AzCommand};
use crate::application::tool;
use crate::domain::{ConnectionString, Device, DeviceStatus, ToolVersion, Twin};
use crate::error::{AppError, Result};
use crate::port::CommandRunner;

/// Registry Service
///
/// Holds the hub connection string and the runner that reaches the tool.
pub struct RegistryService {
    runner: Arc<dyn CommandRunner>,
    connection_string: ConnectionString,
}

impl RegistryService {
    pub fn new(runner: Arc<dyn CommandRunner>, connection_string: ConnectionString) -> Self {
        Self {
            runner,
            connection_string,
        }
    }

    pub fn connection_string(&self) -> &ConnectionString {
        &self.connection_string
    }

    pub fn hub_name(&self) -> &str {
        self.connection_string.hub_name()
    }

    // ------------------------------------------------------------------
    // Twins
    // ------------------------------------------------------------------

    /// Fetch the twin of `device_id`
    pub async fn get_twin(&self, device_id: &str) -> Result<Twin> {
        validate::validate_device_id(device_id)?;

        let cmd = AzCommand::device_twin("show").arg("--device-id", device_id);
        self.fetch(cmd).await
    }

    /// Replace the desired properties of `device_id` with those of `twin`
    ///
    /// Only `twin.properties.desired` is sent; use [`Self::update_twin_with`]
    /// for tags or etag-conditional updates.
    pub async fn update_twin(&self, device_id: &str, twin: &Twin) -> Result<Twin> {
        validate::validate_device_id(device_id)?;

        let cmd = AzCommand::device_twin("update")
            .arg("--device-id", device_id)
            .arg("--desired", twin.desired_json()?);
        let updated: Twin = self.fetch(cmd).await?;

        info!(device_id = %device_id, version = ?updated.version, "Twin desired properties updated");
        Ok(updated)
    }

    pub async fn update_twin_with(&self, device_id: &str, update: TwinUpdate) -> Result<Twin> {
        validate::validate_device_id(device_id)?;

        if update.is_empty() {
            return Err(AppError::Validation(
                "twin update needs desired properties or tags".to_string(),
            ));
        }

        let desired = update.desired.as_ref().map(serde_json::to_string).transpose()?;
        let tags = update.tags.as_ref().map(serde_json::to_string).transpose()?;

        let cmd = AzCommand::device_twin("update")
            .arg("--device-id", device_id)
            .opt_arg("--desired", desired)
            .opt_arg("--tags", tags)
            .opt_arg("--etag", update.etag.as_deref().map(quote_etag));
        let updated: Twin = self.fetch(cmd).await?;

        info!(
            device_id = %device_id,
            conditional = update.etag.is_some(),
            version = ?updated.version,
            "Twin updated"
        );
        Ok(updated)
    }

    pub async fn list_twins(&self, top: Option<u32>) -> Result<Vec<Twin>> {
        validate::validate_top(top)?;

        let cmd = AzCommand::device_twin("list").opt_arg("--top", top.map(|t| t.to_string()));
        self.fetch(cmd).await
    }

    // ------------------------------------------------------------------
    // Device identities
    // ------------------------------------------------------------------

    /// Register a device that authenticates with the given SAS key pair
    pub async fn create_device_with_sas(
        &self,
        device_id: &str,
        primary_key: &str,
        secondary_key: &str,
        status: DeviceStatus,
    ) -> Result<Device> {
        validate::validate_device_id(device_id)?;
        validate::validate_sas_key("primary key", primary_key)?;
        validate::validate_sas_key("secondary key", secondary_key)?;
        validate::validate_status(status)?;

        let cmd = AzCommand::device_identity("create")
            .arg("--device-id", device_id)
            .arg("--primary-key", primary_key)
            .arg("--secondary-key", secondary_key)
            .arg("--status", status.to_string());
        let device: Device = self.fetch(cmd).await?;

        info!(device_id = %device.device_id, status = %status, "Device created (sas)");
        Ok(device)
    }

    /// Register a device that authenticates with self-signed certificates
    pub async fn create_device_with_x509(
        &self,
        device_id: &str,
        primary_thumbprint: &str,
        secondary_thumbprint: &str,
        status: DeviceStatus,
    ) -> Result<Device> {
        validate::validate_device_id(device_id)?;
        validate::validate_thumbprint("primary thumbprint", primary_thumbprint)?;
        validate::validate_thumbprint("secondary thumbprint", secondary_thumbprint)?;
        validate::validate_status(status)?;

        let cmd = AzCommand::device_identity("create")
            .arg("--device-id", device_id)
            .arg("--am", "x509_thumbprint")
            .arg("--ptp", primary_thumbprint)
            .arg("--stp", secondary_thumbprint)
            .arg("--status", status.to_string());
        let device: Device = self.fetch(cmd).await?;

        info!(device_id = %device.device_id, status = %status, "Device created (x509)");
        Ok(device)
    }

    pub async fn get_device(&self, device_id: &str) -> Result<Device> {
        validate::validate_device_id(device_id)?;

        let cmd = AzCommand::device_identity("show").arg("--device-id", device_id);
        self.fetch(cmd).await
    }

    pub async fn list_devices(&self, top: Option<u32>) -> Result<Vec<Device>> {
        validate::validate_top(top)?;

        let cmd =
            AzCommand::device_identity("list").opt_arg("--top", top.map(|t| t.to_string()));
        self.fetch(cmd).await
    }

    /// Enable or disable a device, optionally recording why
    pub async fn update_device_status(
        &self,
        device_id: &str,
        status: DeviceStatus,
        reason: Option<&str>,
    ) -> Result<Device> {
        validate::validate_device_id(device_id)?;
        validate::validate_status(status)?;

        let cmd = AzCommand::device_identity("update")
            .arg("--device-id", device_id)
            .arg("--status", status.to_string())
            .opt_arg("--status-reason", reason);
        let device: Device = self.fetch(cmd).await?;

        info!(device_id = %device_id, status = %status, "Device status updated");
        Ok(device)
    }

    /// Delete a device identity; with `etag`, only if it is unchanged
    pub async fn delete_device(&self, device_id: &str, etag: Option<&str>) -> Result<()> {
        validate::validate_device_id(device_id)?;

        let cmd = AzCommand::device_identity("delete")
            .arg("--device-id", device_id)
            .opt_arg("--etag", etag.map(quote_etag));
        self.invoke(cmd).await?;

        info!(device_id = %device_id, "Device deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tool
    // ------------------------------------------------------------------

    /// Version of the tool and its extensions (`az version`)
    pub async fn tool_version(&self) -> Result<ToolVersion> {
        tool::tool_version(self.runner.as_ref()).await
    }

    async fn invoke(&self, cmd: AzCommand) -> Result<Value> {
        let cmd = cmd.login(&self.connection_string);

        debug!(
            hub = %self.hub_name(),
            command = %cmd,
            "Invoking registry tool"
        );

        Ok(self.runner.run(&cmd.into_args()).await?)
    }

    async fn fetch<T: DeserializeOwned>(&self, cmd: AzCommand) -> Result<T> {
        let value = self.invoke(cmd).await?;
        Ok(serde_json::from_value(value)?)
    }
}
