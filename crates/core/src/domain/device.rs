// Device Identity Domain Model

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Device ID (registry-scoped, case-sensitive)
pub type DeviceId = String;

/// Registry-side enablement of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Enabled,
    Disabled,
    /// Reported by the registry but not known to this crate; never sent
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceStatus::Enabled => write!(f, "enabled"),
            DeviceStatus::Disabled => write!(f, "disabled"),
            DeviceStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for DeviceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "enabled" => Ok(DeviceStatus::Enabled),
            "disabled" => Ok(DeviceStatus::Disabled),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

/// Cloud connection state as last observed by the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Connected,
    Disconnected,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Unknown => write!(f, "Unknown"),
        }
    }
}

/// How a device proves its identity to the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthenticationType {
    Sas,
    SelfSigned,
    CertificateAuthority,
    None,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthenticationType::Sas => write!(f, "sas"),
            AuthenticationType::SelfSigned => write!(f, "selfSigned"),
            AuthenticationType::CertificateAuthority => write!(f, "certificateAuthority"),
            AuthenticationType::None => write!(f, "none"),
            AuthenticationType::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymmetricKey {
    pub primary_key: Option<String>,
    pub secondary_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X509Thumbprint {
    pub primary_thumbprint: Option<String>,
    pub secondary_thumbprint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationMechanism {
    #[serde(rename = "type")]
    pub auth_type: Option<AuthenticationType>,
    pub symmetric_key: Option<SymmetricKey>,
    pub x509_thumbprint: Option<X509Thumbprint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCapabilities {
    #[serde(default)]
    pub iot_edge: bool,
}

/// Device identity record (`az iot hub device-identity show` shape)
///
/// Only `deviceId` is mandatory; every other field is whatever the registry
/// reported, absent fields map to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: DeviceId,
    pub generation_id: Option<String>,
    pub etag: Option<String>,
    pub connection_state: Option<ConnectionState>,
    pub status: Option<DeviceStatus>,
    pub status_reason: Option<String>,
    #[serde(default, with = "crate::domain::timestamp")]
    pub connection_state_updated_time: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::domain::timestamp")]
    pub status_updated_time: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::domain::timestamp")]
    pub last_activity_time: Option<DateTime<Utc>>,
    pub cloud_to_device_message_count: Option<i64>,
    pub authentication: Option<AuthenticationMechanism>,
    pub capabilities: Option<DeviceCapabilities>,
    pub device_scope: Option<String>,
    pub parent_scopes: Option<Vec<String>>,
}

impl Device {
    /// Create an otherwise empty record for `device_id`
    pub fn new(device_id: impl Into<DeviceId>) -> Self {
        Self {
            device_id: device_id.into(),
            generation_id: None,
            etag: None,
            connection_state: None,
            status: None,
            status_reason: None,
            connection_state_updated_time: None,
            status_updated_time: None,
            last_activity_time: None,
            cloud_to_device_message_count: None,
            authentication: None,
            capabilities: None,
            device_scope: None,
            parent_scopes: None,
        }
    }

    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// The registry reports `0001-01-01T00:00:00Z` for devices that never
    /// talked to the hub.
    pub fn has_ever_connected(&self) -> bool {
        self.last_activity_time.is_some_and(|t| t.year() > 1)
    }

    pub fn is_edge(&self) -> bool {
        self.capabilities.as_ref().is_some_and(|c| c.iot_edge)
    }

    pub fn auth_type(&self) -> Option<AuthenticationType> {
        self.authentication.as_ref().and_then(|a| a.auth_type)
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.authentication
            .as_ref()
            .and_then(|a| a.symmetric_key.as_ref())
            .and_then(|k| k.primary_key.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "authentication": {
                "symmetricKey": {
                    "primaryKey": "cHJpbWFyeS1rZXktcHJpbWFyeS1rZXktMDEyMzQ1Ng==",
                    "secondaryKey": "c2Vjb25kYXJ5LWtleS1zZWNvbmRhcnkta2V5LTAxMjM="
                },
                "type": "sas",
                "x509Thumbprint": {
                    "primaryThumbprint": null,
                    "secondaryThumbprint": null
                }
            },
            "capabilities": { "iotEdge": false },
            "cloudToDeviceMessageCount": 0,
            "connectionState": "Disconnected",
            "connectionStateUpdatedTime": "0001-01-01T00:00:00+00:00",
            "deviceId": "sensor-01",
            "deviceScope": null,
            "etag": "NjQ1MTcwMzcx",
            "generationId": "638412345678901234",
            "lastActivityTime": "0001-01-01T00:00:00+00:00",
            "parentScopes": [],
            "status": "enabled",
            "statusReason": null,
            "statusUpdatedTime": "2024-03-01T10:15:30.1234567+00:00"
        })
    }

    #[test]
    fn test_parse_device_identity() {
        let device = Device::from_value(sample()).unwrap();

        assert_eq!(device.device_id, "sensor-01");
        assert_eq!(device.status, Some(DeviceStatus::Enabled));
        assert_eq!(device.connection_state, Some(ConnectionState::Disconnected));
        assert_eq!(device.auth_type(), Some(AuthenticationType::Sas));
        assert_eq!(
            device.primary_key(),
            Some("cHJpbWFyeS1rZXktcHJpbWFyeS1rZXktMDEyMzQ1Ng==")
        );
        assert_eq!(device.cloud_to_device_message_count, Some(0));
        assert_eq!(device.parent_scopes, Some(vec![]));
        assert!(!device.is_edge());
        assert!(!device.has_ever_connected());

        let updated = device.status_updated_time.unwrap();
        assert_eq!(updated.year(), 2024);
    }

    #[test]
    fn test_missing_optional_fields_are_none() {
        let device = Device::from_value(json!({ "deviceId": "bare" })).unwrap();

        assert_eq!(device, Device::new("bare"));
        assert!(device.last_activity_time.is_none());
        assert!(!device.has_ever_connected());
    }

    #[test]
    fn test_missing_device_id_is_rejected() {
        let result = Device::from_value(json!({ "status": "enabled" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_keys_match_parsed_keys() {
        let device = Device::from_value(sample()).unwrap();
        let value = device.to_value().unwrap();

        for key in [
            "deviceId",
            "generationId",
            "connectionStateUpdatedTime",
            "statusUpdatedTime",
            "lastActivityTime",
            "cloudToDeviceMessageCount",
            "deviceScope",
            "parentScopes",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["authentication"]["type"], "sas");
        assert_eq!(Device::from_value(value).unwrap(), device);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Enabled".parse::<DeviceStatus>().unwrap(), DeviceStatus::Enabled);
        assert_eq!("disabled".parse::<DeviceStatus>().unwrap(), DeviceStatus::Disabled);
        assert!("paused".parse::<DeviceStatus>().is_err());
        assert_eq!(DeviceStatus::Disabled.to_string(), "disabled");
    }

    #[test]
    fn test_naive_never_sentinel() {
        let device = Device::from_value(json!({
            "deviceId": "fresh-01",
            "connectionStateUpdatedTime": "0001-01-01T00:00:00",
            "lastActivityTime": "0001-01-01T00:00:00",
            "statusUpdatedTime": "2024-03-01T10:15:30.1234567"
        }))
        .unwrap();

        assert_eq!(device.last_activity_time.unwrap().year(), 1);
        assert_eq!(device.status_updated_time.unwrap().year(), 2024);
        assert!(!device.has_ever_connected());

        let value = device.to_value().unwrap();
        assert_eq!(Device::from_value(value).unwrap(), device);
    }

    #[test]
    fn test_malformed_timestamp_is_rejected() {
        let result = Device::from_value(json!({
            "deviceId": "d",
            "lastActivityTime": "last tuesday"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unrecognised_enum_values_do_not_fail_the_record() {
        let device = Device::from_value(json!({
            "deviceId": "d",
            "status": "suspended",
            "connectionState": "Reconnecting",
            "authentication": { "type": "tpm" }
        }))
        .unwrap();

        assert_eq!(device.status, Some(DeviceStatus::Unknown));
        assert_eq!(device.connection_state, Some(ConnectionState::Unknown));
        assert_eq!(device.auth_type(), Some(AuthenticationType::Unknown));
        assert!("unknown".parse::<DeviceStatus>().is_err());
    }

    #[test]
    fn test_recent_activity_counts_as_connected() {
        let mut device = Device::new("d");
        device.last_activity_time = Some("2024-05-01T08:00:00Z".parse().unwrap());
        assert!(device.has_ever_connected());
    }
}
