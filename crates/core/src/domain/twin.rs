// Device Twin Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::device::{
    AuthenticationType, ConnectionState, DeviceCapabilities, DeviceId, DeviceStatus,
    X509Thumbprint,
};

/// Desired and reported property documents of a twin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwinProperties {
    #[serde(default)]
    pub desired: Map<String, Value>,
    #[serde(default)]
    pub reported: Map<String, Value>,
}

impl TwinProperties {
    pub fn new(desired: Map<String, Value>, reported: Map<String, Value>) -> Self {
        Self { desired, reported }
    }
}

/// Device (or module) twin (`az iot hub device-twin show` shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Twin {
    pub device_id: DeviceId,
    pub module_id: Option<String>,
    pub model_id: Option<String>,
    pub tags: Option<Map<String, Value>>,
    #[serde(default)]
    pub properties: TwinProperties,
    pub etag: Option<String>,
    pub version: Option<i64>,
    pub device_etag: Option<String>,
    pub status: Option<DeviceStatus>,
    pub status_reason: Option<String>,
    #[serde(default, with = "crate::domain::timestamp")]
    pub status_update_time: Option<DateTime<Utc>>,
    pub connection_state: Option<ConnectionState>,
    #[serde(default, with = "crate::domain::timestamp")]
    pub last_activity_time: Option<DateTime<Utc>>,
    pub cloud_to_device_message_count: Option<i64>,
    pub authentication_type: Option<AuthenticationType>,
    pub x509_thumbprint: Option<X509Thumbprint>,
    pub capabilities: Option<DeviceCapabilities>,
    pub device_scope: Option<String>,
    pub parent_scopes: Option<Vec<String>>,
}

impl Twin {
    pub fn new(device_id: impl Into<DeviceId>) -> Self {
        Self {
            device_id: device_id.into(),
            module_id: None,
            model_id: None,
            tags: None,
            properties: TwinProperties::default(),
            etag: None,
            version: None,
            device_etag: None,
            status: None,
            status_reason: None,
            status_update_time: None,
            connection_state: None,
            last_activity_time: None,
            cloud_to_device_message_count: None,
            authentication_type: None,
            x509_thumbprint: None,
            capabilities: None,
            device_scope: None,
            parent_scopes: None,
        }
    }

    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Desired properties as a single compact JSON token, suitable for one argv slot
    pub fn desired_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.properties.desired)
    }

    /// Set one desired property, replacing any previous value
    pub fn set_desired(&mut self, key: impl Into<String>, value: Value) {
        self.properties.desired.insert(key.into(), value);
    }

    /// Reported property lookup; `$metadata`/`$version` are reachable too
    pub fn reported(&self, key: &str) -> Option<&Value> {
        self.properties.reported.get(key)
    }
}
