// IoT Hub Connection String

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

const HOST_NAME: &str = "HostName";
const KEY_NAME: &str = "SharedAccessKeyName";
const KEY: &str = "SharedAccessKey";
const DEVICE_ID: &str = "DeviceId";

/// Validated hub connection string
///
/// Handed to the external tool unchanged. `Debug` and `Display` mask the
/// shared access key so the value can sit in structs that get logged.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    raw: String,
    host_name: String,
    key_name: Option<String>,
    device_id: Option<String>,
}

impl ConnectionString {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let trimmed = raw.trim();

        let mut host_name = None;
        let mut key_name = None;
        let mut key = None;
        let mut device_id = None;

        for (index, segment) in trimmed.split(';').enumerate() {
            if segment.is_empty() {
                continue;
            }
            // Never echo the segment itself; it may be the key.
            let (name, value) = segment.split_once('=').ok_or_else(|| {
                DomainError::InvalidConnectionString(format!(
                    "segment {} is not Key=Value",
                    index + 1
                ))
            })?;
            match name {
                HOST_NAME => host_name = Some(value),
                KEY_NAME => key_name = Some(value),
                KEY => key = Some(value),
                DEVICE_ID => device_id = Some(value),
                _ => {}
            }
        }

        let host_name = host_name
            .filter(|h| !h.is_empty())
            .ok_or_else(|| DomainError::InvalidConnectionString("missing HostName".into()))?;

        if key.map_or(true, str::is_empty) {
            return Err(DomainError::InvalidConnectionString(
                "missing SharedAccessKey".into(),
            ));
        }

        Ok(Self {
            host_name: host_name.to_string(),
            key_name: key_name.map(str::to_string),
            device_id: device_id.map(str::to_string),
            raw: trimmed.to_string(),
        })
    }

    /// The full secret-bearing string, for the tool's `--login` argument only
    pub fn expose(&self) -> &str {
        &self.raw
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// `my-hub` for `my-hub.azure-devices.net`
    pub fn hub_name(&self) -> &str {
        self.host_name
            .split('.')
            .next()
            .unwrap_or(self.host_name.as_str())
    }

    pub fn key_name(&self) -> Option<&str> {
        self.key_name.as_deref()
    }

    /// Device-scoped strings carry `DeviceId` and cannot manage the registry
    pub fn is_device_scoped(&self) -> bool {
        self.device_id.is_some()
    }
}

impl FromStr for ConnectionString {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ConnectionString {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", HOST_NAME, self.host_name)?;
        if let Some(name) = &self.key_name {
            write!(f, ";{}={}", KEY_NAME, name)?;
        }
        if let Some(id) = &self.device_id {
            write!(f, ";{}={}", DEVICE_ID, id)?;
        }
        write!(f, ";{}=***", KEY)
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("host_name", &self.host_name)
            .field("key_name", &self.key_name)
            .field("device_id", &self.device_id)
            .finish_non_exhaustive()
    }
}
