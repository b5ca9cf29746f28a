// Registry Request Validation
// Rejects malformed input before a process is spawned

use base64::Engine;

use crate::domain::{DeviceStatus, DomainError};
use crate::error::{AppError, Result};

pub const MAX_DEVICE_ID_LEN: usize = 128;

/// Non-alphanumeric characters the registry accepts in device ids
const DEVICE_ID_SPECIAL_CHARS: &str = "-.%_*?!(),:=@$'";

/// Decoded SAS key length bounds (bytes)
const MIN_SAS_KEY_BYTES: usize = 16;
const MAX_SAS_KEY_BYTES: usize = 64;

pub fn validate_device_id(device_id: &str) -> Result<()> {
    let invalid = |reason: &str| {
        AppError::Domain(DomainError::InvalidDeviceId {
            id: device_id.to_string(),
            reason: reason.to_string(),
        })
    };

    if device_id.is_empty() {
        return Err(invalid("device id cannot be empty"));
    }

    if device_id.len() > MAX_DEVICE_ID_LEN {
        return Err(invalid("device id too long (max 128 characters)"));
    }

    if !device_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || DEVICE_ID_SPECIAL_CHARS.contains(c))
    {
        return Err(invalid(
            "device id must be alphanumeric or one of - . % _ * ? ! ( ) , : = @ $ '",
        ));
    }

    Ok(())
}

pub fn validate_sas_key(label: &str, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", label)));
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(key)
        .map_err(|_| AppError::Validation(format!("{} is not valid base64", label)))?;

    if !(MIN_SAS_KEY_BYTES..=MAX_SAS_KEY_BYTES).contains(&decoded.len()) {
        return Err(AppError::Validation(format!(
            "{} must decode to {}-{} bytes (got {})",
            label,
            MIN_SAS_KEY_BYTES,
            MAX_SAS_KEY_BYTES,
            decoded.len()
        )));
    }

    Ok(())
}

/// SHA-1 (40 hex) or SHA-256 (64 hex) certificate thumbprint
pub fn validate_thumbprint(label: &str, thumbprint: &str) -> Result<()> {
    if thumbprint.len() != 40 && thumbprint.len() != 64 {
        return Err(AppError::Validation(format!(
            "{} must be 40 or 64 hex characters (got {})",
            label,
            thumbprint.len()
        )));
    }

    hex::decode(thumbprint)
        .map_err(|_| AppError::Validation(format!("{} is not hexadecimal", label)))?;

    Ok(())
}

/// Only `enabled`/`disabled` can be sent to the registry
pub fn validate_status(status: DeviceStatus) -> Result<()> {
    match status {
        DeviceStatus::Unknown => Err(AppError::Domain(DomainError::InvalidStatus(
            status.to_string(),
        ))),
        _ => Ok(()),
    }
}

pub fn validate_top(top: Option<u32>) -> Result<()> {
    match top {
        Some(0) => Err(AppError::Validation("top must be at least 1".to_string())),
        _ => Ok(()),
    }
}
