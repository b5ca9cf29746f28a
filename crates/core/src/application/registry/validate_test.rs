//! Unit tests for registry request validation

#[cfg(test)]
mod tests {
    use super::super::validate::*;
    use crate::domain::DeviceStatus;

    const PRIMARY: &str = "cHJpbWFyeS1rZXktcHJpbWFyeS1rZXktMDEyMzQ1Ng==";

    #[test]
    fn test_validate_device_id_empty() {
        let result = validate_device_id("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_device_id_too_long() {
        let result = validate_device_id(&"a".repeat(129));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too long"));

        assert!(validate_device_id(&"a".repeat(128)).is_ok());
    }

    #[test]
    fn test_validate_device_id_invalid_chars() {
        for id in ["has space", "semi;colon", "slash/id", "quote\"id", "tab\tid", "ünïcode"] {
            let result = validate_device_id(id);
            assert!(result.is_err(), "{} should be rejected", id);
            assert!(result.unwrap_err().to_string().contains("alphanumeric"));
        }
    }

    #[test]
    fn test_validate_device_id_special_chars_allowed() {
        for id in ["sensor-01", "plant.7_line:3", "a%b*c?d!e", "(x),y=z@w$v'"] {
            assert!(validate_device_id(id).is_ok(), "{} should be accepted", id);
        }
    }

    #[test]
    fn test_validate_sas_key() {
        assert!(validate_sas_key("primary key", PRIMARY).is_ok());

        let empty = validate_sas_key("primary key", "").unwrap_err();
        assert!(empty.to_string().contains("primary key cannot be empty"));

        let not_b64 = validate_sas_key("secondary key", "not base64!").unwrap_err();
        assert!(not_b64.to_string().contains("base64"));

        // "c2hvcnQ=" decodes to "short"
        let short = validate_sas_key("primary key", "c2hvcnQ=").unwrap_err();
        assert!(short.to_string().contains("16-64 bytes"));
    }

    #[test]
    fn test_validate_thumbprint() {
        assert!(validate_thumbprint("primary thumbprint", &"ab".repeat(20)).is_ok());
        assert!(validate_thumbprint("primary thumbprint", &"CD".repeat(32)).is_ok());

        let wrong_len = validate_thumbprint("primary thumbprint", "abcd").unwrap_err();
        assert!(wrong_len.to_string().contains("40 or 64"));

        let not_hex = validate_thumbprint("secondary thumbprint", &"zz".repeat(20)).unwrap_err();
        assert!(not_hex.to_string().contains("hexadecimal"));
    }

    #[test]
    fn test_validate_top() {
        assert!(validate_top(None).is_ok());
        assert!(validate_top(Some(1)).is_ok());
        assert!(validate_top(Some(0)).is_err());
    }

    #[test]
    fn test_validate_status() {
        assert!(validate_status(DeviceStatus::Enabled).is_ok());
        assert!(validate_status(DeviceStatus::Disabled).is_ok());

        let err = validate_status(DeviceStatus::Unknown).unwrap_err();
        assert!(err.to_string().contains("unknown"));
    }
}
