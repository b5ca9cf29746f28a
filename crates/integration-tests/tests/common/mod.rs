//! Fake `az` executable for end-to-end tests
//!
//! The script records its argv (one argument per line) next to itself and
//! answers a handful of `iot hub` commands with canned JSON.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use iothub_sdk::RegistryConfig;
use tempfile::TempDir;

pub const CONNECTION_STRING: &str = "HostName=plant-hub.azure-devices.net;SharedAccessKeyName=iothubowner;SharedAccessKey=c2VjcmV0LXNoYXJlZC1hY2Nlc3Mta2V5LWZvci10ZXN0cw==";
pub const PRIMARY_KEY: &str = "cHJpbWFyeS1rZXktcHJpbWFyeS1rZXktMDEyMzQ1Ng==";
pub const SECONDARY_KEY: &str = "c2Vjb25kYXJ5LWtleS1zZWNvbmRhcnkta2V5LTAxMjM=";

const ARGS_FILE: &str = "last_args";

const SCRIPT: &str = r#"#!/bin/sh
printf '%s\n' "$@" > "$(dirname "$0")/last_args"

if [ "$1" = "version" ]; then
  echo '{"azure-cli": "2.61.0", "azure-cli-core": "2.61.0", "extensions": {"azure-iot": "0.24.0"}}'
  exit 0
fi

case "$3 $4" in
  "device-identity create")
    echo '{"deviceId": "sensor-01", "status": "enabled", "etag": "NjQ1MTcwMzcx", "connectionState": "Disconnected", "connectionStateUpdatedTime": "0001-01-01T00:00:00", "lastActivityTime": "0001-01-01T00:00:00", "statusUpdatedTime": "0001-01-01T00:00:00", "authentication": {"type": "sas", "symmetricKey": {"primaryKey": "cHJpbWFyeS1rZXktcHJpbWFyeS1rZXktMDEyMzQ1Ng==", "secondaryKey": "c2Vjb25kYXJ5LWtleS1zZWNvbmRhcnkta2V5LTAxMjM="}}}'
    ;;
  "device-identity show")
    if [ "$6" = "sensor-99" ]; then
      echo "ERROR: (DeviceNotFound) Device sensor-99 not registered on IoT Hub plant-hub." >&2
      exit 3
    fi
    echo '{"deviceId": "sensor-01", "status": "enabled"}'
    ;;
  "device-identity update")
    echo '{"deviceId": "sensor-01", "status": "disabled", "statusReason": "battery swap"}'
    ;;
  "device-identity list")
    echo '[{"deviceId": "sensor-01", "status": "enabled", "lastActivityTime": "0001-01-01T00:00:00"}, {"deviceId": "gateway-01", "lastActivityTime": "2024-05-01T08:00:00.1234567", "status": "enabled", "capabilities": {"iotEdge": true}}]'
    ;;
  "device-identity delete")
    ;;
  "device-twin show")
    echo '{"deviceId": "sensor-01", "etag": "AAAAAAAAAAE=", "version": 3, "statusUpdateTime": "0001-01-01T00:00:00", "lastActivityTime": "0001-01-01T00:00:00", "tags": {"site": "north"}, "properties": {"desired": {"interval": 60, "$version": 2}, "reported": {"fw": "1.2.0", "$version": 5}}}'
    ;;
  "device-twin update")
    echo '{"deviceId": "sensor-01", "etag": "AAAAAAAAAAI=", "version": 4, "properties": {"desired": {"interval": 30, "mode": "eco friendly", "$version": 3}, "reported": {}}}'
    ;;
  "device-twin list")
    echo '[{"deviceId": "sensor-01", "version": 4}]'
    ;;
  *)
    echo "ERROR: unexpected command $3 $4" >&2
    exit 2
    ;;
esac
"#;

/// Temp dir holding the fake tool; dropped with the test
pub struct FakeAz {
    dir: TempDir,
    program: PathBuf,
}

impl FakeAz {
    pub fn install() -> Self {
        Self::with_script(SCRIPT)
    }

    pub fn with_script(script: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let program = dir.path().join("az");
        std::fs::write(&program, script).unwrap();
        let mut perms = std::fs::metadata(&program).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&program, perms).unwrap();
        Self { dir, program }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> RegistryConfig {
        let mut config = RegistryConfig::default().with_connection_string(CONNECTION_STRING);
        config.az_path = self.program.display().to_string();
        config.timeout_secs = 10;
        config
    }

    /// Argv of the most recent invocation
    pub fn last_args(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join(ARGS_FILE))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Value following `flag` in `args`
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}
