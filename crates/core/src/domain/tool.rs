// External Tool Metadata

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extension that provides the `az iot` command group
pub const IOT_EXTENSION: &str = "azure-iot";

/// Output of `az version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolVersion {
    #[serde(rename = "azure-cli")]
    pub azure_cli: String,
    #[serde(rename = "azure-cli-core")]
    pub azure_cli_core: Option<String>,
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

impl ToolVersion {
    pub fn iot_extension(&self) -> Option<&str> {
        self.extensions.get(IOT_EXTENSION).map(String::as_str)
    }
}
