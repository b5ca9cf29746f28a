// Twin Update Request

use serde_json::{Map, Value};

use crate::domain::Twin;

/// Partial twin update (`az iot hub device-twin update`)
///
/// Set `etag` to make the update conditional on the twin not having changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TwinUpdate {
    pub desired: Option<Map<String, Value>>,
    pub tags: Option<Map<String, Value>>,
    pub etag: Option<String>,
}

impl TwinUpdate {
    pub fn desired(desired: Map<String, Value>) -> Self {
        Self {
            desired: Some(desired),
            ..Self::default()
        }
    }

    pub fn tags(tags: Map<String, Value>) -> Self {
        Self {
            tags: Some(tags),
            ..Self::default()
        }
    }

    /// Conditional update carrying the twin's desired properties, tags and etag
    pub fn from_twin(twin: &Twin) -> Self {
        Self {
            desired: Some(twin.properties.desired.clone()),
            tags: twin.tags.clone(),
            etag: twin.etag.clone(),
        }
    }

    pub fn with_tags(mut self, tags: Map<String, Value>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.desired.is_none() && self.tags.is_none()
    }
}
