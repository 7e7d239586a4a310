//! Editor options and bridge tuning.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::visibility::DEFAULT_INIT_DELAY;

/// Opaque editor options handed to the runtime's `init`.
///
/// Compared by deep equality across host updates; any difference forces the
/// editor to be destroyed and recreated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorConfig(Map<String, Value>);

impl EditorConfig {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON object string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    /// Set an option, returning the updated config.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the editor runs inline on a `div` instead of replacing a textarea.
    pub fn is_inline(&self) -> bool {
        self.0.get("inline").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Copy of these options targeted at the container with the given id.
    ///
    /// Any `selector` supplied by the host is overwritten; the bridge owns
    /// which element the editor attaches to.
    pub fn init_options(&self, identity: &str) -> Map<String, Value> {
        let mut options = self.0.clone();
        options.insert("selector".into(), Value::String(format!("#{identity}")));
        options
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for EditorConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Tuning for the bridge itself, separate from the editor options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    /// How long to wait before retrying initialization on a container that
    /// has no computed style yet.
    #[serde(rename = "init_retry_delay_ms", with = "millis")]
    pub init_retry_delay: Duration,
    /// Passed through as the `force` flag of registry removal.
    pub force_remove: bool,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            init_retry_delay: DEFAULT_INIT_DELAY,
            force_remove: true,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(delay: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(delay.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
