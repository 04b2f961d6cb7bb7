use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Recording state reported by a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceStatus {
    Initialising,
    Running,
    Stopping,
    Stopped,
    Offline,
    Busy,
    Unknown(String),
}

impl DeviceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DeviceStatus::Initialising => "initialising",
            DeviceStatus::Running => "running",
            DeviceStatus::Stopping => "stopping",
            DeviceStatus::Stopped => "stopped",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Busy => "busy",
            DeviceStatus::Unknown(raw) => raw.as_str(),
        }
    }

    /// Whether the device is between stable states (start/stop in progress).
    pub fn is_transitioning(&self) -> bool {
        matches!(self, DeviceStatus::Initialising | DeviceStatus::Stopping)
    }
}

impl Default for DeviceStatus {
    fn default() -> Self {
        DeviceStatus::Unknown(String::new())
    }
}

impl From<String> for DeviceStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "initialising" | "initializing" => DeviceStatus::Initialising,
            "running" => DeviceStatus::Running,
            "stopping" => DeviceStatus::Stopping,
            "stopped" => DeviceStatus::Stopped,
            "offline" => DeviceStatus::Offline,
            "busy" => DeviceStatus::Busy,
            _ => DeviceStatus::Unknown(raw),
        }
    }
}

impl From<DeviceStatus> for String {
    fn from(status: DeviceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One device record as served by `/devices` and `/device/{id}/info`.
///
/// Modules (tracker, controller, ...) arrive as top-level objects carrying a
/// `status` key and are lifted into `module_status`. Known fields carrying
/// the wrong type are dropped one by one instead of failing the record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawDevice")]
pub struct Device {
    pub id: String,
    pub name: Option<String>,
    pub status: DeviceStatus,
    pub ip: Option<String>,
    pub settings: Map<String, Value>,
    pub module_status: BTreeMap<String, String>,
    pub current_timestamp: Option<f64>,
    pub extra: Map<String, Value>,
}

impl Device {
    pub fn module_status(&self, module: &str) -> Option<&str> {
        self.module_status.get(module).map(String::as_str)
    }

    /// Looks up a display field by name, used for sorting the device list.
    pub fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.clone()),
            "name" => self.name.clone(),
            "status" => Some(self.status.to_string()),
            "ip" => self.ip.clone(),
            other => self.extra.get(other).map(value_text),
        }
    }
}

#[derive(Deserialize)]
struct RawDevice {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    ip: Option<Value>,
    #[serde(default)]
    settings: Option<Value>,
    #[serde(default)]
    current_timestamp: Option<Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl From<RawDevice> for Device {
    fn from(raw: RawDevice) -> Self {
        let mut module_status = BTreeMap::new();
        let mut extra = Map::new();

        for (key, value) in raw.rest {
            match value.get("status").and_then(|status| status.as_str()) {
                Some(status) if value.is_object() => {
                    module_status.insert(key, status.to_string());
                }
                _ => {
                    extra.insert(key, value);
                }
            }
        }

        Self {
            id: text_field("id", raw.id).unwrap_or_default(),
            name: text_field("name", raw.name),
            status: text_field("status", raw.status)
                .map(DeviceStatus::from)
                .unwrap_or_default(),
            ip: text_field("ip", raw.ip),
            settings: match raw.settings {
                Some(Value::Object(settings)) => settings,
                None | Some(Value::Null) => Map::new(),
                Some(other) => {
                    warn!(field = "settings", value = %other, "Ignoring malformed device field");
                    Map::new()
                }
            },
            module_status,
            current_timestamp: timestamp_field(raw.current_timestamp),
            extra,
        }
    }
}

fn text_field(field: &str, value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        other => {
            warn!(field, value = %other, "Ignoring malformed device field");
            None
        }
    }
}

/// Seconds since the epoch, given as a number or a numeric string.
fn timestamp_field(value: Option<Value>) -> Option<f64> {
    let parsed = match value.as_ref()? {
        Value::Null => return None,
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed.filter(|seconds| seconds.is_finite()) {
        Some(seconds) => Some(seconds),
        None => {
            if let Some(value) = value {
                warn!(field = "current_timestamp", value = %value, "Ignoring malformed device field");
            }
            None
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
