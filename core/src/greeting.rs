use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::GreetingDefaults;
use crate::errors::Result;

/// Status code carried by every response. The handler has no failure path.
pub const STATUS_OK: u16 = 200;

/// The event handed to the function by the invoking host.
///
/// Only `first_name` and `last_name` are recognised, any other key is ignored.
/// Values are kept as raw JSON so that numbers and booleans still render.
/// `None` means the key was missing; a key sent as `null` is `Some(Value::Null)`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GreetingEvent {
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_name: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_name: Option<Value>,
}

// Only called for keys that are present, so `null` must not collapse to `None`.
fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Response envelope in the shape HTTP-style function gateways expect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GreetingResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl GreetingEvent {
    pub fn new(first_name: Option<&str>, last_name: Option<&str>) -> Self {
        Self {
            first_name: first_name.map(|s| Value::String(s.to_string())),
            last_name: last_name.map(|s| Value::String(s.to_string())),
        }
    }

    /// Parses an event document. Anything but a JSON object is rejected.
    pub fn from_json(raw: &str) -> Result<Self> {
        let event: GreetingEvent = serde_json::from_str(raw)?;
        Ok(event)
    }

    pub fn greet_with_defaults(&self) -> GreetingResponse {
        greet(self, &GreetingDefaults::default())
    }
}

/// Builds the greeting for `event`, substituting `defaults` for missing names.
///
/// The two names are always joined by a single space, so an empty last name
/// leaves a space before the `!` (`"Hello, Guest !"`).
pub fn greet(event: &GreetingEvent, defaults: &GreetingDefaults) -> GreetingResponse {
    let first_name = render_field(event.first_name.as_ref(), &defaults.default_first_name);
    let last_name = render_field(event.last_name.as_ref(), &defaults.default_last_name);

    GreetingResponse {
        status_code: STATUS_OK,
        body: format!("Hello, {} {}!", first_name, last_name),
    }
}

fn render_field(value: Option<&Value>, default: &str) -> String {
    match value {
        None => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        // null, numbers, booleans, arrays and objects render as compact JSON
        Some(other) => other.to_string(),
    }
}
