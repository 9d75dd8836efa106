use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;

/// Region value meaning "no region filter".
pub const REGION_ALL: &str = "todos";

pub const STATUS_CORRESPONDS_COLOR: &str = "#125e08ff";
pub const STATUS_NOT_REVIEWED_COLOR: &str = "#eeff07f5";
pub const STATUS_DOES_NOT_CORRESPOND_COLOR: &str = "#eb0c22ff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Status {
    Corresponds,
    NotReviewed,
    DoesNotCorrespond,
}

impl Status {
    pub const ALL: [Self; 3] = [Self::Corresponds, Self::NotReviewed, Self::DoesNotCorrespond];

    pub const fn code(self) -> u8 {
        match self {
            Self::Corresponds => 1,
            Self::NotReviewed => 2,
            Self::DoesNotCorrespond => 3,
        }
    }

    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Corresponds),
            2 => Some(Self::NotReviewed),
            3 => Some(Self::DoesNotCorrespond),
            _ => None,
        }
    }

    /// Reads a status stored as a number or as numeric text.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_i64().and_then(Self::from_code),
            Value::String(text) => text.trim().parse().ok().and_then(Self::from_code),
            _ => None,
        }
    }

    /// Matches a human label, ignoring case and surrounding whitespace.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "corresponde" => Some(Self::Corresponds),
            "no revisado" => Some(Self::NotReviewed),
            "no corresponde" => Some(Self::DoesNotCorrespond),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Corresponds => "Corresponde",
            Self::NotReviewed => "No Revisado",
            Self::DoesNotCorrespond => "No Corresponde",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Corresponds => STATUS_CORRESPONDS_COLOR,
            Self::NotReviewed => STATUS_NOT_REVIEWED_COLOR,
            Self::DoesNotCorrespond => STATUS_DOES_NOT_CORRESPOND_COLOR,
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Region {
    All,
    Named(String),
}

impl Region {
    /// Reads a selector value. An empty value falls back to the sentinel.
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == REGION_ALL {
            Self::All
        } else {
            Self::Named(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => REGION_ALL,
            Self::Named(name) => name,
        }
    }

    /// The value sent to the server, if any.
    pub fn filter(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the layer selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerDescriptor {
    pub id: String,
    pub label: String,
}

impl LayerDescriptor {
    /// Accepts a bare string, an object with `id`/`nombre`, or anything else
    /// (which is identified by its JSON text).
    pub fn from_entry(entry: &Value) -> Self {
        match entry {
            Value::String(name) => Self {
                id: name.clone(),
                label: name.clone(),
            },
            Value::Object(fields) => {
                let id = fields
                    .get("id")
                    .and_then(truthy_text)
                    .or_else(|| fields.get("nombre").and_then(truthy_text))
                    .unwrap_or_else(|| entry.to_string());
                let label = fields
                    .get("nombre")
                    .and_then(truthy_text)
                    .or_else(|| fields.get("id").and_then(truthy_text))
                    .unwrap_or_else(|| id.clone());
                Self { id, label }
            }
            other => {
                let text = other.to_string();
                Self {
                    id: text.clone(),
                    label: text,
                }
            }
        }
    }
}

/// Text form of a value that counts as "present": non-empty strings,
/// non-zero numbers, `true`, and any container.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

/// Identifier of a feature of the editable layer.
///
/// Ids arrive as numbers or text and are compared loosely, so `42` and
/// `"42"` name the same feature. Zero is a valid id.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureId {
    Number(Number),
    Text(String),
}

impl FeatureId {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => Some(Self::Number(number.clone())),
            Value::String(text) => Some(Self::Text(text.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(number) => Value::Number(number.clone()),
            Self::Text(text) => Value::String(text.clone()),
        }
    }

    pub fn loosely_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b || a.as_f64() == b.as_f64(),
            (Self::Number(number), Self::Text(text)) | (Self::Text(text), Self::Number(number)) => {
                let trimmed = text.trim();
                !trimmed.is_empty() && trimmed.parse::<f64>().ok() == number.as_f64()
            }
        }
    }
}

impl From<i64> for FeatureId {
    fn from(id: i64) -> Self {
        Self::Number(id.into())
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}
