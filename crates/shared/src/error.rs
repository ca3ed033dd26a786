use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a failed response. Servers are free to send more than this; only
/// `message` is consumed and everything else is ignored. Validation failures
/// often carry a structured `message` (an array or object), so it is kept as
/// raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(Value::String(message.into())),
        }
    }

    /// Returns the message when present and non-empty. Strings come back as-is;
    /// structured messages are rendered as compact JSON.
    pub fn message(&self) -> Option<String> {
        match self.message.as_ref()? {
            Value::Null => None,
            Value::String(message) if message.is_empty() => None,
            Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }
}
