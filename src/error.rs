// Error type shared by the field, the frame loop and the browser glue.
// Converted into a JsValue whenever it crosses the wasm boundary.

use std::fmt;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// A configuration value was negative, non-finite or otherwise unusable.
    InvalidConfig(String),
    /// The frame scheduler refused to schedule or cancel a frame.
    Scheduler(String),
    /// The loop was stopped and cannot be restarted.
    AlreadyStopped,
    /// A DOM lookup or mutation failed.
    Dom(String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::InvalidConfig(msg) => write!(f, "invalid field config: {}", msg),
            FieldError::Scheduler(msg) => write!(f, "frame scheduler error: {}", msg),
            FieldError::AlreadyStopped => write!(f, "frame loop was already stopped"),
            FieldError::Dom(msg) => write!(f, "DOM error: {}", msg),
        }
    }
}

impl std::error::Error for FieldError {}

impl From<FieldError> for JsValue {
    fn from(e: FieldError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

// web-sys errors come back as opaque JsValues, keep whatever text they carry
pub fn describe_js_error(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
