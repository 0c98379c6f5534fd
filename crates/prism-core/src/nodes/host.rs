//! Values handed back to the host.
//!
//! The host expects a fixed-arity tuple per node and has no error channel, so
//! string-output nodes report failures as their text output. That conversion
//! lives here and nowhere else.

use serde_json::{json, Value};

use crate::error::NodeResult;
use crate::imaging::ImageBatch;

/// One slot of a node's output tuple.
#[derive(Debug, Clone)]
pub enum HostValue {
    Text(String),
    Image(ImageBatch),
}

impl HostValue {
    /// Host type name of the slot.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Text(_) => "STRING",
            HostValue::Image(_) => "IMAGE",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            HostValue::Text(text) => Some(text),
            HostValue::Image(_) => None,
        }
    }

    /// JSON rendering for display. Images are summarized by shape.
    pub fn to_json(&self) -> Value {
        match self {
            HostValue::Text(text) => Value::String(text.clone()),
            HostValue::Image(image) => json!({
                "type": "IMAGE",
                "shape": [image.batch(), image.height(), image.width(), image.channels()],
            }),
        }
    }
}

/// Fold a string node's result into its single text slot.
pub fn fold_text(result: NodeResult<String>) -> HostValue {
    match result {
        Ok(text) => HostValue::Text(text),
        Err(e) => {
            tracing::error!("{e}");
            HostValue::Text(e.to_string())
        }
    }
}
