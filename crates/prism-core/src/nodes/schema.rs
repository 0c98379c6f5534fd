//! Serializable node descriptors: the host's registration contract.

use serde::Serialize;

/// Declared type and widget options of one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum InputKind {
    String {
        multiline: bool,
        default: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Float {
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    },
    Int {
        default: u64,
        min: u64,
        max: u64,
    },
    /// Enumerated choice
    #[serde(rename = "COMBO")]
    Choice {
        options: Vec<String>,
        default: String,
    },
    Image,
}

impl InputKind {
    pub fn string(default: &str) -> Self {
        InputKind::String {
            multiline: false,
            default: default.to_string(),
            placeholder: None,
        }
    }

    pub fn multiline(default: &str, placeholder: &str) -> Self {
        InputKind::String {
            multiline: true,
            default: default.to_string(),
            placeholder: Some(placeholder.to_string()),
        }
    }

    pub fn unit_float(default: f64) -> Self {
        InputKind::Float {
            default,
            min: 0.0,
            max: 1.0,
            step: 0.01,
        }
    }

    pub fn choice<S: AsRef<str>>(options: &[S], default: &str) -> Self {
        InputKind::Choice {
            options: options.iter().map(|o| o.as_ref().to_string()).collect(),
            default: default.to_string(),
        }
    }
}

/// A named input with an optional tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: InputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl InputSpec {
    pub fn new(name: &str, kind: InputKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            tooltip: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: &str) -> Self {
        self.tooltip = Some(tooltip.to_string());
        self
    }
}

/// Everything the host needs to register a node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDescriptor {
    pub class_name: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub function: &'static str,
    pub required: Vec<InputSpec>,
    pub optional: Vec<InputSpec>,
    pub return_types: Vec<&'static str>,
    pub return_names: Vec<&'static str>,
}

impl NodeDescriptor {
    /// Look up a declared input by name.
    pub fn input(&self, name: &str) -> Option<&InputSpec> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .find(|spec| spec.name == name)
    }
}
