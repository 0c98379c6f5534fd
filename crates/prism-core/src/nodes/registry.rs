//! Node registration and host-style invocation.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::host::{fold_text, HostValue};
use super::schema::{InputKind, InputSpec, NodeDescriptor};
use super::{
    LoadImageInputs, LoadImageNode, NodeContext, OssDownloadInputs, OssDownloadNode,
    OssUploadInputs, OssUploadNode, TextChatInputs, TextChatNode, VisionInputs, VisionNode,
};
use crate::error::{NodeError, NodeResult};
use crate::imaging::ImageBatch;
use crate::llm::{DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL, TEXT_MODELS, VISION_MODELS};
use crate::presets::PresetMap;

const NO_PRESETS: &str = "No presets available";
const SEED_TOOLTIP: &str = "0 = random seed";
const API_KEY_PLACEHOLDER: &str =
    "Optional ZhipuAI API key (blank reads the environment or the credential file)";

/// The registered node classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    TextChat,
    Vision,
    OssUpload,
    OssDownload,
    LoadImage,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::TextChat,
        NodeKind::Vision,
        NodeKind::OssUpload,
        NodeKind::OssDownload,
        NodeKind::LoadImage,
    ];

    pub fn class_name(self) -> &'static str {
        match self {
            NodeKind::TextChat => "GLM_Text_Chat",
            NodeKind::Vision => "GLM_Vision_ImageToPrompt",
            NodeKind::OssUpload => "AliyunOSSUploadNode",
            NodeKind::OssDownload => "AliyunOSSDownloadNode",
            NodeKind::LoadImage => "LoadImage",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            NodeKind::TextChat => "GLM Prompt Expansion",
            NodeKind::Vision => "GLM Image To Prompt",
            NodeKind::OssUpload => "Aliyun OSS Upload",
            NodeKind::OssDownload => "Aliyun OSS Download",
            NodeKind::LoadImage => "Load Image From Path",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            NodeKind::TextChat | NodeKind::Vision => "JFD/GLM_Prompt",
            NodeKind::OssUpload | NodeKind::OssDownload => "JFD/aliyun_oss",
            NodeKind::LoadImage => "JFD/image",
        }
    }

    fn function(self) -> &'static str {
        match self {
            NodeKind::TextChat => "glm_chat_function",
            NodeKind::Vision => "generate_prompt",
            NodeKind::OssUpload => "upload_file",
            NodeKind::OssDownload => "download_file",
            NodeKind::LoadImage => "load_image_path",
        }
    }

    fn returns(self) -> (Vec<&'static str>, Vec<&'static str>) {
        match self {
            NodeKind::TextChat | NodeKind::Vision => (vec!["STRING"], vec!["text"]),
            NodeKind::OssUpload => (vec!["STRING"], vec!["oss_url"]),
            NodeKind::OssDownload => (vec!["STRING"], vec!["local_file"]),
            NodeKind::LoadImage => (vec!["IMAGE", "STRING"], vec!["image", "image_path"]),
        }
    }

    pub fn from_class_name(class_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.class_name() == class_name)
    }
}

/// All nodes, sharing one [`NodeContext`].
pub struct NodeRegistry {
    ctx: Arc<NodeContext>,
    text_chat: TextChatNode,
    vision: VisionNode,
    upload: OssUploadNode,
    download: OssDownloadNode,
    load_image: LoadImageNode,
}

impl NodeRegistry {
    pub fn new(ctx: Arc<NodeContext>) -> Self {
        Self {
            text_chat: TextChatNode::new(ctx.clone()),
            vision: VisionNode::new(ctx.clone()),
            upload: OssUploadNode::new(ctx.oss_timeout),
            download: OssDownloadNode::new(ctx.oss_timeout),
            load_image: LoadImageNode::new(),
            ctx,
        }
    }

    /// Descriptors of every node. Preset choices reflect the files on disk now.
    pub fn descriptors(&self) -> Vec<NodeDescriptor> {
        NodeKind::ALL.into_iter().map(|k| self.describe(k)).collect()
    }

    pub fn descriptor(&self, class_name: &str) -> Option<NodeDescriptor> {
        NodeKind::from_class_name(class_name).map(|k| self.describe(k))
    }

    fn describe(&self, kind: NodeKind) -> NodeDescriptor {
        let (required, optional) = match kind {
            NodeKind::TextChat => (text_chat_inputs(&self.ctx.text_presets.load()), vec![]),
            NodeKind::Vision => vision_inputs(&self.ctx.image_presets.load()),
            NodeKind::OssUpload => (
                oss_inputs(&["local_file_path", "object_name"]),
                vec![],
            ),
            NodeKind::OssDownload => (
                oss_inputs(&["oss_file_path", "local_save_path"]),
                vec![],
            ),
            NodeKind::LoadImage => (
                vec![InputSpec::new("image_path", InputKind::string(""))],
                vec![],
            ),
        };
        let (return_types, return_names) = kind.returns();

        NodeDescriptor {
            class_name: kind.class_name(),
            display_name: kind.display_name(),
            category: kind.category(),
            function: kind.function(),
            required,
            optional,
            return_types,
            return_names,
        }
    }

    /// Invoke a node by class name with JSON inputs, returning the host tuple.
    pub async fn invoke(&self, class_name: &str, inputs: Value) -> NodeResult<Vec<HostValue>> {
        self.invoke_with_image(class_name, inputs, None).await
    }

    /// Like [`invoke`](Self::invoke), also wiring an IMAGE value into nodes that take one.
    ///
    /// String nodes always succeed at this level: failures become their text
    /// output. `LoadImage` has no text slot for an error and returns `Err`.
    pub async fn invoke_with_image(
        &self,
        class_name: &str,
        inputs: Value,
        image: Option<ImageBatch>,
    ) -> NodeResult<Vec<HostValue>> {
        let kind = NodeKind::from_class_name(class_name)
            .ok_or_else(|| NodeError::UnknownNode(class_name.to_string()))?;
        tracing::debug!("Invoking {}", kind.class_name());

        let output = match kind {
            NodeKind::TextChat => {
                let result = match parse_inputs::<TextChatInputs>(inputs) {
                    Ok(inputs) => self.text_chat.run(&inputs).await,
                    Err(e) => Err(e),
                };
                vec![fold_text(result)]
            }
            NodeKind::Vision => {
                let result = match parse_inputs::<VisionInputs>(inputs) {
                    Ok(mut inputs) => {
                        inputs.image_input = image;
                        self.vision.run(&inputs).await
                    }
                    Err(e) => Err(e),
                };
                vec![fold_text(result)]
            }
            NodeKind::OssUpload => {
                let result = match parse_inputs::<OssUploadInputs>(inputs) {
                    Ok(inputs) => self.upload.run(&inputs).await,
                    Err(e) => Err(e),
                };
                vec![fold_text(result)]
            }
            NodeKind::OssDownload => {
                let result = match parse_inputs::<OssDownloadInputs>(inputs) {
                    Ok(inputs) => self.download.run(&inputs).await,
                    Err(e) => Err(e),
                };
                vec![fold_text(result)]
            }
            NodeKind::LoadImage => {
                let inputs = parse_inputs::<LoadImageInputs>(inputs)?;
                let loaded = self.load_image.run(&inputs)?;
                vec![HostValue::Image(loaded.image), HostValue::Text(loaded.path)]
            }
        };
        Ok(output)
    }
}

fn parse_inputs<T: DeserializeOwned>(inputs: Value) -> NodeResult<T> {
    let inputs = if inputs.is_null() {
        Value::Object(Default::default())
    } else {
        inputs
    };
    serde_json::from_value(inputs).map_err(|e| NodeError::InvalidInput(e.to_string()))
}

fn preset_choice(name: &str, presets: &PresetMap) -> InputSpec {
    let keys: Vec<&str> = presets.keys().map(String::as_str).collect();
    let default = keys.first().copied().unwrap_or(NO_PRESETS);
    let options = if keys.is_empty() { vec![NO_PRESETS] } else { keys };
    InputSpec::new(name, InputKind::choice(&options, default))
}

fn seed_input() -> InputSpec {
    InputSpec::new(
        "seed",
        InputKind::Int {
            default: 0,
            min: 0,
            max: u64::MAX,
        },
    )
    .with_tooltip(SEED_TOOLTIP)
}

fn api_key_input() -> InputSpec {
    InputSpec::new(
        "api_key",
        InputKind::String {
            multiline: false,
            default: String::new(),
            placeholder: Some(API_KEY_PLACEHOLDER.to_string()),
        },
    )
}

fn text_chat_inputs(presets: &PresetMap) -> Vec<InputSpec> {
    vec![
        preset_choice("text_system_prompt_preset", presets),
        InputSpec::new(
            "system_prompt_override",
            InputKind::multiline("", "System prompt (highest priority, blank uses the preset)"),
        ),
        api_key_input(),
        InputSpec::new("model_name", InputKind::choice(TEXT_MODELS, DEFAULT_TEXT_MODEL))
            .with_tooltip("Model"),
        InputSpec::new("temperature", InputKind::unit_float(0.9)),
        InputSpec::new("top_p", InputKind::unit_float(0.7)),
        InputSpec::new(
            "max_tokens",
            InputKind::Int {
                default: 1024,
                min: 1,
                max: 4096,
            },
        ),
        seed_input(),
        InputSpec::new(
            "text_input",
            InputKind::multiline("a girl.", "The video prompt to expand"),
        ),
    ]
}

fn vision_inputs(presets: &PresetMap) -> (Vec<InputSpec>, Vec<InputSpec>) {
    let required = vec![
        preset_choice("image_prompt_preset", presets),
        InputSpec::new(
            "prompt_override",
            InputKind::multiline("", "Prompt describing the image (highest priority, blank uses the preset)"),
        ),
        InputSpec::new(
            "model_name",
            InputKind::choice(VISION_MODELS, DEFAULT_VISION_MODEL),
        )
        .with_tooltip("Model"),
        api_key_input(),
        seed_input(),
    ];
    let optional = vec![
        InputSpec::new("image_url", InputKind::string(""))
            .with_tooltip("Image URL (one of URL, base64, or IMAGE)"),
        InputSpec::new("image_base64", InputKind::string(""))
            .with_tooltip("Base64 image data or data URI"),
        InputSpec::new("image_input", InputKind::Image)
            .with_tooltip("IMAGE value from another node"),
    ];
    (required, optional)
}

fn oss_inputs(paths: &[&str]) -> Vec<InputSpec> {
    ["access_key_id", "access_key_secret", "endpoint", "bucket_name"]
        .iter()
        .chain(paths.iter())
        .map(|name| InputSpec::new(name, InputKind::string("")))
        .collect()
}
