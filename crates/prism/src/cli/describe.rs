//! The `prism describe` command: image to prompt.

use clap::Args;
use prism_core::imaging::load_image;
use prism_core::{Config, NodeContext, VisionInputs, VisionNode};
use std::sync::Arc;

use super::expand_path;

/// Arguments for the `describe` command.
#[derive(Args, Debug, Default)]
pub struct DescribeArgs {
    /// Local image file (takes priority over --base64 and --url)
    #[arg(short, long)]
    pub image: Option<String>,

    /// Base64 image data or a data URI
    #[arg(long)]
    pub base64: Option<String>,

    /// Image URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Image prompt preset name
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Prompt text (overrides the preset)
    #[arg(long)]
    pub prompt: Option<String>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key (defaults to ZHIPUAI_API_KEY or the credential file)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Seed, 0 for random
    #[arg(long, default_value = "0")]
    pub seed: u64,
}

impl DescribeArgs {
    /// Node inputs. A local image is decoded into the IMAGE slot.
    pub fn to_inputs(&self, config: &Config) -> anyhow::Result<VisionInputs> {
        let image_input = match &self.image {
            Some(path) => {
                let path = expand_path(path);
                Some(load_image(&path.to_string_lossy())?.image)
            }
            None => None,
        };

        Ok(VisionInputs {
            image_prompt_preset: self.preset.clone().unwrap_or_default(),
            prompt_override: self.prompt.clone().unwrap_or_default(),
            model_name: self
                .model
                .clone()
                .unwrap_or_else(|| config.llm.vision_model.clone()),
            api_key: self.api_key.clone().unwrap_or_default(),
            seed: self.seed,
            image_url: self.url.clone().unwrap_or_default(),
            image_base64: self.base64.clone().unwrap_or_default(),
            image_input,
        })
    }
}

/// Execute the describe command.
pub async fn execute(args: DescribeArgs, config: &Config) -> anyhow::Result<()> {
    let inputs = args.to_inputs(config)?;
    let node = VisionNode::new(Arc::new(NodeContext::from_config(config)));
    let text = node.run(&inputs).await?;
    println!("{text}");
    Ok(())
}
