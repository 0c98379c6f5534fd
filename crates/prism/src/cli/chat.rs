//! The `prism chat` command: prompt expansion.

use clap::Args;
use prism_core::{Config, NodeContext, TextChatInputs, TextChatNode};
use std::sync::Arc;

/// Arguments for the `chat` command.
#[derive(Args, Debug, Default)]
pub struct ChatArgs {
    /// The idea to expand
    #[arg(required = true)]
    pub text: String,

    /// System prompt preset name
    #[arg(short, long)]
    pub preset: Option<String>,

    /// System prompt text (overrides the preset)
    #[arg(short, long)]
    pub system: Option<String>,

    /// API key (defaults to ZHIPUAI_API_KEY or the credential file)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature (0.0 to 1.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling mass (0.0 to 1.0)
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Maximum completion tokens (1 to 4096)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Seed, 0 for random
    #[arg(long, default_value = "0")]
    pub seed: u64,
}

impl ChatArgs {
    /// Node inputs, filling unset options from `[llm]`.
    pub fn to_inputs(&self, config: &Config) -> TextChatInputs {
        TextChatInputs {
            text_input: self.text.clone(),
            api_key: self.api_key.clone().unwrap_or_default(),
            model_name: self
                .model
                .clone()
                .unwrap_or_else(|| config.llm.text_model.clone()),
            seed: self.seed,
            temperature: self.temperature.unwrap_or(config.llm.temperature),
            top_p: self.top_p.unwrap_or(config.llm.top_p),
            max_tokens: self.max_tokens.unwrap_or(config.llm.max_tokens),
            system_prompt_override: self.system.clone().unwrap_or_default(),
            text_system_prompt_preset: self.preset.clone().unwrap_or_default(),
        }
    }
}

/// Execute the chat command.
pub async fn execute(args: ChatArgs, config: &Config) -> anyhow::Result<()> {
    let node = TextChatNode::new(Arc::new(NodeContext::from_config(config)));
    let text = node.run(&args.to_inputs(config)).await?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_fall_back_to_config() {
        let mut config = Config::default();
        config.llm.temperature = 0.3;
        let args = ChatArgs {
            text: "a cat".into(),
            top_p: Some(0.5),
            ..ChatArgs::default()
        };

        let inputs = args.to_inputs(&config);
        assert_eq!(inputs.text_input, "a cat");
        assert_eq!(inputs.temperature, 0.3);
        assert_eq!(inputs.top_p, 0.5);
        assert_eq!(inputs.max_tokens, 1024);
        assert_eq!(inputs.model_name, "GLM-4.5-Flash");
        assert!(inputs.api_key.is_empty());
    }

    #[test]
    fn chat_args_default_seed_is_random() {
        assert_eq!(ChatArgs::default().seed, 0);
    }
}
