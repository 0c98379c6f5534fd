//! The `prism run` command: host-style node invocation.

use clap::Args;
use prism_core::imaging::load_image;
use prism_core::{Config, HostValue, NodeContext, NodeRegistry};
use serde_json::Value;
use std::sync::Arc;

use super::expand_path;

/// Arguments for the `run` command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Node class name, e.g. GLM_Text_Chat
    #[arg(required = true)]
    pub class: String,

    /// Node inputs as a JSON object
    #[arg(short, long, default_value = "{}")]
    pub inputs: String,

    /// Image file wired into the node's IMAGE input
    #[arg(long)]
    pub image: Option<String>,
}

/// Execute the run command: print the output tuple as a JSON array.
pub async fn execute(args: RunArgs, config: &Config) -> anyhow::Result<()> {
    let inputs = parse_inputs(&args.inputs)?;
    let image = match &args.image {
        Some(path) => Some(load_image(&expand_path(path).to_string_lossy())?.image),
        None => None,
    };

    let registry = NodeRegistry::new(Arc::new(NodeContext::from_config(config)));
    let outputs = registry
        .invoke_with_image(&args.class, inputs, image)
        .await?;

    let json: Vec<Value> = outputs.iter().map(HostValue::to_json).collect();
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn parse_inputs(raw: &str) -> anyhow::Result<Value> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| anyhow::anyhow!("--inputs is not valid JSON: {e}"))?;
    if !value.is_object() {
        anyhow::bail!("--inputs must be a JSON object");
    }
    Ok(value)
}
