//! The `prism nodes` command: list node descriptors.

use clap::Args;
use prism_core::{Config, NodeContext, NodeDescriptor, NodeRegistry};
use std::sync::Arc;

/// Arguments for the `nodes` command.
#[derive(Args, Debug, Default)]
pub struct NodesArgs {
    /// Print full descriptors as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the nodes command.
pub async fn execute(args: NodesArgs, config: &Config) -> anyhow::Result<()> {
    let registry = NodeRegistry::new(Arc::new(NodeContext::from_config(config)));
    let descriptors = registry.descriptors();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
    } else {
        for descriptor in &descriptors {
            println!("{}", summary_line(descriptor));
        }
    }
    Ok(())
}

fn summary_line(descriptor: &NodeDescriptor) -> String {
    let returns: Vec<String> = descriptor
        .return_types
        .iter()
        .zip(&descriptor.return_names)
        .map(|(ty, name)| format!("{ty} {name}"))
        .collect();
    format!(
        "{:<26} {:<22} {:<16} -> ({})",
        descriptor.class_name,
        descriptor.display_name,
        descriptor.category,
        returns.join(", ")
    )
}
