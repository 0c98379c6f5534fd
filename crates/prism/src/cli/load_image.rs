//! The `prism load-image` command.

use clap::Args;
use prism_core::{HostValue, LoadImageInputs, LoadImageNode};

use super::expand_path;

/// Arguments for the `load-image` command.
#[derive(Args, Debug, Default)]
pub struct LoadImageArgs {
    /// Image file to load
    #[arg(required = true)]
    pub path: String,
}

/// Execute the load-image command: print the IMAGE shape and the path as JSON.
pub async fn execute(args: LoadImageArgs) -> anyhow::Result<()> {
    let inputs = LoadImageInputs {
        image_path: expand_path(&args.path).to_string_lossy().into_owned(),
    };
    let loaded = LoadImageNode::new().run(&inputs)?;

    let tuple = [HostValue::Image(loaded.image), HostValue::Text(loaded.path)];
    let json: Vec<_> = tuple.iter().map(HostValue::to_json).collect();
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
