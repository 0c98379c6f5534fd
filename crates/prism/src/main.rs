//! Prism CLI - GLM prompt expansion, image description and Aliyun OSS transfer.
//!
//! Each subcommand drives one node from `prism-core`; `prism run` invokes a
//! node by class name the way a node-graph host would.
//!
//! # Usage
//!
//! ```bash
//! # Expand a short idea into a video prompt
//! prism chat "a girl walking in the rain" --preset Cinematic
//!
//! # Describe an image
//! prism describe --image ./frame.png
//!
//! # Upload to OSS (keys from OSS_ACCESS_KEY_ID / OSS_ACCESS_KEY_SECRET)
//! prism oss upload ./frame.png comfyui/frame.png --bucket drawbookai
//!
//! # Host-style invocation
//! prism run GLM_Text_Chat --inputs '{"text_input": "a cat"}'
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Prism - GLM prompt, vision and Aliyun OSS nodes from the command line.
#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Expand a prompt with a GLM text model
    Chat(cli::chat::ChatArgs),

    /// Describe an image with a GLM vision model
    Describe(cli::describe::DescribeArgs),

    /// Upload to or download from Aliyun OSS
    Oss(cli::oss::OssArgs),

    /// Load an image file and report its shape
    LoadImage(cli::load_image::LoadImageArgs),

    /// Inspect prompt presets
    Presets(cli::presets::PresetsArgs),

    /// List node descriptors
    Nodes(cli::nodes::NodesArgs),

    /// Invoke a node by class name with JSON inputs
    Run(cli::run::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match prism_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `prism config path`."
            );
            prism_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Prism v{}", prism_core::VERSION);

    match cli.command {
        Commands::Chat(args) => cli::chat::execute(args, &config).await,
        Commands::Describe(args) => cli::describe::execute(args, &config).await,
        Commands::Oss(args) => cli::oss::execute(args, &config).await,
        Commands::LoadImage(args) => cli::load_image::execute(args).await,
        Commands::Presets(args) => cli::presets::execute(args, &config).await,
        Commands::Nodes(args) => cli::nodes::execute(args, &config).await,
        Commands::Run(args) => cli::run::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
