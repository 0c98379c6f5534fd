//! The `prism presets` command for inspecting prompt presets.

use clap::{Args, Subcommand, ValueEnum};
use prism_core::{Config, PresetMap, PresetStore};

/// Arguments for the `presets` command.
#[derive(Args, Debug)]
pub struct PresetsArgs {
    #[command(subcommand)]
    pub command: PresetsCommand,
}

/// Subcommands for preset inspection.
#[derive(Subcommand, Debug)]
pub enum PresetsCommand {
    /// List presets with the first line of each prompt
    List {
        /// Which preset file to list (both when omitted)
        #[arg(value_enum)]
        kind: Option<PresetKind>,
    },

    /// Show preset file paths
    Path,
}

/// The two preset files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PresetKind {
    /// Text-expansion system prompts
    Text,
    /// Image-description prompts
    Image,
}

impl PresetKind {
    fn store(self, config: &Config) -> PresetStore {
        match self {
            PresetKind::Text => PresetStore::text(config.text_presets_file()),
            PresetKind::Image => PresetStore::image(config.image_presets_file()),
        }
    }
}

impl std::fmt::Display for PresetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetKind::Text => write!(f, "text"),
            PresetKind::Image => write!(f, "image"),
        }
    }
}

/// Execute the presets command.
pub async fn execute(args: PresetsArgs, config: &Config) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { kind } => {
            let kinds = match kind {
                Some(kind) => vec![kind],
                None => vec![PresetKind::Text, PresetKind::Image],
            };
            for kind in kinds {
                let store = kind.store(config);
                println!("{kind} presets ({}):", store.path().display());
                print!("{}", format_presets(&store.load()));
            }
        }

        PresetsCommand::Path => {
            println!("text:  {}", config.text_presets_file().display());
            println!("image: {}", config.image_presets_file().display());
        }
    }

    Ok(())
}

/// One line per preset: name and the first line of its prompt.
fn format_presets(presets: &PresetMap) -> String {
    presets
        .iter()
        .map(|(name, body)| {
            let first = body.lines().next().unwrap_or_default();
            format!("  {name}: {first}\n")
        })
        .collect()
}
