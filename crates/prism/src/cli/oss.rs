//! The `prism oss` command for Aliyun OSS transfers.

use clap::{Args, Subcommand};
use prism_core::{Config, OssDownloadInputs, OssDownloadNode, OssUploadInputs, OssUploadNode};
use std::time::Duration;

use super::expand_path;

/// Arguments for the `oss` command.
#[derive(Args, Debug)]
pub struct OssArgs {
    #[command(flatten)]
    pub target: OssTarget,

    #[command(subcommand)]
    pub command: OssCommand,
}

/// Credentials and bucket shared by both subcommands.
#[derive(Args, Debug, Default)]
pub struct OssTarget {
    /// Access key ID
    #[arg(long, env = "OSS_ACCESS_KEY_ID", global = true, hide_env_values = true)]
    pub access_key_id: Option<String>,

    /// Access key secret
    #[arg(long, env = "OSS_ACCESS_KEY_SECRET", global = true, hide_env_values = true)]
    pub access_key_secret: Option<String>,

    /// Endpoint (defaults to [oss].endpoint)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Bucket name (defaults to [oss].bucket)
    #[arg(long, global = true)]
    pub bucket: Option<String>,
}

/// Subcommands for object transfer.
#[derive(Subcommand, Debug)]
pub enum OssCommand {
    /// Upload a local file and print its public URL
    Upload {
        /// Local file to upload
        local: String,

        /// Object key, e.g. uploads/test.jpg
        key: String,
    },

    /// Download an object and print the saved path
    Download {
        /// Object key
        key: String,

        /// Local destination (parent directories are created)
        local: String,
    },
}

/// Fully resolved connection settings.
#[derive(Debug, PartialEq)]
struct Resolved {
    access_key_id: String,
    access_key_secret: String,
    endpoint: String,
    bucket: String,
}

impl OssTarget {
    fn resolve(&self, config: &Config) -> anyhow::Result<Resolved> {
        let endpoint = self
            .endpoint
            .clone()
            .unwrap_or_else(|| config.oss.endpoint.clone());
        let bucket = self
            .bucket
            .clone()
            .unwrap_or_else(|| config.oss.bucket.clone());

        if endpoint.trim().is_empty() {
            anyhow::bail!("No OSS endpoint. Pass --endpoint or set [oss].endpoint in the config.");
        }
        if bucket.trim().is_empty() {
            anyhow::bail!("No OSS bucket. Pass --bucket or set [oss].bucket in the config.");
        }

        let Some(access_key_id) = self.access_key_id.clone() else {
            anyhow::bail!("No access key ID. Pass --access-key-id or set OSS_ACCESS_KEY_ID.");
        };
        let Some(access_key_secret) = self.access_key_secret.clone() else {
            anyhow::bail!(
                "No access key secret. Pass --access-key-secret or set OSS_ACCESS_KEY_SECRET."
            );
        };

        Ok(Resolved {
            access_key_id,
            access_key_secret,
            endpoint,
            bucket,
        })
    }
}

/// Execute the oss command.
pub async fn execute(args: OssArgs, config: &Config) -> anyhow::Result<()> {
    let target = args.target.resolve(config)?;
    let timeout = Duration::from_millis(config.oss.timeout_ms);

    let output = match args.command {
        OssCommand::Upload { local, key } => {
            let inputs = OssUploadInputs {
                access_key_id: target.access_key_id,
                access_key_secret: target.access_key_secret,
                endpoint: target.endpoint,
                bucket_name: target.bucket,
                local_file_path: expand_path(&local).to_string_lossy().into_owned(),
                object_name: key,
            };
            OssUploadNode::new(timeout).run(&inputs).await?
        }

        OssCommand::Download { key, local } => {
            let inputs = OssDownloadInputs {
                access_key_id: target.access_key_id,
                access_key_secret: target.access_key_secret,
                endpoint: target.endpoint,
                bucket_name: target.bucket,
                oss_file_path: key,
                local_save_path: expand_path(&local).to_string_lossy().into_owned(),
            };
            OssDownloadNode::new(timeout).run(&inputs).await?
        }
    };

    println!("{output}");
    Ok(())
}
