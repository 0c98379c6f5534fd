//! Aliyun OSS upload and download nodes.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{NodeError, NodeResult};
use crate::oss::{self, Credentials, ObjectStore, OssClient};

/// Inputs of the `AliyunOSSUploadNode` node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OssUploadInputs {
    pub access_key_id: String,
    pub access_key_secret: String,
    /// e.g. `https://oss-cn-hangzhou.aliyuncs.com`
    pub endpoint: String,
    pub bucket_name: String,
    pub local_file_path: String,
    /// Object key, e.g. `uploads/test.jpg`
    pub object_name: String,
}

/// Inputs of the `AliyunOSSDownloadNode` node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OssDownloadInputs {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub endpoint: String,
    pub bucket_name: String,
    pub oss_file_path: String,
    pub local_save_path: String,
}

fn client(
    access_key_id: &str,
    access_key_secret: &str,
    endpoint: &str,
    bucket: &str,
    timeout: Duration,
) -> Result<OssClient, crate::error::OssError> {
    OssClient::new(
        Credentials::new(access_key_id, access_key_secret),
        endpoint,
        bucket,
        timeout,
    )
}

/// The `AliyunOSSUploadNode` node: returns the uploaded object's public URL.
pub struct OssUploadNode {
    timeout: Duration,
}

impl OssUploadNode {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn run(&self, inputs: &OssUploadInputs) -> NodeResult<String> {
        let store = client(
            &inputs.access_key_id,
            &inputs.access_key_secret,
            &inputs.endpoint,
            &inputs.bucket_name,
            self.timeout,
        )
        .map_err(NodeError::OssUpload)?;
        self.run_with(&store, inputs).await
    }

    /// Upload through an existing store.
    pub async fn run_with(
        &self,
        store: &dyn ObjectStore,
        inputs: &OssUploadInputs,
    ) -> NodeResult<String> {
        oss::upload(
            store,
            &inputs.bucket_name,
            Path::new(&inputs.local_file_path),
            &inputs.object_name,
        )
        .await
        .map_err(|e| {
            let err = NodeError::OssUpload(e);
            tracing::error!("{err}");
            err
        })
    }
}

/// The `AliyunOSSDownloadNode` node: returns the local path written.
pub struct OssDownloadNode {
    timeout: Duration,
}

impl OssDownloadNode {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn run(&self, inputs: &OssDownloadInputs) -> NodeResult<String> {
        let store = client(
            &inputs.access_key_id,
            &inputs.access_key_secret,
            &inputs.endpoint,
            &inputs.bucket_name,
            self.timeout,
        )
        .map_err(NodeError::OssDownload)?;
        self.run_with(&store, inputs).await
    }

    /// Download through an existing store.
    pub async fn run_with(
        &self,
        store: &dyn ObjectStore,
        inputs: &OssDownloadInputs,
    ) -> NodeResult<String> {
        let saved = oss::download(store, &inputs.oss_file_path, Path::new(&inputs.local_save_path))
            .await
            .map_err(|e| {
                let err = NodeError::OssDownload(e);
                tracing::error!("{err}");
                err
            })?;
        Ok(saved.display().to_string())
    }
}
