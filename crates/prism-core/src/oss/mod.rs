//! Aliyun OSS upload and download.
//!
//! [`upload`] and [`download`] hold the node-level behavior (local checks,
//! public URL construction, directory creation) and talk to storage through
//! the [`ObjectStore`] trait, which [`OssClient`] implements over HTTP.

mod client;
mod sign;

pub use client::OssClient;
pub use sign::Credentials;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::OssError;

/// The storage operations the nodes use.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file as `key`.
    async fn put_object_from_file(&self, key: &str, local_path: &Path) -> Result<(), OssError>;

    /// Download `key` into `local_path`, replacing any existing file.
    async fn get_object_to_file(&self, key: &str, local_path: &Path) -> Result<(), OssError>;

    /// Region identifier of the bucket, e.g. `oss-cn-shanghai`.
    async fn bucket_location(&self) -> Result<String, OssError>;
}

/// Public URL of an uploaded object.
pub fn public_url(bucket: &str, location: &str, key: &str) -> String {
    format!("https://{bucket}.{location}.aliyuncs.com/{key}")
}

/// Upload `local_path` as `key` and return the object's public URL.
///
/// The local file is checked before any request is made.
pub async fn upload(
    store: &dyn ObjectStore,
    bucket: &str,
    local_path: &Path,
    key: &str,
) -> Result<String, OssError> {
    if !local_path.exists() {
        return Err(OssError::LocalFileNotFound(local_path.to_path_buf()));
    }

    store.put_object_from_file(key, local_path).await?;
    let location = store.bucket_location().await?;
    let url = public_url(bucket, &location, key);
    tracing::info!("Uploaded {} to {url}", local_path.display());
    Ok(url)
}

/// Download `key` to `local_path`, creating parent directories first.
pub async fn download(
    store: &dyn ObjectStore,
    key: &str,
    local_path: &Path,
) -> Result<PathBuf, OssError> {
    if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    store.get_object_to_file(key, local_path).await?;
    tracing::info!("Downloaded {key} to {}", local_path.display());
    Ok(local_path.to_path_buf())
}


#[cfg(test)]
mod tests {
    use super::testing::MemoryStore;
    use super::*;

    #[tokio::test]
    async fn test_upload_builds_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("frame.png");
        std::fs::write(&file, b"png bytes").unwrap();

        let store = MemoryStore::new("oss-cn-shanghai");
        let url = upload(&store, "drawbookai", &file, "comfyui/1755572562.png")
            .await
            .unwrap();
        assert_eq!(
            url,
            "https://drawbookai.oss-cn-shanghai.aliyuncs.com/comfyui/1755572562.png"
        );
        assert_eq!(
            store.objects.lock().unwrap()["comfyui/1755572562.png"],
            b"png bytes"
        );
    }

    #[tokio::test]
    async fn test_upload_missing_file_makes_no_calls() {
        let store = MemoryStore::new("oss-cn-shanghai");
        let err = upload(&store, "b", Path::new("/no/such/file.png"), "k")
            .await
            .unwrap_err();
        assert!(matches!(err, OssError::LocalFileNotFound(_)));
        assert!(err.to_string().contains("/no/such/file.png"));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_download_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new("oss-cn-beijing");
        store
            .objects
            .lock()
            .unwrap()
            .insert("remote/a.txt".to_string(), b"hello".to_vec());

        let dest = dir.path().join("nested/deeper/a.txt");
        let saved = download(&store, "remote/a.txt", &dest).await.unwrap();
        assert_eq!(saved, dest);
        assert_eq!(std::fs::read(&dest).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_download_missing_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new("oss-cn-beijing");
        let err = download(&store, "missing", &dir.path().join("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, OssError::Server { status: 404, .. }));
    }
}
