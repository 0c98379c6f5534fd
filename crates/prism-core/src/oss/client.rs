//! HTTP client for Aliyun OSS.
//!
//! Uses virtual-hosted addressing (`{bucket}.{endpoint-host}`) and header
//! signing. Only the three operations the nodes need are implemented.

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use reqwest::{Method, Url};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::sign::{authorization, canonical_resource, http_date, Credentials, StringToSign};
use super::ObjectStore;
use crate::error::OssError;

/// Read size for streamed uploads.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// OSS client bound to one bucket.
pub struct OssClient {
    credentials: Credentials,
    bucket: String,
    scheme: String,
    host: String,
    client: reqwest::Client,
}

impl OssClient {
    /// Create a client for `bucket` at `endpoint`.
    ///
    /// The endpoint may omit the scheme (`oss-cn-hangzhou.aliyuncs.com`), in
    /// which case plain HTTP is used.
    pub fn new(
        credentials: Credentials,
        endpoint: &str,
        bucket: &str,
        timeout: Duration,
    ) -> Result<Self, OssError> {
        let (scheme, host) = parse_endpoint(endpoint)?;
        if bucket.trim().is_empty() {
            return Err(OssError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                message: "bucket name is empty".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OssError::Request(e.to_string()))?;

        Ok(Self {
            credentials,
            bucket: bucket.trim().to_string(),
            scheme,
            host,
            client,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// URL of an object (or of the bucket root when `key` is empty).
    pub fn object_url(&self, key: &str) -> Result<Url, OssError> {
        let base = format!("{}://{}.{}/", self.scheme, self.bucket, self.host);
        let mut url = Url::parse(&base).map_err(|e| OssError::InvalidEndpoint {
            endpoint: base.clone(),
            message: e.to_string(),
        })?;
        url.set_path(key);
        Ok(url)
    }

    /// Build a signed request. `subresource` is both signed and sent as the query.
    fn signed(
        &self,
        method: Method,
        key: &str,
        subresource: Option<&str>,
        content_type: &str,
    ) -> Result<reqwest::RequestBuilder, OssError> {
        let mut url = self.object_url(key)?;
        url.set_query(subresource);

        let date = http_date();
        let resource = canonical_resource(&self.bucket, key, subresource);
        let auth = authorization(
            &self.credentials,
            &StringToSign {
                verb: method.as_str(),
                content_md5: "",
                content_type,
                date: &date,
                resource: &resource,
            },
        )?;

        let mut builder = self
            .client
            .request(method, url)
            .header("Date", date)
            .header("Authorization", auth);
        if !content_type.is_empty() {
            builder = builder.header("Content-Type", content_type);
        }
        Ok(builder)
    }
}

#[async_trait]
impl ObjectStore for OssClient {
    async fn put_object_from_file(&self, key: &str, local_path: &Path) -> Result<(), OssError> {
        let file = tokio::fs::File::open(local_path).await?;
        let len = file.metadata().await?.len();
        let content_type = content_type_for(key);
        tracing::debug!("PUT oss://{}/{key} ({len} bytes, {content_type})", self.bucket);

        let resp = self
            .signed(Method::PUT, key, None, content_type)?
            .header("Content-Length", len)
            .body(reqwest::Body::wrap_stream(file_chunks(file)))
            .send()
            .await
            .map_err(request_error)?;
        check_status(resp).await?;
        Ok(())
    }

    async fn get_object_to_file(&self, key: &str, local_path: &Path) -> Result<(), OssError> {
        tracing::debug!("GET oss://{}/{key} -> {}", self.bucket, local_path.display());

        let resp = self
            .signed(Method::GET, key, None, "")?
            .send()
            .await
            .map_err(request_error)?;
        let resp = check_status(resp).await?;

        let chunks = resp.bytes_stream().map(|chunk| chunk.map_err(request_error));
        write_stream_to_file(chunks, local_path).await
    }

    async fn bucket_location(&self) -> Result<String, OssError> {
        let resp = self
            .signed(Method::GET, "", Some("location"), "")?
            .send()
            .await
            .map_err(request_error)?;
        let body = check_status(resp)
            .await?
            .text()
            .await
            .map_err(request_error)?;

        xml_text(&body, "LocationConstraint").ok_or_else(|| OssError::Server {
            status: 200,
            code: "MalformedLocation".to_string(),
            message: "response has no LocationConstraint element".to_string(),
            request_id: String::new(),
        })
    }
}

/// Stream a file in fixed-size chunks, ending after EOF or the first read error.
fn file_chunks(file: tokio::fs::File) -> impl Stream<Item = std::io::Result<Vec<u8>>> {
    futures_util::stream::unfold(Some(file), |state| async move {
        let Some(mut file) = state else {
            return None;
        };
        let mut buf = vec![0u8; UPLOAD_CHUNK_SIZE];
        match file.read(&mut buf).await {
            Ok(0) => None,
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(buf), Some(file)))
            }
            Err(e) => Some((Err(e), None)),
        }
    })
}

/// Sibling path a download is written to before it is renamed into place.
fn partial_path(local_path: &Path) -> PathBuf {
    let mut name = local_path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Write `chunks` to `local_path`. A failed write leaves no file behind and
/// does not touch an existing file at `local_path`.
async fn write_stream_to_file<S, B>(chunks: S, local_path: &Path) -> Result<(), OssError>
where
    S: Stream<Item = Result<B, OssError>>,
    B: AsRef<[u8]>,
{
    let partial = partial_path(local_path);
    let result = async {
        let mut chunks = std::pin::pin!(chunks);
        let mut file = tokio::fs::File::create(&partial).await?;
        while let Some(chunk) = chunks.next().await {
            file.write_all(chunk?.as_ref()).await?;
        }
        file.flush().await?;
        drop(file);
        tokio::fs::rename(&partial, local_path).await?;
        Ok::<(), OssError>(())
    }
    .await;

    if result.is_err() {
        if let Err(e) = tokio::fs::remove_file(&partial).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove partial download {}: {e}", partial.display());
            }
        }
    }
    result
}

fn parse_endpoint(endpoint: &str) -> Result<(String, String), OssError> {
    let trimmed = endpoint.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let invalid = |message: String| OssError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        message,
    };
    let url = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| invalid("missing host".to_string()))?;
    let host = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Ok((url.scheme().to_string(), host))
}

fn request_error(error: reqwest::Error) -> OssError {
    OssError::Request(error.to_string())
}

/// Turn a non-2xx response into [`OssError::Server`] using the OSS error document.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, OssError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let header_request_id = resp
        .headers()
        .get("x-oss-request-id")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = resp.text().await.unwrap_or_default();

    Err(OssError::Server {
        status: status.as_u16(),
        code: xml_text(&body, "Code").unwrap_or_else(|| "Unknown".to_string()),
        message: xml_text(&body, "Message").unwrap_or(body.clone()),
        request_id: header_request_id
            .or_else(|| xml_text(&body, "RequestId"))
            .unwrap_or_default(),
    })
}

/// Text of the first `<tag>...</tag>` element, trimmed.
fn xml_text(body: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let start = body.find(&open)?;
    let content_start = start + body[start..].find('>')? + 1;
    let len = body[content_start..].find(&close)?;
    Some(body[content_start..content_start + len].trim().to_string())
}

/// MIME type from the object key's extension.
fn content_type_for(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
