//! Error types for Prism nodes.
//!
//! Errors are organized by layer: configuration, the completion API, object
//! storage, and the node boundary that wraps them. Every variant renders a
//! human-readable message because string-output nodes surface failures as
//! their text output.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Prism operations outside a node invocation.
#[derive(Error, Debug)]
pub enum PrismError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Node invocation errors
    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures talking to the chat completion API.
#[derive(Error, Debug)]
pub enum LlmError {
    /// The HTTP client could not be constructed
    #[error("client initialization failed: {0}")]
    Client(String),

    /// Transport-level failure (DNS, connect, TLS, timeout)
    #[error("request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON shape
    #[error("failed to parse response: {0}")]
    Decode(String),

    /// The API returned no choices or no message content
    #[error("response contained no content")]
    EmptyResponse,
}

/// Failures talking to Aliyun OSS.
#[derive(Error, Debug)]
pub enum OssError {
    /// Local source file is missing (checked before any network activity)
    #[error("local file {} not found", .0.display())]
    LocalFileNotFound(PathBuf),

    /// The endpoint string could not be turned into a bucket URL
    #[error("invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    /// Transport-level failure
    #[error("{0}")]
    Request(String),

    /// OSS answered with an error document
    #[error("HTTP {status} {code}: {message} (request id: {request_id})")]
    Server {
        status: u16,
        code: String,
        message: String,
        request_id: String,
    },

    /// Request signing failed
    #[error("signing failed: {0}")]
    Signing(String),

    /// Local filesystem error while reading or writing an object
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced at the node boundary.
///
/// The `Display` text is what a string-output node returns to the host.
#[derive(Error, Debug)]
pub enum NodeError {
    /// No API key from the call, the environment, or the credential file
    #[error("API key not provided.")]
    MissingApiKey,

    /// The completion client could not be created
    #[error("Client initialization failed: {0}")]
    ClientInit(String),

    /// The vision node received neither an image, base64 data, nor a URL
    #[error("An image URL, base64 data, or IMAGE input is required.")]
    MissingImageSource,

    /// Base64 image payload did not decode
    #[error("The provided base64 image data is invalid: {0}")]
    InvalidBase64(String),

    /// An image buffer could not be encoded for transmission
    #[error("Failed to convert IMAGE input to base64: {0}")]
    ImageEncode(String),

    /// An image file could not be decoded
    #[error("Failed to decode image {}: {message}", .path.display())]
    ImageDecode { path: PathBuf, message: String },

    /// Every prompt source resolved to empty text
    #[error("The {0} prompt must not be empty.")]
    EmptyPrompt(&'static str),

    /// A local path does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A declared input is out of range or malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The completion call failed
    #[error("{api} API call failed: {source}")]
    Llm {
        api: &'static str,
        #[source]
        source: LlmError,
    },

    /// Upload to object storage failed
    #[error("{}", oss_upload_message(.0))]
    OssUpload(#[source] OssError),

    /// Download from object storage failed
    #[error("Download failed: {0}")]
    OssDownload(#[source] OssError),

    /// The host asked for a node class that is not registered
    #[error("Unknown node class: {0}")]
    UnknownNode(String),
}

/// Upload failures are reported with one prefix per error class.
fn oss_upload_message(error: &OssError) -> String {
    match error {
        OssError::LocalFileNotFound(path) => {
            format!("Error: local file {} not found", path.display())
        }
        OssError::Request(_) => format!("Network error: {error}"),
        OssError::Server { .. } => format!("Server error: {error}"),
        other => format!("Upload failed: {other}"),
    }
}

/// Convenience type alias for Prism results.
pub type Result<T> = std::result::Result<T, PrismError>;

/// Convenience type alias for node results.
pub type NodeResult<T> = std::result::Result<T, NodeError>;
