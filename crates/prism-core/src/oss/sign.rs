//! OSS header signing (signature version 1).
//!
//! ```text
//! Authorization: OSS <AccessKeyId>:<Signature>
//! Signature = base64(HMAC-SHA1(secret,
//!     VERB \n Content-MD5 \n Content-Type \n Date \n CanonicalizedResource))
//! ```

use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::OssError;

type HmacSha1 = Hmac<Sha1>;

/// Access key pair for one OSS account.
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .finish()
    }
}

/// The parts of a request covered by the signature.
pub struct StringToSign<'a> {
    pub verb: &'a str,
    pub content_md5: &'a str,
    pub content_type: &'a str,
    pub date: &'a str,
    pub resource: &'a str,
}

impl StringToSign<'_> {
    fn render(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}",
            self.verb, self.content_md5, self.content_type, self.date, self.resource
        )
    }
}

/// `/{bucket}/{key}`, or `/{bucket}/?{subresource}` for bucket operations.
pub fn canonical_resource(bucket: &str, key: &str, subresource: Option<&str>) -> String {
    match subresource {
        Some(sub) => format!("/{bucket}/{key}?{sub}"),
        None => format!("/{bucket}/{key}"),
    }
}

/// Compute the `Authorization` header value.
pub fn authorization(
    credentials: &Credentials,
    request: &StringToSign<'_>,
) -> Result<String, OssError> {
    let mut mac = HmacSha1::new_from_slice(credentials.access_key_secret.as_bytes())
        .map_err(|e| OssError::Signing(e.to_string()))?;
    mac.update(request.render().as_bytes());
    let signature = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());
    Ok(format!("OSS {}:{}", credentials.access_key_id, signature))
}

/// Current time in RFC 1123 form, as OSS expects in the `Date` header.
pub fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
