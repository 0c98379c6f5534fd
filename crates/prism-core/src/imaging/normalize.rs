//! Turning an image source into something the completion API accepts.

use base64::Engine;

use super::ImageBatch;
use crate::error::NodeError;

const DATA_IMAGE_PREFIX: &str = "data:image/";
const PNG_DATA_PREFIX: &str = "data:image/png;base64,";
const JPEG_DATA_PREFIX: &str = "data:image/jpeg;base64,";

/// Produce a data URI or URL for the first available source.
///
/// Priority is buffer, then base64, then URL. Blank strings count as absent.
pub fn normalize_image(
    buffer: Option<&ImageBatch>,
    base64_data: Option<&str>,
    url: Option<&str>,
) -> Result<String, NodeError> {
    let base64_data = base64_data.filter(|s| !s.trim().is_empty());
    let url = url.filter(|s| !s.trim().is_empty());

    if let Some(buffer) = buffer {
        tracing::info!("Converting IMAGE input to base64");
        let png = buffer.first_to_png().map_err(NodeError::ImageEncode)?;
        return Ok(format!(
            "{PNG_DATA_PREFIX}{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ));
    }

    if let Some(data) = base64_data {
        return normalize_base64(data);
    }

    if let Some(url) = url {
        tracing::info!("Using image URL {url}");
        return Ok(url.to_string());
    }

    Err(NodeError::MissingImageSource)
}

/// Pass data URIs through; validate bare payloads and label them JPEG.
fn normalize_base64(data: &str) -> Result<String, NodeError> {
    if data.starts_with(DATA_IMAGE_PREFIX) {
        return Ok(data.to_string());
    }

    tracing::warn!("Base64 string has no data URI prefix, assuming JPEG");
    let payload: String = data
        .rsplit(',')
        .next()
        .unwrap_or(data)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    base64::engine::general_purpose::STANDARD
        .decode(&payload)
        .map_err(|e| {
            tracing::error!("Base64 decode failed: {e}");
            NodeError::InvalidBase64(e.to_string())
        })?;

    Ok(format!("{JPEG_DATA_PREFIX}{data}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_base64_gets_jpeg_prefix() {
        let out = normalize_image(None, Some("aGVsbG8="), None).unwrap();
        assert_eq!(out, "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn test_line_wrapped_base64_is_accepted() {
        let data = "aGVs\nbG8=\r\n";
        let out = normalize_image(None, Some(data), None).unwrap();
        assert_eq!(out, format!("data:image/jpeg;base64,{data}"));
    }

    #[test]
    fn test_data_uri_passes_through() {
        let uri = "data:image/webp;base64,AAAA";
        assert_eq!(normalize_image(None, Some(uri), None).unwrap(), uri);
    }

    #[test]
    fn test_invalid_base64_is_reported() {
        let err = normalize_image(None, Some("not base64!!"), None).unwrap_err();
        assert!(matches!(err, NodeError::InvalidBase64(_)));
    }

    #[test]
    fn test_url_passes_through_verbatim() {
        let url = "https://example.com/cat.png?x=1";
        assert_eq!(normalize_image(None, None, Some(url)).unwrap(), url);
    }

    #[test]
    fn test_buffer_beats_base64_and_url() {
        let batch = ImageBatch::new(1, 2, 2, 3, vec![0.5; 12]).unwrap();
        let out = normalize_image(
            Some(&batch),
            Some("aGVsbG8="),
            Some("https://example.com/a.png"),
        )
        .unwrap();
        assert!(out.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_base64_beats_url() {
        let out = normalize_image(None, Some("aGVsbG8="), Some("https://example.com/a.png")).unwrap();
        assert!(out.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_blank_sources_are_absent() {
        let err = normalize_image(None, Some("   "), Some("")).unwrap_err();
        assert!(matches!(err, NodeError::MissingImageSource));
    }

    #[test]
    fn test_empty_batch_is_encode_error() {
        let batch = ImageBatch::new(0, 2, 2, 3, Vec::new()).unwrap();
        let err = normalize_image(Some(&batch), None, None).unwrap_err();
        assert!(matches!(err, NodeError::ImageEncode(_)));
    }
}
