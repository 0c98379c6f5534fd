//! Loading an image file from disk.

use std::path::{Path, PathBuf};

use super::ImageBatch;
use crate::error::NodeError;

/// A decoded image and the path it came from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: ImageBatch,
    pub path: String,
}

/// Decode `path` as RGB into a batch of one.
pub fn load_image(path: &str) -> Result<LoadedImage, NodeError> {
    let file = Path::new(path);
    if !file.exists() {
        tracing::error!("Image file does not exist: {path}");
        return Err(NodeError::FileNotFound(PathBuf::from(path)));
    }

    let decoded = image::ImageReader::open(file)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| NodeError::ImageDecode {
            path: file.to_path_buf(),
            message: e.to_string(),
        })?
        .decode()
        .map_err(|e| NodeError::ImageDecode {
            path: file.to_path_buf(),
            message: e.to_string(),
        })?;

    let rgb = decoded.to_rgb8();
    tracing::debug!("Loaded {path} ({}x{})", rgb.width(), rgb.height());

    Ok(LoadedImage {
        image: ImageBatch::from_rgb(&rgb),
        path: path.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_load_png_as_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 128]))
            .save(&path)
            .unwrap();

        let path_str = path.to_str().unwrap();
        let loaded = load_image(path_str).unwrap();
        assert_eq!(loaded.path, path_str);
        assert_eq!(loaded.image.channels(), 3);
        assert_eq!((loaded.image.width(), loaded.image.height()), (4, 2));
        assert!((loaded.image.data()[0] - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_file() {
        let err = load_image("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, NodeError::FileNotFound(_)));
        assert!(err.to_string().contains("/definitely/not/here.png"));
    }

    #[test]
    fn test_format_detected_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("real.png");
        RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]))
            .save(&png)
            .unwrap();
        let misnamed = dir.path().join("misnamed.jpg");
        std::fs::copy(&png, &misnamed).unwrap();

        assert!(load_image(misnamed.to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = load_image(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, NodeError::ImageDecode { .. }));
    }
}
