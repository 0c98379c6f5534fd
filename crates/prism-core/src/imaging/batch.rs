//! Batched float image buffers.
//!
//! Layout is `[batch, height, width, channels]`, row-major, samples in `[0, 1]`.

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;

/// A batch of images stored as normalized `f32` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    batch: usize,
    height: u32,
    width: u32,
    channels: u8,
    data: Vec<f32>,
}

impl ImageBatch {
    /// Build a batch from raw samples, checking the shape.
    pub fn new(
        batch: usize,
        height: u32,
        width: u32,
        channels: u8,
        data: Vec<f32>,
    ) -> Result<Self, String> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(format!("unsupported channel count {channels}"));
        }
        let expected = batch * height as usize * width as usize * channels as usize;
        if data.len() != expected {
            return Err(format!(
                "expected {expected} samples for {batch}x{height}x{width}x{channels}, got {}",
                data.len()
            ));
        }
        Ok(Self {
            batch,
            height,
            width,
            channels,
            data,
        })
    }

    /// Wrap a single RGB image as a batch of one.
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let data = image
            .as_raw()
            .iter()
            .map(|&v| f32::from(v) / 255.0)
            .collect();
        Self {
            batch: 1,
            height,
            width,
            channels: 3,
            data,
        }
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// First image as 8-bit samples: scaled by 255, clamped, truncated.
    pub fn first_as_u8(&self) -> Option<Vec<u8>> {
        if self.batch == 0 {
            return None;
        }
        let len = self.height as usize * self.width as usize * self.channels as usize;
        Some(
            self.data[..len]
                .iter()
                .map(|&v| (v * 255.0).clamp(0.0, 255.0) as u8)
                .collect(),
        )
    }

    /// Encode the first image of the batch as PNG.
    pub fn first_to_png(&self) -> Result<Vec<u8>, String> {
        let pixels = self
            .first_as_u8()
            .ok_or_else(|| "image batch is empty".to_string())?;

        let (w, h) = (self.width, self.height);
        let shape_err = || format!("buffer does not match {w}x{h}x{}", self.channels);
        let image = match self.channels {
            1 => DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, pixels).ok_or_else(shape_err)?),
            3 => DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, pixels).ok_or_else(shape_err)?),
            _ => DynamicImage::ImageRgba8(RgbaImage::from_raw(w, h, pixels).ok_or_else(shape_err)?),
        };

        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| e.to_string())?;
        Ok(out.into_inner())
    }
}
