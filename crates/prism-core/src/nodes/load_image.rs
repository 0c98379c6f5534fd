//! Load an image file from a path into an IMAGE value.

use serde::Deserialize;

use crate::error::NodeResult;
use crate::imaging::{load_image, LoadedImage};

/// Inputs of the `LoadImage` node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoadImageInputs {
    pub image_path: String,
}

/// The `LoadImage` node. Unlike the string nodes its failures propagate.
#[derive(Debug, Default)]
pub struct LoadImageNode;

impl LoadImageNode {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, inputs: &LoadImageInputs) -> NodeResult<LoadedImage> {
        tracing::info!("Loading image from {}", inputs.image_path);
        load_image(inputs.image_path.trim())
    }
}
