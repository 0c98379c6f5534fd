//! Image buffers exchanged between nodes.
//!
//! - **batch**: the host's IMAGE value, a batch of float pixel arrays
//! - **normalize**: turn an image source into a data URI or URL for the API
//! - **loader**: read an image file from disk into a batch

pub mod batch;
pub mod loader;
pub mod normalize;

pub use batch::ImageBatch;
pub use loader::{load_image, LoadedImage};
pub use normalize::normalize_image;
