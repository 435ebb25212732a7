//! Image processing pipeline components.
//!
//! This module contains the stages every image goes through:
//! - **validate**: Pre-processing checks (existence, size, magic bytes)
//! - **decode**: Load and decode JPEG/PNG with a timeout
//! - **sample**: Shrink to the fixed analysis grid
//! - **preview**: JPEG previews for external descriptor sources
//! - **discovery**: Find image files in directories
//! - **processor**: Runs all stages for one image
//! - **batch**: Runs the processor over many images

pub mod batch;
pub mod decode;
pub mod discovery;
pub mod preview;
pub mod processor;
pub mod sample;
pub mod validate;

// Re-exports for convenient access
pub use batch::{BatchOrchestrator, BatchProgress};
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use preview::PreviewEncoder;
pub use processor::{ImageProcessor, ProcessedImage};
pub use sample::{PixelGrid, PixelSampler};
pub use validate::Validator;
