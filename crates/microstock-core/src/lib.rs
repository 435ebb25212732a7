//! Microstock Core - stock-photo metadata from raw pixels.
//!
//! Microstock turns a raster image into a title, a description and a capped,
//! deduplicated keyword list suitable for stock agency upload forms.
//!
//! # Architecture
//!
//! ```text
//! Image → Validate → Decode → Sample grid → Color + Texture
//!       → Merge (optional vision model) → Synthesize → Export
//! ```
//!
//! Color classification and metadata synthesis are pure and deterministic.
//! The external vision model is optional; when it is unavailable the
//! pipeline falls back to local analysis without failing the image.
//!
//! # Usage
//!
//! ```rust,ignore
//! use microstock_core::{BatchOrchestrator, Config, ExportFormat, ExportWriter};
//!
//! #[tokio::main]
//! async fn main() -> microstock_core::Result<()> {
//!     let config = Config::load()?;
//!     let orchestrator = BatchOrchestrator::new(&config)?;
//!
//!     let report = orchestrator.run(&["./background.jpg".into()]).await;
//!     ExportWriter::new(std::io::stdout(), ExportFormat::Csv, false)
//!         .write_rows(&report.rows)?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod analysis;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod export;
pub mod llm;
pub mod metadata;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use descriptor::{DescriptorSource, VisionDescriber};
pub use error::{
    AnalysisError, ConfigError, DescriptorError, MicrostockError, PipelineError, PipelineResult,
    Result,
};
pub use export::{ExportFormat, ExportWriter, MetadataField};
pub use metadata::{MetadataSynthesizer, MAX_KEYWORDS};
pub use pipeline::{BatchOrchestrator, BatchProgress, FileDiscovery, ImageProcessor};
pub use types::{
    BatchReport, BatchRow, BatchStats, ColorLabel, DescriptorSet, ExternalDescriptor,
    MetadataRecord, SkippedRow,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_orchestrator_from_default_config() {
        let orchestrator = BatchOrchestrator::new(&Config::default()).unwrap();
        assert!(!orchestrator.processor().has_external_source());
        assert_eq!(orchestrator.processor().color_strategy(), "nearest_reference");
    }
}
