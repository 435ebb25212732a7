//! Pipeline orchestration - wires together all processing stages for one image.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use image::DynamicImage;

use crate::analysis::{classifier_for, ColorClassifier, TextureAnalyzer};
use crate::config::Config;
use crate::descriptor::{DescriptorMerger, DescriptorSource, ExternalStatus, LocalDescriptors};
use crate::error::{AnalysisError, PipelineResult};
use crate::metadata::MetadataSynthesizer;
use crate::types::{BatchRow, DescriptorSet};

use super::decode::{format_to_string, ImageDecoder};
use super::sample::PixelSampler;
use super::validate::Validator;

/// Outcome of processing one image.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub row: BatchRow,
    /// The merged descriptor set the record was synthesized from
    pub descriptors: DescriptorSet,
    pub external: ExternalStatus,
}

/// Runs one image through validate, decode, sample, classify, analyze,
/// merge and synthesize.
pub struct ImageProcessor {
    validator: Validator,
    decoder: ImageDecoder,
    sampler: PixelSampler,
    classifier: Box<dyn ColorClassifier>,
    texture: TextureAnalyzer,
    merger: DescriptorMerger,
    synthesizer: MetadataSynthesizer,
    default_best_use: Vec<String>,
}

impl ImageProcessor {
    /// Create a processor. The external source, if any, is injected here.
    pub fn new(config: &Config, source: Option<Arc<dyn DescriptorSource>>) -> Self {
        Self {
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
            sampler: PixelSampler::new(config.sampling.clone()),
            classifier: classifier_for(&config.color),
            texture: TextureAnalyzer::new(config.texture.clone()),
            merger: DescriptorMerger::new(source, &config.descriptor),
            synthesizer: MetadataSynthesizer::new(config.metadata.clone()),
            default_best_use: config.metadata.default_best_use.clone(),
        }
    }

    /// Whether an external descriptor source is attached.
    pub fn has_external_source(&self) -> bool {
        self.merger.has_source()
    }

    /// Process a single image file.
    pub async fn process(&self, path: &Path) -> PipelineResult<ProcessedImage> {
        let start = Instant::now();
        tracing::debug!("Processing: {:?}", path);

        self.validator.validate(path)?;
        tracing::trace!("  Validate: {:?}", start.elapsed());

        let decode_start = Instant::now();
        let decoded = self.decoder.decode(path).await?;
        tracing::trace!(
            "  Decode: {:?} ({} bytes)",
            decode_start.elapsed(),
            decoded.file_size
        );

        let analysis_start = Instant::now();
        let local = self.analyze(&decoded.image).map_err(|e| e.at(path))?;
        tracing::trace!(
            "  Analysis: {:?} (color {}, shapes {:?})",
            analysis_start.elapsed(),
            local.color.label,
            local.texture.shapes
        );

        let outcome = self.merger.resolve(&local, &decoded.image).await;
        let record = self.synthesizer.synthesize(&outcome.set);

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        tracing::debug!(
            "Processed {:?} in {:?} ({}x{} {}, {} keywords)",
            filename,
            start.elapsed(),
            decoded.width,
            decoded.height,
            format_to_string(decoded.format),
            record.keywords.len()
        );

        Ok(ProcessedImage {
            row: BatchRow { filename, record },
            descriptors: outcome.set,
            external: outcome.external,
        })
    }

    /// Local analysis of a decoded image: sample, classify color, tag texture.
    pub fn analyze(&self, image: &DynamicImage) -> Result<LocalDescriptors, AnalysisError> {
        let grid = self.sampler.sample(image)?;
        let color = self.classifier.classify(&grid)?;
        let texture = self.texture.analyze(&grid)?;
        Ok(LocalDescriptors {
            color,
            texture,
            best_use: self.default_best_use.clone(),
        })
    }

    /// Name of the active color strategy.
    pub fn color_strategy(&self) -> &str {
        self.classifier.name()
    }
}
