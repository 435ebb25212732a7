//! Batch orchestration: run a list of images sequentially and collect rows.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::descriptor::{source_from_config, DescriptorSource, ExternalStatus};
use crate::error::ConfigError;
use crate::types::{BatchReport, BatchStats, SkippedRow};

use super::processor::ImageProcessor;

/// Progress notification sent after each image.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// Images finished so far, including this one
    pub done: usize,
    pub total: usize,
    pub path: &'a Path,
    /// Whether this image produced a row
    pub succeeded: bool,
}

/// Processes images one after another. A failing image becomes a
/// `SkippedRow`; it never stops the batch.
pub struct BatchOrchestrator {
    processor: ImageProcessor,
}

impl BatchOrchestrator {
    /// Build from configuration, creating the configured descriptor source.
    ///
    /// Fails before any image is touched when the configuration is invalid or
    /// an external descriptor is required but cannot be set up.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let source = source_from_config(&config.descriptor, &config.llm)?;
        Self::with_source(config, source)
    }

    /// Build with an explicitly injected descriptor source.
    pub fn with_source(
        config: &Config,
        source: Option<Arc<dyn DescriptorSource>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.descriptor.require_external && source.is_none() {
            return Err(ConfigError::MissingCredentials(
                "an external descriptor is required but none is available".to_string(),
            ));
        }
        Ok(Self {
            processor: ImageProcessor::new(config, source),
        })
    }

    pub fn processor(&self) -> &ImageProcessor {
        &self.processor
    }

    pub async fn run(&self, files: &[PathBuf]) -> BatchReport {
        self.run_with_progress(files, |_| {}).await
    }

    /// Process every file in order, calling `on_progress` after each one.
    pub async fn run_with_progress<F>(&self, files: &[PathBuf], mut on_progress: F) -> BatchReport
    where
        F: FnMut(BatchProgress<'_>),
    {
        let start = Instant::now();
        let mut report = BatchReport::default();
        let mut external_fallbacks = 0;

        for (index, path) in files.iter().enumerate() {
            let succeeded = match self.processor.process(path).await {
                Ok(processed) => {
                    if processed.external == ExternalStatus::Unavailable {
                        external_fallbacks += 1;
                    }
                    report.rows.push(processed.row);
                    true
                }
                Err(e) => {
                    tracing::error!("Skipping {:?}: {}", path, e);
                    report.skipped.push(SkippedRow {
                        filename: display_name(path),
                        reason_code: e.reason_code().to_string(),
                        message: e.to_string(),
                    });
                    false
                }
            };

            on_progress(BatchProgress {
                done: index + 1,
                total: files.len(),
                path,
                succeeded,
            });
        }

        let elapsed = start.elapsed().as_secs_f64();
        report.stats = BatchStats {
            succeeded: report.rows.len(),
            skipped: report.skipped.len(),
            external_fallbacks,
            images_per_second: if elapsed > 0.0 {
                report.rows.len() as f64 / elapsed
            } else {
                0.0
            },
            total_seconds: elapsed,
        };

        tracing::info!(
            "Batch complete: {} succeeded, {} skipped in {:.2}s",
            report.stats.succeeded,
            report.stats.skipped,
            elapsed
        );
        report
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
