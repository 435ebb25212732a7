//! Merge local analysis with an optional external descriptor.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::DynamicImage;

use crate::analysis::{ColorAnalysis, TextureTags};
use crate::config::DescriptorConfig;
use crate::error::DescriptorError;
use crate::pipeline::PreviewEncoder;
use crate::types::{dedup_keep_first, ColorLabel, DescriptorSet, ExternalDescriptor};

use super::DescriptorSource;

/// Everything local analysis contributes for one image.
#[derive(Debug, Clone)]
pub struct LocalDescriptors {
    pub color: ColorAnalysis,
    pub texture: TextureTags,
    pub best_use: Vec<String>,
}

/// What happened with the external source for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalStatus {
    /// No source configured
    NotConfigured,
    /// Source answered and was merged
    Used,
    /// Source failed; local signals only
    Unavailable,
}

/// Merged descriptor set plus how the external source fared.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub set: DescriptorSet,
    pub external: ExternalStatus,
}

/// Combine local and external signals into one `DescriptorSet`.
///
/// Local color wins unless `prefer_external` is set and the external main
/// color names a known label. Lists are local first, external appended,
/// deduplicated case-insensitively. External moods follow external styles.
pub fn merge(
    local: &LocalDescriptors,
    external: Option<&ExternalDescriptor>,
    prefer_external: bool,
) -> DescriptorSet {
    let Some(ext) = external else {
        return DescriptorSet {
            color: local.color.label,
            secondary_colors: unique_colors(local.color.secondary.iter().copied(), local.color.label),
            shapes: dedup_keep_first(&local.texture.shapes),
            styles: dedup_keep_first(&local.texture.styles),
            best_use: dedup_keep_first(&local.best_use),
        };
    };

    let external_color = ext.main_color.parse::<ColorLabel>().ok();
    let color = match external_color {
        Some(label) if prefer_external => label,
        _ => local.color.label,
    };

    let external_secondary = ext
        .secondary_colors
        .iter()
        .filter_map(|name| match name.parse::<ColorLabel>() {
            Ok(label) => Some(label),
            Err(e) => {
                tracing::trace!("  Dropping external secondary color: {e}");
                None
            }
        });

    DescriptorSet {
        color,
        secondary_colors: unique_colors(
            local.color.secondary.iter().copied().chain(external_secondary),
            color,
        ),
        shapes: dedup_keep_first(local.texture.shapes.iter().chain(&ext.shapes)),
        styles: dedup_keep_first(
            local
                .texture
                .styles
                .iter()
                .chain(&ext.style)
                .chain(&ext.mood),
        ),
        best_use: dedup_keep_first(local.best_use.iter().chain(&ext.best_use)),
    }
}

/// First-seen order, without repeats or the primary color.
fn unique_colors(colors: impl Iterator<Item = ColorLabel>, primary: ColorLabel) -> Vec<ColorLabel> {
    let mut seen = HashSet::from([primary]);
    colors.filter(|c| seen.insert(*c)).collect()
}

/// Resolves the descriptor set for an image, calling the external source at
/// most once and absorbing every failure.
pub struct DescriptorMerger {
    source: Option<Arc<dyn DescriptorSource>>,
    preview: PreviewEncoder,
    timeout: Duration,
    prefer_external: bool,
}

impl DescriptorMerger {
    pub fn new(source: Option<Arc<dyn DescriptorSource>>, config: &DescriptorConfig) -> Self {
        Self {
            source,
            preview: PreviewEncoder::new(config.preview_size),
            timeout: Duration::from_millis(config.timeout_ms),
            prefer_external: config.prefer_external,
        }
    }

    /// Whether an external source is configured.
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub async fn resolve(&self, local: &LocalDescriptors, image: &DynamicImage) -> MergeOutcome {
        let Some(source) = &self.source else {
            return MergeOutcome {
                set: merge(local, None, self.prefer_external),
                external: ExternalStatus::NotConfigured,
            };
        };

        let start = Instant::now();
        match self.fetch(source.as_ref(), image).await {
            Ok(descriptor) => {
                tracing::trace!("  External descriptor: {:?}", start.elapsed());
                MergeOutcome {
                    set: merge(local, Some(&descriptor), self.prefer_external),
                    external: ExternalStatus::Used,
                }
            }
            Err(e) => {
                tracing::warn!(
                    "External descriptor from {} unavailable, using local analysis: {e}",
                    source.name()
                );
                MergeOutcome {
                    set: merge(local, None, self.prefer_external),
                    external: ExternalStatus::Unavailable,
                }
            }
        }
    }

    async fn fetch(
        &self,
        source: &dyn DescriptorSource,
        image: &DynamicImage,
    ) -> Result<ExternalDescriptor, DescriptorError> {
        let preview = self.preview.encode(image)?;
        tokio::time::timeout(self.timeout, source.describe(&preview))
            .await
            .map_err(|_| DescriptorError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })?
    }
}
