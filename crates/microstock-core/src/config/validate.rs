//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::metadata::MAX_KEYWORDS;

use super::{Config, EdgeBand};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(8..=512).contains(&self.sampling.grid_size) {
            return Err(ConfigError::ValidationError(
                "sampling.grid_size must be between 8 and 512".into(),
            ));
        }
        for (name, value) in [
            ("color.saturation_threshold", self.color.saturation_threshold),
            ("color.value_threshold", self.color.value_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0.0 and 1.0"
                )));
            }
        }
        if self.color.hue_bands.is_empty() {
            return Err(ConfigError::ValidationError(
                "color.hue_bands must not be empty".into(),
            ));
        }
        if let Some(band) = self
            .color
            .hue_bands
            .iter()
            .find(|b| !b.start.is_finite() || !b.end.is_finite())
        {
            return Err(ConfigError::ValidationError(format!(
                "color.hue_bands: band for {} has a non-finite bound",
                band.label
            )));
        }
        if let Some(band) = self.color.hue_bands.iter().find(|b| b.start >= b.end) {
            return Err(ConfigError::ValidationError(format!(
                "color.hue_bands: band for {} has start >= end",
                band.label
            )));
        }
        if self.color.diversity_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "color.diversity_threshold must be > 0".into(),
            ));
        }
        for (name, value) in [
            ("texture.edge_threshold", self.texture.edge_threshold),
            ("texture.blur_sigma", self.texture.blur_sigma),
            ("texture.noise_threshold", self.texture.noise_threshold),
        ] {
            if !positive_finite(value) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be a finite number > 0"
                )));
            }
        }
        validate_edge_bands(&self.texture.bands)?;
        if self.metadata.keyword_cap == 0 || self.metadata.keyword_cap > MAX_KEYWORDS {
            return Err(ConfigError::ValidationError(format!(
                "metadata.keyword_cap must be between 1 and {MAX_KEYWORDS}"
            )));
        }
        if self.descriptor.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "descriptor.timeout_ms must be > 0".into(),
            ));
        }
        if self.descriptor.preview_size == 0 {
            return Err(ConfigError::ValidationError(
                "descriptor.preview_size must be > 0".into(),
            ));
        }
        if self.descriptor.require_external && self.descriptor.provider.is_none() {
            return Err(ConfigError::ValidationError(
                "descriptor.require_external is set but descriptor.provider is not".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// NaN fails every comparison, so test for the positive case.
fn positive_finite(value: f32) -> bool {
    value > 0.0 && value.is_finite()
}

/// Bands must be non-empty with strictly increasing finite bounds. Only the
/// last band may be unbounded; an earlier one would swallow every density.
fn validate_edge_bands(bands: &[EdgeBand]) -> Result<(), ConfigError> {
    if bands.is_empty() {
        return Err(ConfigError::ValidationError(
            "texture.bands must not be empty".into(),
        ));
    }

    let mut previous: Option<f32> = None;
    for (i, band) in bands.iter().enumerate() {
        match band.below {
            None if i + 1 < bands.len() => {
                return Err(ConfigError::ValidationError(
                    "texture.bands: only the last band may omit `below`".into(),
                ));
            }
            None => {}
            Some(below) if !below.is_finite() => {
                return Err(ConfigError::ValidationError(
                    "texture.bands: `below` must be finite".into(),
                ));
            }
            Some(below) => {
                if previous.is_some_and(|p| p >= below) {
                    return Err(ConfigError::ValidationError(
                        "texture.bands must have strictly increasing `below` bounds".into(),
                    ));
                }
                previous = Some(below);
            }
        }
    }
    Ok(())
}
