//! Texture/style analysis from edge density and local noise.
//!
//! This is a coarse bucketed classifier, not a shape detector: the edge
//! density of the grid selects one band of shape/style tags, and a blur-based
//! noise proxy adds "clean" or "dynamic".

use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::sobel_gradients;

use crate::config::{EdgeBand, TextureConfig};
use crate::error::AnalysisError;
use crate::pipeline::PixelGrid;
use crate::types::dedup_keep_first;

/// Raw texture measurements for one grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureStats {
    /// Fraction of pixels whose Sobel magnitude exceeds the edge threshold
    pub edge_density: f32,
    /// Mean absolute difference between the gray grid and its blur
    pub noise: f32,
}

/// Shape and style tags, strongest signal first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextureTags {
    pub shapes: Vec<String>,
    pub styles: Vec<String>,
}

/// Measures texture statistics and maps them to tags.
pub struct TextureAnalyzer {
    config: TextureConfig,
}

impl TextureAnalyzer {
    pub fn new(config: TextureConfig) -> Self {
        Self { config }
    }

    /// Measure then classify.
    pub fn analyze(&self, grid: &PixelGrid) -> Result<TextureTags, AnalysisError> {
        let stats = self.measure(grid)?;
        tracing::trace!(
            "  Texture: edge_density={:.4} noise={:.2}",
            stats.edge_density,
            stats.noise
        );
        Ok(self.classify(stats))
    }

    /// Compute edge density and the noise proxy.
    pub fn measure(&self, grid: &PixelGrid) -> Result<TextureStats, AnalysisError> {
        grid.ensure_non_empty()?;
        let gray = grid.to_luma();
        Ok(TextureStats {
            edge_density: self.edge_density(&gray),
            noise: self.noise(&gray),
        })
    }

    fn edge_density(&self, gray: &GrayImage) -> f32 {
        let gradients = sobel_gradients(gray);
        let total = gradients.pixels().len();
        let edges = gradients
            .pixels()
            .filter(|p| p.0[0] as f32 > self.config.edge_threshold)
            .count();
        edges as f32 / total as f32
    }

    fn noise(&self, gray: &GrayImage) -> f32 {
        let blurred = gaussian_blur_f32(gray, self.config.blur_sigma);
        let total: u64 = gray
            .pixels()
            .zip(blurred.pixels())
            .map(|(a, b)| (a.0[0] as i32 - b.0[0] as i32).unsigned_abs() as u64)
            .sum();
        total as f32 / gray.pixels().len() as f32
    }

    /// Map measurements to tags through the ordered edge-density bands.
    pub fn classify(&self, stats: TextureStats) -> TextureTags {
        let band = self.band_for(stats.edge_density);

        let mut styles: Vec<&str> = band
            .map(|b| b.styles.iter().map(String::as_str).collect())
            .unwrap_or_default();
        styles.push(if stats.noise < self.config.noise_threshold {
            "clean"
        } else {
            "dynamic"
        });

        TextureTags {
            shapes: dedup_keep_first(band.map(|b| b.shapes.as_slice()).unwrap_or_default()),
            styles: dedup_keep_first(styles),
        }
    }

    /// First band whose bound exceeds `density`; an unbounded band catches
    /// the rest, otherwise the last band does.
    fn band_for(&self, density: f32) -> Option<&EdgeBand> {
        self.config
            .bands
            .iter()
            .find(|b| b.below.map_or(true, |bound| density < bound))
            .or_else(|| self.config.bands.last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> TextureAnalyzer {
        TextureAnalyzer::new(TextureConfig::default())
    }

    fn stats(edge_density: f32, noise: f32) -> TextureStats {
        TextureStats {
            edge_density,
            noise,
        }
    }

    /// Alternating black/white stripes `period` pixels wide.
    fn striped(size: u32, period: u32) -> PixelGrid {
        let pixels = (0..size * size)
            .map(|i| {
                let x = i % size;
                if (x / period) % 2 == 0 {
                    [0, 0, 0]
                } else {
                    [255, 255, 255]
                }
            })
            .collect();
        PixelGrid::from_pixels(size, size, pixels).unwrap()
    }

    #[test]
    fn test_smooth_clean_band() {
        let tags = analyzer().classify(stats(0.01, 3.0));
        assert_eq!(tags.shapes, vec!["smooth shapes"]);
        for style in ["minimal", "gradient", "clean"] {
            assert!(tags.styles.iter().any(|s| s == style), "missing {style}");
        }
    }

    #[test]
    fn test_bands_step_with_density() {
        let a = analyzer();
        assert_eq!(a.classify(stats(0.03, 0.0)).shapes, vec!["waves"]);
        assert_eq!(a.classify(stats(0.08, 0.0)).shapes, vec!["lines"]);
        assert_eq!(a.classify(stats(0.5, 0.0)).shapes, vec!["particles", "mesh"]);
    }

    #[test]
    fn test_band_bounds_are_exclusive() {
        assert_eq!(analyzer().classify(stats(0.02, 0.0)).shapes, vec!["waves"]);
    }

    #[test]
    fn test_noisy_is_dynamic() {
        let tags = analyzer().classify(stats(0.5, 20.0));
        assert!(tags.styles.contains(&"dynamic".to_string()));
        assert!(!tags.styles.contains(&"clean".to_string()));
    }

    #[test]
    fn test_tags_deduplicated() {
        let config = TextureConfig {
            bands: vec![EdgeBand {
                below: None,
                shapes: vec!["mesh".into(), "Mesh".into()],
                styles: vec!["clean".into(), "minimal".into()],
            }],
            ..TextureConfig::default()
        };
        let tags = TextureAnalyzer::new(config).classify(stats(0.0, 0.0));
        assert_eq!(tags.shapes, vec!["mesh"]);
        assert_eq!(tags.styles, vec!["clean", "minimal"]);
    }

    #[test]
    fn test_all_bounded_bands_fall_back_to_last() {
        let config = TextureConfig {
            bands: vec![
                EdgeBand {
                    below: Some(0.1),
                    shapes: vec!["waves".into()],
                    styles: vec![],
                },
                EdgeBand {
                    below: Some(0.2),
                    shapes: vec!["lines".into()],
                    styles: vec![],
                },
            ],
            ..TextureConfig::default()
        };
        let tags = TextureAnalyzer::new(config).classify(stats(0.9, 0.0));
        assert_eq!(tags.shapes, vec!["lines"]);
    }

    #[test]
    fn test_uniform_grid_measures_flat() {
        let measured = analyzer().measure(&PixelGrid::uniform(100, 100, [40, 90, 200])).unwrap();
        assert_eq!(measured.edge_density, 0.0);
        assert!(measured.noise < 1.5, "noise {}", measured.noise);
        let tags = analyzer().analyze(&PixelGrid::uniform(100, 100, [40, 90, 200])).unwrap();
        assert_eq!(tags.shapes, vec!["smooth shapes"]);
        assert!(tags.styles.contains(&"clean".to_string()));
    }

    #[test]
    fn test_fine_stripes_measure_busy() {
        let measured = analyzer().measure(&striped(100, 2)).unwrap();
        assert!(measured.edge_density > 0.5, "density {}", measured.edge_density);
        assert!(measured.noise > 8.0, "noise {}", measured.noise);
    }

    #[test]
    fn test_measure_is_deterministic() {
        let grid = striped(64, 5);
        assert_eq!(analyzer().measure(&grid).unwrap(), analyzer().measure(&grid).unwrap());
    }

    #[test]
    fn test_empty_grid_is_invalid_input() {
        let empty = PixelGrid::from_pixels(0, 0, vec![]).unwrap();
        assert!(matches!(
            analyzer().analyze(&empty),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
