//! Color classification: reduce a pixel grid to one `ColorLabel`.
//!
//! Two interchangeable strategies implement [`ColorClassifier`]:
//!
//! - [`HueBucketClassifier`] averages the hue of bright, saturated pixels and
//!   maps it through ordered hue bands. Fails soft to `dark` on images with no
//!   such pixels.
//! - [`NearestReferenceClassifier`] votes every pixel to its nearest named
//!   reference color. Fails soft to `colorful` on busy images and to
//!   `monochrome` when black/white/gray wins.
//!
//! Which one runs is a configuration choice (`color.strategy`).

use std::f32::consts::TAU;

use crate::config::{ColorConfig, ColorStrategy, HueBand};
use crate::error::AnalysisError;
use crate::pipeline::PixelGrid;
use crate::types::ColorLabel;

/// Result of classifying a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorAnalysis {
    /// The one label for the image
    pub label: ColorLabel,
    /// Runner-up colors, strongest first
    pub secondary: Vec<ColorLabel>,
}

impl ColorAnalysis {
    fn single(label: ColorLabel) -> Self {
        Self {
            label,
            secondary: vec![],
        }
    }
}

/// A strategy that names the dominant color of a grid.
///
/// Implementations are pure: the same grid always yields the same analysis,
/// and only an empty grid is an error.
pub trait ColorClassifier: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &str;

    fn classify(&self, grid: &PixelGrid) -> Result<ColorAnalysis, AnalysisError>;
}

/// Build the classifier selected by configuration.
pub fn classifier_for(config: &ColorConfig) -> Box<dyn ColorClassifier> {
    match config.strategy {
        ColorStrategy::HueBucket => Box::new(HueBucketClassifier::new(config)),
        ColorStrategy::NearestReference => Box::new(NearestReferenceClassifier::new(config)),
    }
}

/// Convert 8-bit RGB to HSV with every component in `0.0..=1.0`.
///
/// Hue is in `[0, 1)`; achromatic pixels report hue 0.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> (f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = max;
    let saturation = if max > 0.0 { delta / max } else { 0.0 };
    if delta <= f32::EPSILON {
        return (0.0, saturation, value);
    }

    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    ((sector / 6.0).rem_euclid(1.0), saturation, value)
}

// ── Hue-bucket strategy ────────────────────────────────────────────────────

/// Mean angle of `count` unit hue vectors, mapped back to `[0, 1)`.
fn circular_mean(count: usize, sum_cos: f64, sum_sin: f64) -> Option<f32> {
    if count == 0 {
        return None;
    }
    let resultant = (sum_cos * sum_cos + sum_sin * sum_sin).sqrt() / count as f64;
    if resultant < 1e-6 {
        return None;
    }
    let mean = sum_sin.atan2(sum_cos) / std::f64::consts::TAU;
    Some(mean.rem_euclid(1.0) as f32)
}

/// Averages the hue of confident pixels and buckets it.
pub struct HueBucketClassifier {
    saturation_threshold: f32,
    value_threshold: f32,
    bands: Vec<HueBand>,
}

impl HueBucketClassifier {
    pub fn new(config: &ColorConfig) -> Self {
        Self {
            saturation_threshold: config.saturation_threshold,
            value_threshold: config.value_threshold,
            bands: config.hue_bands.clone(),
        }
    }

    /// Count of pixels passing both thresholds, with the sum of their unit
    /// hue vectors.
    fn hue_vector(&self, grid: &PixelGrid) -> (usize, f64, f64) {
        let mut sum_cos = 0.0f64;
        let mut sum_sin = 0.0f64;
        let mut confident = 0usize;

        for &rgb in grid.pixels() {
            let (hue, saturation, value) = rgb_to_hsv(rgb);
            if value < self.value_threshold || saturation < self.saturation_threshold {
                continue;
            }
            let angle = (hue * TAU) as f64;
            sum_cos += angle.cos();
            sum_sin += angle.sin();
            confident += 1;
        }
        (confident, sum_cos, sum_sin)
    }

    /// Circular mean hue of the pixels that pass both thresholds.
    ///
    /// `None` when no pixel passes, or when the passing hues cancel out.
    pub fn mean_hue(&self, grid: &PixelGrid) -> Option<f32> {
        let (confident, sum_cos, sum_sin) = self.hue_vector(grid);
        circular_mean(confident, sum_cos, sum_sin)
    }

    fn label_for_hue(&self, hue: f32) -> Option<ColorLabel> {
        self.bands.iter().find(|b| b.contains(hue)).map(|b| b.label)
    }
}

impl ColorClassifier for HueBucketClassifier {
    fn name(&self) -> &str {
        "hue_bucket"
    }

    fn classify(&self, grid: &PixelGrid) -> Result<ColorAnalysis, AnalysisError> {
        grid.ensure_non_empty()?;

        let (confident, sum_cos, sum_sin) = self.hue_vector(grid);
        if confident == 0 {
            return Ok(ColorAnalysis::single(ColorLabel::Dark));
        }

        let label = circular_mean(confident, sum_cos, sum_sin)
            .and_then(|hue| self.label_for_hue(hue))
            .unwrap_or(ColorLabel::Abstract);
        Ok(ColorAnalysis::single(label))
    }
}

// ── Nearest-reference strategy ─────────────────────────────────────────────

/// Named reference colors. Order is the tie-break order.
pub const REFERENCE_COLORS: [(ColorLabel, [u8; 3]); 12] = [
    (ColorLabel::Red, [220, 30, 40]),
    (ColorLabel::Orange, [255, 140, 0]),
    (ColorLabel::Yellow, [250, 220, 40]),
    (ColorLabel::Green, [40, 170, 60]),
    (ColorLabel::Teal, [0, 128, 128]),
    (ColorLabel::Cyan, [0, 200, 220]),
    (ColorLabel::Blue, [30, 80, 220]),
    (ColorLabel::Purple, [130, 50, 180]),
    (ColorLabel::Pink, [240, 110, 180]),
    (ColorLabel::Black, [15, 15, 15]),
    (ColorLabel::White, [245, 245, 245]),
    (ColorLabel::Gray, [128, 128, 128]),
];

/// Index into `REFERENCE_COLORS` of the closest reference by squared
/// Euclidean distance. Ties go to the earlier entry.
fn nearest_reference(rgb: [u8; 3]) -> usize {
    let mut best = 0;
    let mut best_dist = u32::MAX;
    for (idx, (_, reference)) in REFERENCE_COLORS.iter().enumerate() {
        let dist: u32 = rgb
            .iter()
            .zip(reference.iter())
            .map(|(&a, &b)| {
                let d = a as i32 - b as i32;
                (d * d) as u32
            })
            .sum();
        if dist < best_dist {
            best = idx;
            best_dist = dist;
        }
    }
    best
}

/// Votes every pixel to its nearest reference color.
pub struct NearestReferenceClassifier {
    diversity_threshold: usize,
    report_secondary: bool,
}

impl NearestReferenceClassifier {
    pub fn new(config: &ColorConfig) -> Self {
        Self {
            diversity_threshold: config.diversity_threshold,
            report_secondary: config.report_secondary,
        }
    }

    /// Label frequencies in reference-table order (zero counts omitted).
    pub fn tally(&self, grid: &PixelGrid) -> Vec<(ColorLabel, usize)> {
        let mut counts = [0usize; REFERENCE_COLORS.len()];
        for &rgb in grid.pixels() {
            counts[nearest_reference(rgb)] += 1;
        }
        REFERENCE_COLORS
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|((label, _), count)| (*label, count))
            .collect()
    }
}

impl ColorClassifier for NearestReferenceClassifier {
    fn name(&self) -> &str {
        "nearest_reference"
    }

    fn classify(&self, grid: &PixelGrid) -> Result<ColorAnalysis, AnalysisError> {
        grid.ensure_non_empty()?;

        let mut ranked = self.tally(grid);
        if ranked.len() > self.diversity_threshold {
            return Ok(ColorAnalysis::single(ColorLabel::Colorful));
        }

        // Stable sort keeps table order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let (top, _) = ranked[0];
        if top.is_achromatic() {
            return Ok(ColorAnalysis::single(ColorLabel::Monochrome));
        }

        let secondary = if self.report_secondary {
            ranked.get(1).map(|(label, _)| *label).into_iter().collect()
        } else {
            vec![]
        };
        Ok(ColorAnalysis {
            label: top,
            secondary,
        })
    }
}
