//! Pixel sampler: shrinks a decoded image to the fixed analysis grid.
//!
//! Every later stage works on a `PixelGrid` of constant size, so analysis cost
//! does not depend on the source resolution.

use image::{imageops, DynamicImage, GenericImageView, GrayImage, RgbImage};

use crate::config::SamplingConfig;
use crate::error::AnalysisError;

/// Fixed-size grid of RGB triples in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl PixelGrid {
    /// Build a grid from raw pixels.
    ///
    /// Fails if `pixels.len() != width * height`. A zero-sized grid is
    /// constructible; the analyzers reject it.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Result<Self, AnalysisError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(AnalysisError::InvalidInput(format!(
                "expected {expected} pixels for a {width}x{height} grid, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A grid where every cell holds the same color.
    pub fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgb; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Error out on a grid with no pixels.
    pub(crate) fn ensure_non_empty(&self) -> Result<(), AnalysisError> {
        if self.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "pixel grid has zero pixels".to_string(),
            ));
        }
        Ok(())
    }

    /// Rec.601 luma view of the grid.
    pub fn to_luma(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            let [r, g, b] = self.pixels[(y * self.width + x) as usize];
            let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
            image::Luma([luma.round().clamp(0.0, 255.0) as u8])
        })
    }
}

impl From<RgbImage> for PixelGrid {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|p| p.0).collect();
        Self {
            width,
            height,
            pixels,
        }
    }
}

/// Downsamples images to the configured grid.
pub struct PixelSampler {
    config: SamplingConfig,
}

impl PixelSampler {
    pub fn new(config: SamplingConfig) -> Self {
        Self { config }
    }

    /// Produce a `grid_size` x `grid_size` grid.
    ///
    /// Grayscale, 16-bit and alpha images are normalized to 8-bit RGB first
    /// (alpha is dropped). Aspect ratio is not preserved.
    pub fn sample(&self, image: &DynamicImage) -> Result<PixelGrid, AnalysisError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "image has zero dimension ({width}x{height})"
            )));
        }

        let rgb = image.to_rgb8();
        let size = self.config.grid_size;
        let resized = if (width, height) == (size, size) {
            rgb
        } else {
            imageops::resize(&rgb, size, size, self.config.filter.into())
        };
        Ok(PixelGrid::from(resized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResampleFilter;
    use image::{GrayImage, Luma, Rgba, RgbaImage};

    fn sampler(size: u32) -> PixelSampler {
        PixelSampler::new(SamplingConfig {
            grid_size: size,
            filter: ResampleFilter::Triangle,
        })
    }

    #[test]
    fn test_grid_size_independent_of_source() {
        let s = sampler(100);
        for (w, h) in [(1920, 1080), (37, 512), (100, 100), (3, 3)] {
            let img = DynamicImage::new_rgb8(w, h);
            let grid = s.sample(&img).unwrap();
            assert_eq!((grid.width(), grid.height()), (100, 100));
            assert_eq!(grid.len(), 10_000);
        }
    }

    #[test]
    fn test_uniform_image_stays_uniform() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, image::Rgb([20, 60, 200])));
        let grid = sampler(80).sample(&img).unwrap();
        assert!(grid.pixels().iter().all(|p| *p == [20, 60, 200]));
    }

    #[test]
    fn test_grayscale_normalized_to_rgb() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(50, 50, Luma([128])));
        let grid = sampler(10).sample(&img).unwrap();
        assert!(grid.pixels().iter().all(|p| *p == [128, 128, 128]));
    }

    #[test]
    fn test_alpha_dropped() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 40, Rgba([255, 0, 0, 0])));
        let grid = sampler(10).sample(&img).unwrap();
        assert!(grid.pixels().iter().all(|p| *p == [255, 0, 0]));
    }

    #[test]
    fn test_zero_dimension_is_invalid_input() {
        let img = DynamicImage::new_rgb8(0, 10);
        let err = sampler(10).sample(&img).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(PixelGrid::from_pixels(2, 2, vec![[0, 0, 0]; 3]).is_err());
        let empty = PixelGrid::from_pixels(0, 0, vec![]).unwrap();
        assert!(empty.is_empty());
        assert!(empty.ensure_non_empty().is_err());
    }

    #[test]
    fn test_luma_weights() {
        let grid = PixelGrid::uniform(2, 2, [255, 255, 255]);
        assert!(grid.to_luma().pixels().all(|p| p.0[0] == 255));
        let grid = PixelGrid::uniform(1, 1, [0, 255, 0]);
        assert_eq!(grid.to_luma().get_pixel(0, 0).0[0], 150);
    }
}
