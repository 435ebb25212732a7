//! Downscaled JPEG previews for the vision-model descriptor call.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use crate::error::DescriptorError;
use crate::llm::ImageInput;

/// Produces the preview image sent to external descriptor sources.
pub struct PreviewEncoder {
    max_edge: u32,
}

impl PreviewEncoder {
    pub fn new(max_edge: u32) -> Self {
        Self { max_edge }
    }

    /// Resize so the longest edge is at most `max_edge` (aspect ratio kept)
    /// and encode as JPEG.
    pub fn encode_bytes(&self, image: &DynamicImage) -> Result<Vec<u8>, DescriptorError> {
        let preview = if image.width() > self.max_edge || image.height() > self.max_edge {
            image.thumbnail(self.max_edge, self.max_edge)
        } else {
            image.clone()
        };

        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgb8(preview.to_rgb8());
        let mut buffer = Cursor::new(Vec::new());
        rgb.write_to(&mut buffer, ImageFormat::Jpeg)
            .map_err(|e| DescriptorError::Malformed(format!("preview encoding failed: {e}")))?;
        Ok(buffer.into_inner())
    }

    /// Encode and wrap as a base64 `ImageInput`.
    pub fn encode(&self, image: &DynamicImage) -> Result<ImageInput, DescriptorError> {
        Ok(ImageInput::from_bytes(&self.encode_bytes(image)?, "jpeg"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_is_jpeg_within_bounds() {
        let encoder = PreviewEncoder::new(128);
        let bytes = encoder.encode_bytes(&DynamicImage::new_rgb8(1000, 500)).unwrap();
        assert_eq!(&bytes[0..3], &[0xFF, 0xD8, 0xFF]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 128);
        assert!(decoded.height() <= 64);
    }

    #[test]
    fn test_small_image_not_upscaled() {
        let encoder = PreviewEncoder::new(512);
        let bytes = encoder.encode_bytes(&DynamicImage::new_rgba8(40, 30)).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn test_encode_wraps_as_jpeg_input() {
        let input = PreviewEncoder::new(64).encode(&DynamicImage::new_rgb8(100, 100)).unwrap();
        assert_eq!(input.media_type, "image/jpeg");
        assert!(!input.data.is_empty());
    }
}
