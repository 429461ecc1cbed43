use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat};
use reshape_core::OutputFormat;
use std::io::Cursor;

use crate::error::ImageError;

/// Encoders for the supported output formats
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode image with specified format and quality (1..=100). PNG ignores quality.
    pub fn compress(
        img: &DynamicImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Bytes, ImageError> {
        let quality = quality.clamp(1, 100);

        let data = match format {
            OutputFormat::Jpeg => Self::compress_jpeg(img, quality)?,
            OutputFormat::Png => Self::compress_png(img)?,
            OutputFormat::WebP => Self::compress_webp(img, quality)?,
        };

        tracing::debug!(
            format = format.name(),
            quality = quality,
            output_size = data.len(),
            "Encoded image"
        );

        Ok(data)
    }

    /// Compress to JPEG using mozjpeg
    pub fn compress_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes, ImageError> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp
            .start_compress(Vec::new())
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        comp.write_scanlines(&rgb_img)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        let jpeg_data = comp.finish().map_err(|e| ImageError::Encode(e.to_string()))?;

        Ok(Bytes::from(jpeg_data))
    }

    /// Compress a single-channel image to greyscale JPEG using mozjpeg
    pub fn compress_jpeg_gray(img: &DynamicImage, quality: u8) -> Result<Bytes, ImageError> {
        let luma_img = img.to_luma8();
        let (width, height) = luma_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_GRAYSCALE);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality.clamp(1, 100) as f32);
        comp.set_optimize_coding(true);

        let mut comp = comp
            .start_compress(Vec::new())
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        comp.write_scanlines(&luma_img)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        let jpeg_data = comp.finish().map_err(|e| ImageError::Encode(e.to_string()))?;

        Ok(Bytes::from(jpeg_data))
    }

    /// Compress to PNG
    fn compress_png(img: &DynamicImage) -> Result<Bytes, ImageError> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        img.write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| ImageError::Encode(e.to_string()))?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to lossy WebP. libwebp refuses sides above 16383 px.
    fn compress_webp(img: &DynamicImage, quality: u8) -> Result<Bytes, ImageError> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder
            .encode_simple(false, quality as f32)
            .map_err(|e| ImageError::Encode(format!("webp encoding failed: {:?}", e)))?;

        Ok(Bytes::copy_from_slice(&webp_data))
    }
}
