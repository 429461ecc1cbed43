//! Image transformer - orchestrates one image transformation
//!
//! Pipeline: content-type check, pixel-count guard, decode, rotate, resize, encode.
//! Rotation runs first, so requested dimensions always describe the final image.

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use reshape_core::models::DEFAULT_QUALITY;
use reshape_core::{
    ImageMetadataResult, ImageTransformRequest, OutputFormat, RequestLimits, RequestedFormat,
    UploadedFile,
};
use std::io::Cursor;

use crate::compression::ImageCompressor;
use crate::error::ImageError;
use crate::image::orientation::ImageOrientation;
use crate::image::resize::{ImageResize, ResizeDimensions};
use crate::traits::{ImageEngine, ImageOutput};
use crate::validator::MediaValidator;

/// Declared MIME types the engine accepts
pub const SUPPORTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Largest image (width x height) the engine will decode or produce
pub const MAX_SOURCE_PIXELS: u64 = 50_000_000;

/// How the final image is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeTarget {
    /// Encode to a known format at the effective quality
    Format(OutputFormat),
    /// Requested format has no encoder: return the source untouched when no pixel
    /// operation ran, otherwise re-encode in the source container
    Passthrough,
}

impl EncodeTarget {
    /// Requested format first, then the detected source format, then jpeg.
    pub fn resolve(requested: Option<&RequestedFormat>, source: Option<OutputFormat>) -> Self {
        match requested {
            Some(RequestedFormat::Known(format)) => EncodeTarget::Format(*format),
            Some(RequestedFormat::Unrecognized(_)) => EncodeTarget::Passthrough,
            None => EncodeTarget::Format(source.unwrap_or(OutputFormat::Jpeg)),
        }
    }
}

/// Image engine backed by the `image`, `imageproc`, `mozjpeg` and `webp` crates
pub struct ImageTransformer {
    validator: MediaValidator,
    limits: RequestLimits,
}

impl Default for ImageTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageTransformer {
    pub fn new() -> Self {
        Self::with_limits(RequestLimits::default())
    }

    /// Engine whose resize output, including the side derived from the aspect ratio,
    /// stays within `limits.max_dimension`.
    pub fn with_limits(limits: RequestLimits) -> Self {
        Self {
            validator: MediaValidator::for_content_types(SUPPORTED_IMAGE_TYPES),
            limits,
        }
    }

    fn check_pixel_budget(width: u32, height: u32) -> Result<(), ImageError> {
        if width as u64 * height as u64 > MAX_SOURCE_PIXELS {
            return Err(ImageError::ResolutionTooLarge { width, height });
        }
        Ok(())
    }

    fn check_resize_target(&self, width: u32, height: u32) -> Result<(), ImageError> {
        if width > self.limits.max_dimension || height > self.limits.max_dimension {
            return Err(ImageError::ResolutionTooLarge { width, height });
        }
        Self::check_pixel_budget(width, height)
    }

    fn decode(data: &[u8]) -> Result<(DynamicImage, Option<ImageFormat>), ImageError> {
        let (width, height) = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ImageError::Decode(e.to_string()))?
            .into_dimensions()
            .map_err(|e| ImageError::Decode(e.to_string()))?;

        Self::check_pixel_budget(width, height)?;

        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ImageError::Decode(e.to_string()))?;
        let format = reader.format();
        let img = reader
            .decode()
            .map_err(|e| ImageError::Decode(e.to_string()))?;

        Ok((img, format))
    }

    fn output_format_for(format: ImageFormat) -> Option<OutputFormat> {
        match format {
            ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
            ImageFormat::Png => Some(OutputFormat::Png),
            ImageFormat::WebP => Some(OutputFormat::WebP),
            _ => None,
        }
    }
}

impl ImageEngine for ImageTransformer {
    fn transform(
        &self,
        file: &UploadedFile,
        request: &ImageTransformRequest,
    ) -> Result<ImageOutput, ImageError> {
        self.validator
            .validate_content_type(&file.content_type)
            .map_err(|_| ImageError::UnsupportedFormat {
                content_type: file.content_type.clone(),
                supported: self.validator.allowed_content_types().to_vec(),
            })?;

        let (mut img, detected) = Self::decode(&file.data)?;
        let source_format = detected.and_then(Self::output_format_for);
        let mut modified = false;

        if let Some(degrees) = request.effective_rotation() {
            let (width, height) = img.dimensions();
            let (rotated_width, rotated_height) =
                ImageOrientation::output_dimensions(width, height, degrees);
            Self::check_pixel_budget(rotated_width, rotated_height)?;
            img = ImageOrientation::rotate(img, degrees);
            modified = true;
        }

        if let Some(dimensions) =
            ResizeDimensions::new(request.required_width, request.required_height)
        {
            let (width, height) = img.dimensions();
            let (target_width, target_height) =
                ImageResize::calculate_dimensions(width, height, dimensions);
            self.check_resize_target(target_width, target_height)?;
            img = ImageResize::resize(&img, dimensions);
            modified = true;
        }

        let target = EncodeTarget::resolve(request.required_format.as_ref(), source_format);
        let bytes: Bytes = match target {
            EncodeTarget::Format(format) => {
                ImageCompressor::compress(&img, format, request.effective_quality())?
            }
            EncodeTarget::Passthrough if !modified => file.data.clone(),
            EncodeTarget::Passthrough => ImageCompressor::compress(
                &img,
                source_format.unwrap_or(OutputFormat::Jpeg),
                DEFAULT_QUALITY,
            )?,
        };

        let (measured_width, measured_height) = img.dimensions();
        let format = match (&request.required_format, target) {
            (Some(requested), _) => requested.name().to_string(),
            (None, EncodeTarget::Format(format)) => format.name().to_string(),
            (None, EncodeTarget::Passthrough) => source_format
                .unwrap_or(OutputFormat::Jpeg)
                .name()
                .to_string(),
        };

        let metadata = ImageMetadataResult {
            width: request.required_width.unwrap_or(measured_width),
            height: request.required_height.unwrap_or(measured_height),
            format,
            size_bytes: bytes.len(),
        };

        tracing::debug!(
            width = metadata.width,
            height = metadata.height,
            format = %metadata.format,
            input_size = file.len(),
            output_size = metadata.size_bytes,
            "Image transformed"
        );

        Ok(ImageOutput { metadata, bytes })
    }
}
