//! PDF compressor - lossless stream compression with optional image re-encoding
//!
//! Levels are cumulative:
//! - `low`: Flate-compress every stream that has no filter yet
//! - `medium`: also drop zero-length streams, prune unreferenced objects, renumber
//! - `high`: also re-encode DCT (JPEG) image XObjects, keeping the smaller stream

use bytes::Bytes;
use lopdf::{Dictionary, Document, Object};
use reshape_core::{CompressionLevel, PdfCompressionRequest, PdfMetadataResult, UploadedFile};
use std::io::Cursor;
use std::path::Path;

use crate::compression::ImageCompressor;
use crate::error::{ImageError, PdfError};
use crate::traits::{PdfEngine, PdfOutput};
use crate::validator::MediaValidator;

pub const SUPPORTED_DOCUMENT_TYPES: &[&str] = &["application/pdf"];

/// JPEG quality for re-encoded images when the request does not carry one
pub const DEFAULT_PDF_IMAGE_QUALITY: u8 = 60;

/// Colour layout of a DCT image that can be safely re-encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DctColorSpace {
    Rgb,
    Gray,
}

/// PDF engine backed by lopdf
pub struct PdfCompressor {
    validator: MediaValidator,
}

impl Default for PdfCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCompressor {
    pub fn new() -> Self {
        Self {
            validator: MediaValidator::for_content_types(SUPPORTED_DOCUMENT_TYPES),
        }
    }

    fn compress_document(
        &self,
        data: &[u8],
        level: CompressionLevel,
        image_quality: u8,
    ) -> Result<Vec<u8>, PdfError> {
        let mut doc = Document::load_mem(data)
            .map_err(|e| PdfError::ProcessingFailed(format!("failed to parse PDF: {}", e)))?;

        if matches!(level, CompressionLevel::Medium | CompressionLevel::High) {
            let pruned = doc.prune_objects();
            let empty_streams = doc.delete_zero_length_streams();
            doc.renumber_objects();

            tracing::debug!(
                pruned_objects = pruned.len(),
                empty_streams = empty_streams.len(),
                "Removed unused PDF objects"
            );
        }

        if level == CompressionLevel::High {
            let reencoded = recompress_dct_images(&mut doc, image_quality);
            tracing::debug!(
                reencoded_images = reencoded,
                quality = image_quality,
                "Re-encoded embedded JPEG images"
            );
        }

        doc.compress();

        let mut output = Cursor::new(Vec::new());
        doc.save_to(&mut output)
            .map_err(|e| PdfError::ProcessingFailed(format!("failed to save PDF: {}", e)))?;

        Ok(output.into_inner())
    }
}

impl PdfEngine for PdfCompressor {
    fn compress(
        &self,
        file: &UploadedFile,
        request: &PdfCompressionRequest,
    ) -> Result<PdfOutput, PdfError> {
        self.validator
            .validate_content_type(&file.content_type)
            .map_err(|_| PdfError::UnsupportedType {
                content_type: file.content_type.clone(),
                accepted: self.validator.allowed_content_types().to_vec(),
            })?;

        let level = request.compression_level();
        let quality = request.image_quality(DEFAULT_PDF_IMAGE_QUALITY);
        let compressed = self.compress_document(&file.data, level, quality)?;

        let metadata = PdfMetadataResult::compute(
            file_stem(&file.original_filename),
            file.len(),
            compressed.len(),
        );

        tracing::info!(
            level = level.as_str(),
            original_size = file.len(),
            compressed_size = compressed.len(),
            ratio = %metadata.compression_ratio,
            "PDF compressed"
        );

        Ok(PdfOutput {
            metadata,
            bytes: Bytes::from(compressed),
        })
    }
}

/// Filename without directories or extension; `document` when nothing is left.
pub fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("document")
        .to_string()
}

fn recompress_dct_images(doc: &mut Document, quality: u8) -> usize {
    let mut replaced = 0;

    for (id, object) in doc.objects.iter_mut() {
        let Object::Stream(stream) = object else {
            continue;
        };
        let Some(color_space) = dct_color_space(&stream.dict) else {
            continue;
        };

        match reencode_jpeg(&stream.content, color_space, quality) {
            Ok(Some(smaller)) => {
                stream.set_content(smaller);
                replaced += 1;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(
                    object_id = ?id,
                    error = %e,
                    "Skipping image that could not be re-encoded"
                )
            }
        }
    }

    replaced
}

/// Colour space of an 8-bit DCT image XObject that decodes without a /Decode remap
fn dct_color_space(dict: &Dictionary) -> Option<DctColorSpace> {
    if !matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Image") {
        return None;
    }

    let is_dct = match dict.get(b"Filter") {
        Ok(Object::Name(name)) => name == b"DCTDecode",
        Ok(Object::Array(filters)) => {
            filters.len() == 1 && matches!(&filters[0], Object::Name(name) if name == b"DCTDecode")
        }
        _ => false,
    };
    if !is_dct || dict.get(b"Decode").is_ok() || dict.get(b"SMaskInData").is_ok() {
        return None;
    }

    if !matches!(dict.get(b"BitsPerComponent"), Ok(Object::Integer(8))) {
        return None;
    }

    match dict.get(b"ColorSpace") {
        Ok(Object::Name(name)) if name == b"DeviceRGB" => Some(DctColorSpace::Rgb),
        Ok(Object::Name(name)) if name == b"DeviceGray" => Some(DctColorSpace::Gray),
        _ => None,
    }
}

fn reencode_jpeg(
    data: &[u8],
    color_space: DctColorSpace,
    quality: u8,
) -> Result<Option<Vec<u8>>, ImageError> {
    let img = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    let encoded = match color_space {
        DctColorSpace::Rgb => ImageCompressor::compress_jpeg(&img, quality)?,
        DctColorSpace::Gray => ImageCompressor::compress_jpeg_gray(&img, quality)?,
    };

    if encoded.len() < data.len() {
        Ok(Some(encoded.to_vec()))
    } else {
        Ok(None)
    }
}
