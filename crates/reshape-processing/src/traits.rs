//! Core traits for media engines
//!
//! Handlers depend on these traits rather than on concrete engines so the HTTP layer
//! can be exercised with instrumented engines in tests.

use bytes::Bytes;
use reshape_core::{
    ImageMetadataResult, ImageTransformRequest, PdfCompressionRequest, PdfMetadataResult,
    UploadedFile,
};

use crate::error::{ImageError, PdfError};

/// Transformed image bytes plus a description of the result
#[derive(Debug, Clone)]
pub struct ImageOutput {
    pub metadata: ImageMetadataResult,
    pub bytes: Bytes,
}

/// Compressed PDF bytes plus before/after metrics
#[derive(Debug, Clone)]
pub struct PdfOutput {
    pub metadata: PdfMetadataResult,
    pub bytes: Bytes,
}

/// Image transformation capability
pub trait ImageEngine: Send + Sync {
    fn transform(
        &self,
        file: &UploadedFile,
        request: &ImageTransformRequest,
    ) -> Result<ImageOutput, ImageError>;
}

/// PDF compression capability
pub trait PdfEngine: Send + Sync {
    fn compress(
        &self,
        file: &UploadedFile,
        request: &PdfCompressionRequest,
    ) -> Result<PdfOutput, PdfError>;
}
