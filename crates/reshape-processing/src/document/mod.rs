//! Document processing module
//!
//! PDF compression via lopdf (compressor).

pub mod compressor;

pub use compressor::{
    file_stem, PdfCompressor, DEFAULT_PDF_IMAGE_QUALITY, SUPPORTED_DOCUMENT_TYPES,
};
