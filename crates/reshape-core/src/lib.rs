//! Reshape core
//!
//! Shared configuration, error taxonomy and request/response models used by the
//! processing engines and the HTTP API.

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    CompressionLevel, ImageMetadataResult, ImageTransformRequest, OutputFormat,
    PdfCompressionRequest, PdfMetadataResult, RequestLimits, RequestedFormat, ResponseEnvelope,
    UploadedFile,
};
