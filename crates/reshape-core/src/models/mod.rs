//! Request, result and envelope models shared by the engines and the API.

pub mod envelope;
pub mod format;
pub mod metadata;
pub mod request;
pub mod upload;

pub use envelope::ResponseEnvelope;
pub use format::{extension_for_format, mime_for_format, OutputFormat};
pub use metadata::{ImageMetadataResult, PdfMetadataResult};
pub use request::{
    parse_raw, CompressionLevel, ImageTransformRequest, PdfCompressionRequest, RequestLimits,
    RequestedFormat, DEFAULT_QUALITY,
};
pub use upload::UploadedFile;
