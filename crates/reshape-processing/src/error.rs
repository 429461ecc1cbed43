/// Image engine failures
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Unsupported file format: {content_type} (supported: {})", .supported.join(", "))]
    UnsupportedFormat {
        content_type: String,
        supported: Vec<String>,
    },

    #[error("image resolution exceeds maximum ({width}x{height})")]
    ResolutionTooLarge { width: u32, height: u32 },

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),
}

/// PDF engine failures
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Invalid file type '{content_type}'. Accepted types: {}", .accepted.join(", "))]
    UnsupportedType {
        content_type: String,
        accepted: Vec<String>,
    },

    #[error("PDF processing failed: {0}")]
    ProcessingFailed(String),
}
