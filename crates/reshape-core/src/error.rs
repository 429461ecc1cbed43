//! Error types module
//!
//! All failures surfaced to HTTP clients are unified under [`AppError`]. Each variant
//! describes its own presentation through [`ErrorMetadata`]: status code, machine code,
//! client-facing message and the level it is logged at.
//!
//! Input errors map to 400. Processing errors map to 500 and never expose their
//! internal message to clients.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors like validation failures
    Debug,
    /// Client mistakes worth noticing (rejected uploads)
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "VALIDATION_FAILED")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether the internal message must stay server-side
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Message returned to clients for every processing failure.
pub const PROCESSING_FAILED_MESSAGE: &str = "Error while processing the request.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Processing failed: {0}")]
    Processing(String),

    #[error("Processing timed out after {0} seconds")]
    ProcessingTimeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("Invalid JSON payload: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::Validation(_) => (400, "VALIDATION_FAILED", false, LogLevel::Debug),
        AppError::UnsupportedMediaType(_) => {
            (400, "UNSUPPORTED_MEDIA_TYPE", false, LogLevel::Warn)
        }
        // Oversized uploads share the 400 path with a missing file.
        AppError::PayloadTooLarge(_) => (400, "PAYLOAD_TOO_LARGE", false, LogLevel::Warn),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Processing(_) => (500, "PROCESSING_FAILED", true, LogLevel::Error),
        AppError::ProcessingTimeout(_) => (500, "PROCESSING_TIMEOUT", true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Validation(_) => "Validation",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::NotFound(_) => "NotFound",
            AppError::Processing(_) => "Processing",
            AppError::ProcessingTimeout(_) => "ProcessingTimeout",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Full message for server-side logs, never sent to clients.
    pub fn detailed_message(&self) -> String {
        self.to_string()
    }

    /// Violation messages carried by a validation failure.
    pub fn violations(&self) -> Option<&[String]> {
        match self {
            AppError::Validation(violations) => Some(violations),
            _ => None,
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Validation(_) => self.to_string(),
            AppError::UnsupportedMediaType(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Processing(_)
            | AppError::ProcessingTimeout(_)
            | AppError::Internal(_) => PROCESSING_FAILED_MESSAGE.to_string(),
        }
    }
}
