//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Every failure renders as the uniform
//! [`ResponseEnvelope`]: `{message, statusCode, data}`. Validation failures list their
//! violations in `data`; processing failures only ever carry the generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reshape_core::{AppError, ErrorMetadata, LogLevel, ResponseEnvelope};
use reshape_processing::{ImageError, PdfError, ValidationError};

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from reshape-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let detail = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %detail, error_type = error_type, "Request rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %detail, error_type = error_type, "Request rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = %detail, error_type = error_type, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let mut envelope = ResponseEnvelope::new(app_error.client_message(), status.as_u16());
        if let Some(violations) = app_error.violations() {
            envelope = envelope.with_data(serde_json::json!(violations));
        }

        (status, Json(envelope)).into_response()
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app = match err {
            ValidationError::FileTooLarge { max, .. } => AppError::PayloadTooLarge(format!(
                "File size exceeds maximum allowed size of {} MB",
                max / 1024 / 1024
            )),
            ValidationError::InvalidContentType {
                content_type,
                allowed,
            } => AppError::UnsupportedMediaType(format!(
                "Invalid file type '{}'. Accepted types: {}",
                content_type,
                allowed.join(", ")
            )),
            ValidationError::EmptyFile => AppError::InvalidInput("File is empty".to_string()),
        };
        HttpAppError(app)
    }
}

impl From<ImageError> for HttpAppError {
    fn from(err: ImageError) -> Self {
        let app = match err {
            ImageError::UnsupportedFormat { .. } => AppError::UnsupportedMediaType(err.to_string()),
            ImageError::ResolutionTooLarge { .. } => AppError::InvalidInput(err.to_string()),
            ImageError::Decode(_) | ImageError::Encode(_) => AppError::Processing(err.to_string()),
        };
        HttpAppError(app)
    }
}

impl From<PdfError> for HttpAppError {
    fn from(err: PdfError) -> Self {
        let app = match err {
            PdfError::UnsupportedType { .. } => AppError::UnsupportedMediaType(err.to_string()),
            PdfError::ProcessingFailed(_) => AppError::Processing(err.to_string()),
        };
        HttpAppError(app)
    }
}
