//! Multipart upload extraction
//!
//! `ImageUpload` and `PdfUpload` read the whole multipart body before the handler runs:
//! exactly one `file` part (size-capped while streaming) plus every text part as a
//! string parameter. A `data` part holding a JSON object is merged into the parameters;
//! explicitly named parts win over keys inside `data`.

use axum::extract::{
    multipart::{Field, MultipartError, MultipartRejection},
    FromRequest, Multipart, Request,
};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use reshape_core::models::parse_raw;
use reshape_core::{AppError, UploadedFile};
use reshape_processing::{MediaValidator, ValidationError};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::constants::{DATA_FIELD, FILE_FIELD};
use crate::error::HttpAppError;
use crate::state::AppState;

pub const ONLY_IMAGES_MESSAGE: &str = "Only image files are allowed";
const IMAGE_MIME_PREFIX: &str = "image/";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const FALLBACK_FILENAME: &str = "file";

/// Parsed multipart form: the optional file and the raw parameters.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: Map<String, Value>,
}

/// Upload for `/process-image`; rejects non-`image/*` parts before reading them.
#[derive(Debug)]
pub struct ImageUpload(pub UploadForm);

/// Upload for `/process-pdf`; the engine checks the declared type.
#[derive(Debug)]
pub struct PdfUpload(pub UploadForm);

impl FromRequest<Arc<AppState>> for ImageUpload {
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(multipart_rejection)?;
        let form = read_upload_form(
            multipart,
            state.config.max_upload_size_bytes,
            Some(IMAGE_MIME_PREFIX),
        )
        .await?;
        Ok(ImageUpload(form))
    }
}

impl FromRequest<Arc<AppState>> for PdfUpload {
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(multipart_rejection)?;
        let form = read_upload_form(multipart, state.config.max_upload_size_bytes, None).await?;
        Ok(PdfUpload(form))
    }
}

/// Read every part of the form. Only one field named "file" is accepted; multiple file
/// fields are rejected.
pub async fn read_upload_form(
    mut multipart: Multipart,
    max_file_size: usize,
    required_mime_prefix: Option<&str>,
) -> Result<UploadForm, HttpAppError> {
    let validator = MediaValidator::new(max_file_size, Vec::new());
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == FILE_FIELD {
            if form.file.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                )
                .into());
            }

            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());
            if let Some(prefix) = required_mime_prefix {
                if !content_type.trim().to_lowercase().starts_with(prefix) {
                    tracing::warn!(content_type = %content_type, "Rejected non-image upload");
                    return Err(
                        AppError::UnsupportedMediaType(ONLY_IMAGES_MESSAGE.to_string()).into(),
                    );
                }
            }
            let filename = sanitize_filename(field.file_name().unwrap_or(FALLBACK_FILENAME));

            let data = read_capped(field, &validator).await?;
            validator.validate_file_size(data.len())?;

            tracing::debug!(
                filename = %filename,
                content_type = %content_type,
                size = data.len(),
                "Received upload"
            );
            form.file = Some(UploadedFile::new(data, content_type, filename));
        } else if field.file_name().is_some() {
            tracing::debug!(field = %field_name, "Ignoring unexpected file part");
        } else if !field_name.is_empty() {
            let text = field.text().await.map_err(multipart_error)?;
            form.fields.insert(field_name, Value::String(text));
        }
    }

    merge_data_field(&mut form.fields)?;
    Ok(form)
}

/// Stream a file part into memory, failing as soon as it passes the size cap.
async fn read_capped(
    mut field: Field<'_>,
    validator: &MediaValidator,
) -> Result<Bytes, HttpAppError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if let Err(err @ ValidationError::FileTooLarge { .. }) =
            validator.validate_file_size(buffer.len() + chunk.len())
        {
            return Err(err.into());
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

/// Merge the keys of a JSON `data` field into the parameter map.
pub fn merge_data_field(fields: &mut Map<String, Value>) -> Result<(), AppError> {
    let Some(Value::String(raw)) = fields.remove(DATA_FIELD) else {
        return Ok(());
    };
    if raw.trim().is_empty() {
        return Ok(());
    }

    for (key, value) in parse_raw(&raw)? {
        fields.entry(key).or_insert(value);
    }
    Ok(())
}

fn multipart_error(err: MultipartError) -> HttpAppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(
            "Request body exceeds the maximum allowed upload size".to_string(),
        )
        .into()
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text())).into()
    }
}

fn multipart_rejection(rejection: MultipartRejection) -> HttpAppError {
    AppError::InvalidInput(format!(
        "Expected a multipart/form-data request: {}",
        rejection.body_text()
    ))
    .into()
}

/// Sanitize filename to prevent path traversal and header injection. Directory parts
/// are dropped and anything outside `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX_FILENAME_LENGTH: usize = 255;

    let filename_only = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.');

    if sanitized.trim().is_empty() || sanitized.len() < 3 {
        return FALLBACK_FILENAME.to_string();
    }
    sanitized.to_string()
}
