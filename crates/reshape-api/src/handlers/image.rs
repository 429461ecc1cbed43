//! Image transformation handler

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use reshape_core::models::{extension_for_format, mime_for_format};
use reshape_core::{AppError, ImageTransformRequest};
use std::sync::Arc;

use super::run_engine;
use crate::constants::{FILE_METADATA_HEADER, PROCESSED_IMAGE_BASENAME};
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::ImageUpload;

pub const MISSING_IMAGE_MESSAGE: &str = "Please provide valid image for processing";

/// Transform one uploaded image and stream the result back as a download.
pub async fn process_image(
    State(state): State<Arc<AppState>>,
    ImageUpload(form): ImageUpload,
) -> Result<Response, HttpAppError> {
    let file = form
        .file
        .ok_or_else(|| AppError::InvalidInput(MISSING_IMAGE_MESSAGE.to_string()))?;
    let request = ImageTransformRequest::from_fields(&form.fields, &state.request_limits())?;

    tracing::info!(
        filename = %file.original_filename,
        content_type = %file.content_type,
        size = file.len(),
        width = ?request.required_width,
        height = ?request.required_height,
        format = ?request.required_format.as_ref().map(|f| f.name().to_string()),
        "Processing image"
    );

    let engine = state.image_engine.clone();
    let output = run_engine(&state, "image", move || engine.transform(&file, &request)).await?;

    let format = output.metadata.format.as_str();
    let metadata_json = output
        .metadata
        .to_header_json()
        .map_err(|e| AppError::Internal(format!("Failed to serialize image metadata: {}", e)))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_for_format(format))
        .header(FILE_METADATA_HEADER, metadata_json)
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}.{}\"",
                PROCESSED_IMAGE_BASENAME,
                extension_for_format(format)
            ),
        )
        .header(header::CONTENT_LENGTH, output.bytes.len())
        .body(Body::from(output.bytes))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError(AppError::Internal(format!("Failed to build response: {}", e)))
        })
}
