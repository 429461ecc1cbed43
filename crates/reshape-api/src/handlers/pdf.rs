//! PDF compression handler

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use reshape_core::{AppError, PdfCompressionRequest};
use reshape_processing::document::file_stem;
use std::sync::Arc;

use super::run_engine;
use crate::constants::PDF_METADATA_HEADER;
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::PdfUpload;

pub const MISSING_PDF_MESSAGE: &str = "Please provide a valid PDF file for processing";

/// Compress one uploaded PDF and stream the result back as a download.
pub async fn process_pdf(
    State(state): State<Arc<AppState>>,
    PdfUpload(form): PdfUpload,
) -> Result<Response, HttpAppError> {
    let file = form
        .file
        .ok_or_else(|| AppError::InvalidInput(MISSING_PDF_MESSAGE.to_string()))?;
    let request = PdfCompressionRequest::from_fields(&form.fields)?;

    tracing::info!(
        filename = %file.original_filename,
        size = file.len(),
        level = request.compression_level().as_str(),
        "Compressing PDF"
    );

    let download_name = format!("{}.pdf", file_stem(&file.original_filename));
    let engine = state.pdf_engine.clone();
    let output = run_engine(&state, "pdf", move || engine.compress(&file, &request)).await?;

    let metadata_json = output
        .metadata
        .to_header_json()
        .map_err(|e| AppError::Internal(format!("Failed to serialize PDF metadata: {}", e)))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(PDF_METADATA_HEADER, metadata_json)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download_name),
        )
        .header(header::CONTENT_LENGTH, output.bytes.len())
        .body(Body::from(output.bytes))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError(AppError::Internal(format!("Failed to build response: {}", e)))
        })
}
