use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, Uri},
    routing::{get, post},
    Router,
};
use reshape_core::{AppError, Config};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::constants::{
    API_PREFIX, FILE_METADATA_HEADER, MULTIPART_OVERHEAD_BYTES, PDF_METADATA_HEADER,
};
use crate::error::HttpAppError;
use crate::handlers;
use crate::middleware::security_headers_middleware;
use crate::state::AppState;

/// Build the router with every route and layer. Tests call this with their own state.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/process-image", post(handlers::image::process_image))
        .route("/process-pdf", post(handlers::pdf::process_pdf));

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        max_upload_size_bytes = config.max_upload_size_bytes,
        max_concurrent_jobs = config.max_concurrent_jobs,
        "HTTP layers configured"
    );

    let app = Router::new()
        .nest(API_PREFIX, api_routes)
        .fallback(not_found)
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(DefaultBodyLimit::max(
            config.max_upload_size_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(state);

    Ok(app)
}

async fn not_found(uri: Uri) -> HttpAppError {
    HttpAppError(AppError::NotFound(format!("Route {} not found", uri.path())))
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    // Browsers only expose these to scripts when listed explicitly
    let exposed = [
        HeaderName::from_static(FILE_METADATA_HEADER),
        HeaderName::from_static(PDF_METADATA_HEADER),
        axum::http::header::CONTENT_DISPOSITION,
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new().allow_origin(origins)
    };

    Ok(cors
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers(exposed))
}
