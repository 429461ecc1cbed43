//! Test helpers: build AppState and router for integration tests.
//!
//! Engines are wrapped in counters so tests can assert whether a request ever reached
//! the engine.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use reshape_api::constants;
use reshape_api::setup::routes;
use reshape_api::state::AppState;
use reshape_core::{ImageTransformRequest, PdfCompressionRequest, UploadedFile};
use reshape_core::Config;
use reshape_processing::{
    ImageEngine, ImageError, ImageOutput, ImageTransformer, PdfCompressor, PdfEngine, PdfError,
    PdfOutput,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// API path prefix for tests (e.g. `/api/v1/health`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Image engine that counts calls and delegates to the real transformer.
#[derive(Default)]
pub struct CountingImageEngine {
    inner: ImageTransformer,
    calls: AtomicUsize,
}

impl CountingImageEngine {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageEngine for CountingImageEngine {
    fn transform(
        &self,
        file: &UploadedFile,
        request: &ImageTransformRequest,
    ) -> Result<ImageOutput, ImageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.transform(file, request)
    }
}

/// PDF engine that counts calls and delegates to the real compressor.
#[derive(Default)]
pub struct CountingPdfEngine {
    inner: PdfCompressor,
    calls: AtomicUsize,
}

impl CountingPdfEngine {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PdfEngine for CountingPdfEngine {
    fn compress(
        &self,
        file: &UploadedFile,
        request: &PdfCompressionRequest,
    ) -> Result<PdfOutput, PdfError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.compress(file, request)
    }
}

/// Image engine that blocks longer than any test timeout.
pub struct SlowImageEngine(pub Duration);

impl ImageEngine for SlowImageEngine {
    fn transform(
        &self,
        _file: &UploadedFile,
        _request: &ImageTransformRequest,
    ) -> Result<ImageOutput, ImageError> {
        std::thread::sleep(self.0);
        Err(ImageError::Encode("too late".to_string()))
    }
}

/// PDF engine that always fails with an internal detail that must not reach clients.
pub struct FailingPdfEngine;

pub const FAILING_PDF_DETAIL: &str = "xref offset 4711 points past end of file";

impl PdfEngine for FailingPdfEngine {
    fn compress(
        &self,
        _file: &UploadedFile,
        _request: &PdfCompressionRequest,
    ) -> Result<PdfOutput, PdfError> {
        Err(PdfError::ProcessingFailed(FAILING_PDF_DETAIL.to_string()))
    }
}

/// Test application: server plus handles on the counting engines.
pub struct TestApp {
    pub server: TestServer,
    pub image_engine: Arc<CountingImageEngine>,
    pub pdf_engine: Arc<CountingPdfEngine>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn image_engine_calls(&self) -> usize {
        self.image_engine.calls()
    }

    pub fn pdf_engine_calls(&self) -> usize {
        self.pdf_engine.calls()
    }
}

pub fn test_config() -> Config {
    Config {
        max_concurrent_jobs: 2,
        ..Config::default()
    }
}

/// Setup test app with default limits and counting engines.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with_config(test_config())
}

pub fn setup_test_app_with_config(config: Config) -> TestApp {
    let image_engine = Arc::new(CountingImageEngine::default());
    let pdf_engine = Arc::new(CountingPdfEngine::default());
    let state = Arc::new(AppState::with_engines(
        config.clone(),
        image_engine.clone(),
        pdf_engine.clone(),
    ));

    TestApp {
        server: build_server(&config, state),
        image_engine,
        pdf_engine,
    }
}

/// Server around arbitrary engines, for failure-path tests.
pub fn setup_server_with_engines(
    config: Config,
    image_engine: Arc<dyn ImageEngine>,
    pdf_engine: Arc<dyn PdfEngine>,
) -> TestServer {
    let state = Arc::new(AppState::with_engines(config.clone(), image_engine, pdf_engine));
    build_server(&config, state)
}

fn build_server(config: &Config, state: Arc<AppState>) -> TestServer {
    let app = routes::setup_routes(config, state).expect("Failed to build routes");
    TestServer::new(app).expect("Failed to create test server")
}
