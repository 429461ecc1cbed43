//! Application state shared by all handlers.

use reshape_core::{Config, RequestLimits};
use reshape_processing::{ImageEngine, ImageTransformer, PdfCompressor, PdfEngine};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub struct AppState {
    pub config: Config,
    pub image_engine: Arc<dyn ImageEngine>,
    pub pdf_engine: Arc<dyn PdfEngine>,
    /// Bounds how many engine jobs occupy the blocking pool at once
    pub job_permits: Arc<Semaphore>,
}

impl AppState {
    /// State with the production engines.
    pub fn new(config: Config) -> Self {
        let limits = RequestLimits {
            max_dimension: config.max_output_dimension,
        };
        Self::with_engines(
            config,
            Arc::new(ImageTransformer::with_limits(limits)),
            Arc::new(PdfCompressor::new()),
        )
    }

    pub fn with_engines(
        config: Config,
        image_engine: Arc<dyn ImageEngine>,
        pdf_engine: Arc<dyn PdfEngine>,
    ) -> Self {
        let job_permits = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        Self {
            config,
            image_engine,
            pdf_engine,
            job_permits,
        }
    }

    pub fn request_limits(&self) -> RequestLimits {
        RequestLimits {
            max_dimension: self.config.max_output_dimension,
        }
    }
}
