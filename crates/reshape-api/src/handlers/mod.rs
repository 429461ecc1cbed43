//! Request handlers

pub mod health;
pub mod image;
pub mod pdf;

use reshape_core::AppError;
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Run a CPU-bound engine call on the blocking pool.
///
/// A semaphore permit bounds concurrent jobs and travels into the blocking task, so it is
/// only released once the engine actually returns. The whole wait (permit plus work) is
/// bounded by the processing timeout; on timeout the request fails while the detached
/// task runs to completion.
pub(crate) async fn run_engine<T, E, F>(
    state: &Arc<AppState>,
    job: &'static str,
    f: F,
) -> Result<T, HttpAppError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<HttpAppError> + Send + 'static,
{
    let permits = state.job_permits.clone();
    let timeout = state.config.processing_timeout();

    let work = async move {
        let permit = permits
            .acquire_owned()
            .await
            .map_err(|_| AppError::Internal("job limiter closed".to_string()))?;
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            f()
        })
        .await
        .map_err(|e| AppError::Internal(format!("{} task failed: {}", job, e)))
    };

    match tokio::time::timeout(timeout, work).await {
        Ok(Ok(result)) => result.map_err(Into::into),
        Ok(Err(app_error)) => Err(app_error.into()),
        Err(_) => {
            tracing::error!(
                job = job,
                timeout_secs = timeout.as_secs(),
                "Processing timed out"
            );
            Err(AppError::ProcessingTimeout(timeout.as_secs()).into())
        }
    }
}
