//! Reshape API Library
//!
//! HTTP handlers, upload extraction, middleware and application setup for the image and
//! PDF transformation service.

pub mod constants;
pub mod error;
mod handlers;
mod middleware;
pub mod setup;
pub mod state;
mod telemetry;
pub mod utils;

pub use error::HttpAppError;
pub use state::AppState;
