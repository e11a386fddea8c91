//! Axum HTTP server and scheduled scene-ingest pipeline.
//!
//! This crate wires the capture, describer, and store capabilities into:
//! - a periodic capture→describe→coerce→persist job with at-most-one
//!   concurrent execution
//! - a read-side query service exposed over a minimal HTTP surface

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod state;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{IngestError, IngestJob, QueryService, Scheduler};
pub use state::AppState;
