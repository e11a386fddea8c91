//! SQLite-backed persistence for scene records.
//!
//! Exposes the narrow [`ScenePersistence`] contract consumed by the ingest
//! and query paths, and [`SceneStore`], its sqlx/SQLite implementation.

pub mod client;
pub mod error;

pub use client::{ScenePersistence, SceneStore};
pub use error::{StoreError, StoreResult};
