//! Shared data models for the scenelog backend.
//!
//! This crate provides Serde-serializable types for:
//! - Scene descriptions (environment, persons, vehicles)
//! - Persisted scene records with capture timestamps
//! - Coercion of raw describer output into well-formed scenes
//! - Recurrence aggregation over time-windowed record sets

pub mod coerce;
pub mod recurrence;
pub mod scene;
pub mod time;

// Re-export common types
pub use coerce::{coerce_scene, CoerceError};
pub use recurrence::{aggregate, sanitise_description, PersonKey, RecurrenceSummary, VehicleKey};
pub use scene::{Environment, Gender, Person, Scene, SceneRecord, Vehicle};
pub use time::{parse_utc_timestamp, today_start};
