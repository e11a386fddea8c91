//! Application configuration.

use std::time::Duration;

use scenelog_describer::DEFAULT_MODEL;
use scenelog_store::SceneStore;

/// Process-wide configuration, loaded once at startup and passed down
/// explicitly. Nothing re-reads the environment at runtime.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// SQLite database path (`:memory:` for a transient store)
    pub db_path: String,
    /// Collection (table) holding this camera's records
    pub collection: String,
    /// Capture device path
    pub device: String,
    /// Interval between ingest ticks
    pub tick_interval: Duration,
    /// Default recurrence threshold for the query endpoint
    pub recurrence_threshold: u64,
    /// Gemini API credential
    pub gemini_api_key: String,
    /// Describer model name
    pub model: String,
    /// Whether the ingest scheduler runs (off = query-only server)
    pub ingest_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            db_path: "scenelog.db".to_string(),
            collection: SceneStore::DEFAULT_COLLECTION.to_string(),
            device: "/dev/video0".to_string(),
            tick_interval: Duration::from_secs(30),
            recurrence_threshold: 5,
            gemini_api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            ingest_enabled: true,
        }
    }
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("SCENELOG_HOST").unwrap_or(defaults.host),
            port: std::env::var("SCENELOG_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            db_path: std::env::var("SCENELOG_DB_PATH").unwrap_or(defaults.db_path),
            collection: std::env::var("SCENELOG_COLLECTION").unwrap_or(defaults.collection),
            device: std::env::var("SCENELOG_DEVICE").unwrap_or(defaults.device),
            tick_interval: Duration::from_secs(
                std::env::var("SCENELOG_TICK_INTERVAL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.tick_interval.as_secs()),
            ),
            recurrence_threshold: std::env::var("SCENELOG_RECURRENCE_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.recurrence_threshold),
            gemini_api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: std::env::var("SCENELOG_MODEL").unwrap_or(defaults.model),
            ingest_enabled: std::env::var("SCENELOG_INGEST_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.ingest_enabled),
        }
    }
}
