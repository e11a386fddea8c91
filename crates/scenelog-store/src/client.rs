//! Scene record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use scenelog_models::{Scene, SceneRecord};

use crate::error::{StoreError, StoreResult};

/// Narrow persistence contract shared by the ingest (write) and query
/// (read) paths.
///
/// Records are insert-once and never mutated; retention and deletion are
/// an external concern. Read-after-write is not guaranteed to be
/// instantaneous.
#[async_trait]
pub trait ScenePersistence: Send + Sync {
    /// Insert one record. A record is durably stored iff this succeeds.
    async fn insert(&self, record: &SceneRecord) -> StoreResult<()>;

    /// The most recently captured record, if any.
    async fn latest(&self) -> StoreResult<Option<SceneRecord>>;

    /// Records with `start <= captured_at <= end`, ascending by capture
    /// time. Both bounds inclusive.
    async fn range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<SceneRecord>>;
}

/// SQLite-backed scene store.
///
/// One table per camera ("collection"). Scenes are stored as JSON text
/// with their capture instant as UTC unix milliseconds, so range queries
/// are plain integer comparisons.
#[derive(Clone)]
pub struct SceneStore {
    pool: SqlitePool,
    table: String,
}

impl SceneStore {
    /// Collection used when none is configured.
    pub const DEFAULT_COLLECTION: &'static str = "camera0";

    /// Open (creating if needed) the database at `path` and ensure the
    /// collection table exists. A `path` of `:memory:` opens a transient
    /// in-memory database.
    pub async fn open(path: &str, collection: &str) -> StoreResult<Self> {
        if path == ":memory:" {
            return Self::open_in_memory(collection).await;
        }

        validate_collection(collection)?;

        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let url = format!("sqlite://{path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        info!(path, collection, "opened scene store");
        Self::with_pool(pool, collection).await
    }

    /// Transient in-memory store, mainly for tests.
    pub async fn open_in_memory(collection: &str) -> StoreResult<Self> {
        validate_collection(collection)?;

        // Every new connection to :memory: is a distinct database, so the
        // pool is pinned to a single connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        Self::with_pool(pool, collection).await
    }

    async fn with_pool(pool: SqlitePool, collection: &str) -> StoreResult<Self> {
        // WAL lets the query path read while the ingest path writes.
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA busy_timeout = 5000")
            .execute(&pool)
            .await?;

        let store = Self {
            pool,
            table: collection.to_string(),
        };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                captured_at_ms INTEGER NOT NULL,
                scene TEXT NOT NULL
            )",
            self.table
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_captured_at ON {table} (captured_at_ms)",
            table = self.table
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ScenePersistence for SceneStore {
    async fn insert(&self, record: &SceneRecord) -> StoreResult<()> {
        let scene_json = serde_json::to_string(&record.scene)?;

        sqlx::query(&format!(
            "INSERT INTO {} (captured_at_ms, scene) VALUES (?, ?)",
            self.table
        ))
        .bind(record.captured_at.timestamp_millis())
        .bind(scene_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest(&self) -> StoreResult<Option<SceneRecord>> {
        let row: Option<(i64, String)> = sqlx::query_as(&format!(
            "SELECT captured_at_ms, scene FROM {}
             ORDER BY captured_at_ms DESC, id DESC LIMIT 1",
            self.table
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(ms, json)| decode_row(ms, &json)).transpose()
    }

    async fn range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<SceneRecord>> {
        let rows: Vec<(i64, String)> = sqlx::query_as(&format!(
            "SELECT captured_at_ms, scene FROM {}
             WHERE captured_at_ms >= ? AND captured_at_ms <= ?
             ORDER BY captured_at_ms ASC, id ASC",
            self.table
        ))
        .bind(start.timestamp_millis())
        .bind(end.timestamp_millis())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(ms, json)| decode_row(ms, &json))
            .collect()
    }
}

fn decode_row(captured_at_ms: i64, scene_json: &str) -> StoreResult<SceneRecord> {
    let scene: Scene = serde_json::from_str(scene_json)?;
    let captured_at = DateTime::<Utc>::from_timestamp_millis(captured_at_ms)
        .ok_or(StoreError::CorruptTimestamp(captured_at_ms))?;
    Ok(SceneRecord::new(scene, captured_at))
}

/// Collection names are interpolated into SQL, so they are restricted to
/// identifier characters.
fn validate_collection(name: &str) -> StoreResult<()> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if head_ok && tail_ok {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use scenelog_models::{Person, Vehicle};

    fn record_at(hour: u32) -> SceneRecord {
        SceneRecord::new(
            Scene {
                environment: None,
                persons: vec![Person {
                    clothes: Some("red jacket".to_string()),
                    gender: None,
                }],
                vehicles: vec![Vehicle {
                    kind: "car".to_string(),
                    color: "red".to_string(),
                    model: None,
                }],
            },
            Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn empty_store_has_no_latest() {
        let store = SceneStore::open_in_memory("camera0").await.unwrap();
        assert!(store.latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_then_latest_round_trips() {
        let store = SceneStore::open_in_memory("camera0").await.unwrap();
        let record = record_at(12);
        store.insert(&record).await.unwrap();

        let fetched = store.latest().await.unwrap().unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn latest_picks_newest_capture() {
        let store = SceneStore::open_in_memory("camera0").await.unwrap();
        store.insert(&record_at(8)).await.unwrap();
        store.insert(&record_at(15)).await.unwrap();
        store.insert(&record_at(11)).await.unwrap();

        let fetched = store.latest().await.unwrap().unwrap();
        assert_eq!(fetched.captured_at.hour(), 15);
    }

    #[tokio::test]
    async fn range_is_inclusive_and_ascending() {
        let store = SceneStore::open_in_memory("camera0").await.unwrap();
        for hour in [8, 10, 12, 14] {
            store.insert(&record_at(hour)).await.unwrap();
        }

        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap();
        let records = store.range(start, end).await.unwrap();

        let hours: Vec<u32> = records.iter().map(|r| r.captured_at.hour()).collect();
        assert_eq!(hours, vec![10, 12, 14]);
    }

    #[tokio::test]
    async fn invalid_collection_names_are_rejected() {
        assert!(matches!(
            SceneStore::open_in_memory("camera0; DROP TABLE x").await,
            Err(StoreError::InvalidCollection(_))
        ));
        assert!(matches!(
            SceneStore::open_in_memory("").await,
            Err(StoreError::InvalidCollection(_))
        ));
        assert!(matches!(
            SceneStore::open_in_memory("0cam").await,
            Err(StoreError::InvalidCollection(_))
        ));
    }

    #[tokio::test]
    async fn on_disk_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenes.db");
        let path = path.to_str().unwrap();

        {
            let store = SceneStore::open(path, "camera0").await.unwrap();
            store.insert(&record_at(9)).await.unwrap();
        }

        let store = SceneStore::open(path, "camera0").await.unwrap();
        assert!(store.latest().await.unwrap().is_some());
    }
}
