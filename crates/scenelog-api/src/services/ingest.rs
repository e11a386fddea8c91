//! The periodic capture→describe→coerce→persist job.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use scenelog_capture::{encode_png, CaptureError, FrameSource};
use scenelog_describer::{DescriberError, SceneDescriber};
use scenelog_models::{coerce_scene, CoerceError, SceneRecord};
use scenelog_store::{ScenePersistence, StoreError};

/// Errors that abort a single ingest tick. None of them stop the
/// scheduler; the failed scene is dropped, not buffered or retried.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("frame acquisition failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("describer call failed: {0}")]
    Describe(#[from] DescriberError),

    #[error(transparent)]
    Coerce(#[from] CoerceError),

    #[error("persisting scene failed: {0}")]
    Store(#[from] StoreError),
}

/// One unit of scheduled work: grab a frame, describe it, coerce the
/// response, persist the record.
///
/// A record is durably stored iff the whole chain succeeded; there is no
/// partial write. The frame source is owned exclusively by this job for
/// the process lifetime.
pub struct IngestJob<S, D, P> {
    source: S,
    describer: D,
    store: Arc<P>,
    prompt: String,
}

impl<S, D, P> IngestJob<S, D, P>
where
    S: FrameSource,
    D: SceneDescriber,
    P: ScenePersistence,
{
    pub fn new(source: S, describer: D, store: Arc<P>, prompt: String) -> Self {
        Self {
            source,
            describer,
            store,
            prompt,
        }
    }

    /// Run one tick, stamping the record with the current UTC instant.
    pub async fn run(&mut self) -> Result<SceneRecord, IngestError> {
        self.run_at(Utc::now()).await
    }

    /// Run one tick with a caller-supplied capture timestamp.
    pub async fn run_at(&mut self, captured_at: DateTime<Utc>) -> Result<SceneRecord, IngestError> {
        debug!("capturing frame");
        let frame = self.source.read()?;
        let png = encode_png(&frame)?;

        debug!(bytes = png.len(), "sending frame to describer");
        let raw = self.describer.describe(&png, &self.prompt).await?;

        let scene = coerce_scene(&raw)?;
        let record = SceneRecord::new(scene, captured_at);
        self.store.insert(&record).await?;

        info!(
            captured_at = %record.captured_at,
            persons = record.scene.persons.len(),
            vehicles = record.scene.vehicles.len(),
            "persisted scene record"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{RecordingStore, StubDescriber, StubSource};
    use chrono::TimeZone;

    const SCENE_JSON: &str = r#"{"vehicles": [{"type": "car", "color": "red"}]}"#;

    fn job_with(
        source: StubSource,
        describer: StubDescriber,
        store: Arc<RecordingStore>,
    ) -> IngestJob<StubSource, StubDescriber, RecordingStore> {
        IngestJob::new(source, describer, store, "prompt".to_string())
    }

    #[tokio::test]
    async fn success_writes_exactly_one_record() {
        let store = Arc::new(RecordingStore::default());
        let mut job = job_with(
            StubSource::ok(),
            StubDescriber::reply(SCENE_JSON),
            Arc::clone(&store),
        );

        let record = job.run().await.unwrap();
        assert_eq!(record.scene.vehicles.len(), 1);
        assert_eq!(store.insert_count(), 1);
    }

    #[tokio::test]
    async fn capture_failure_writes_nothing() {
        let store = Arc::new(RecordingStore::default());
        let mut job = job_with(
            StubSource::failing(),
            StubDescriber::reply(SCENE_JSON),
            Arc::clone(&store),
        );

        let err = job.run().await.unwrap_err();
        assert!(matches!(err, IngestError::Capture(_)));
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn describer_failure_writes_nothing() {
        let store = Arc::new(RecordingStore::default());
        let mut job = job_with(
            StubSource::ok(),
            StubDescriber::failing(),
            Arc::clone(&store),
        );

        let err = job.run().await.unwrap_err();
        assert!(matches!(err, IngestError::Describe(_)));
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn malformed_response_writes_nothing() {
        let store = Arc::new(RecordingStore::default());
        let mut job = job_with(
            StubSource::ok(),
            StubDescriber::reply("not json"),
            Arc::clone(&store),
        );

        let err = job.run().await.unwrap_err();
        assert!(matches!(err, IngestError::Coerce(_)));
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn insert_failure_surfaces_and_leaves_store_empty() {
        let store = Arc::new(RecordingStore::failing());
        let mut job = job_with(
            StubSource::ok(),
            StubDescriber::reply(SCENE_JSON),
            Arc::clone(&store),
        );

        let err = job.run().await.unwrap_err();
        assert!(matches!(err, IngestError::Store(_)));
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn caller_supplied_timestamp_is_used() {
        let store = Arc::new(RecordingStore::default());
        let mut job = job_with(
            StubSource::ok(),
            StubDescriber::reply(SCENE_JSON),
            Arc::clone(&store),
        );

        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let record = job.run_at(at).await.unwrap();
        assert_eq!(record.captured_at, at);
        assert_eq!(store.records()[0].captured_at, at);
    }
}
