//! Stub capabilities for service tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use image::RgbImage;

use scenelog_capture::{CaptureError, FrameSource};
use scenelog_describer::{DescriberError, SceneDescriber};
use scenelog_models::SceneRecord;
use scenelog_store::{ScenePersistence, StoreError, StoreResult};

/// Frame source returning a fixed 2x2 frame, or failing every read.
pub struct StubSource {
    fail: bool,
    open: AtomicBool,
}

impl StubSource {
    pub fn ok() -> Self {
        Self {
            fail: false,
            open: AtomicBool::new(true),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            open: AtomicBool::new(true),
        }
    }
}

impl FrameSource for StubSource {
    fn read(&mut self) -> Result<RgbImage, CaptureError> {
        if self.fail {
            Err(CaptureError::FrameNotFound("stub".to_string()))
        } else {
            Ok(RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30])))
        }
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Relaxed)
    }

    fn close(&mut self) {
        self.open.store(false, Ordering::Relaxed);
    }
}

/// Describer returning a canned reply, or failing every call.
pub struct StubDescriber {
    reply: Option<String>,
}

impl StubDescriber {
    pub fn reply(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl SceneDescriber for StubDescriber {
    async fn describe(&self, _image_png: &[u8], _prompt: &str) -> Result<String, DescriberError> {
        self.reply.clone().ok_or(DescriberError::EmptyResponse)
    }
}

/// Describer that takes a fixed amount of (virtual) time per call.
pub struct SlowDescriber {
    reply: String,
    delay: Duration,
}

impl SlowDescriber {
    pub fn new(reply: &str, delay: Duration) -> Self {
        Self {
            reply: reply.to_string(),
            delay,
        }
    }
}

#[async_trait]
impl SceneDescriber for SlowDescriber {
    async fn describe(&self, _image_png: &[u8], _prompt: &str) -> Result<String, DescriberError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }
}

/// In-memory persistence recording every insert.
#[derive(Default)]
pub struct RecordingStore {
    records: Mutex<Vec<SceneRecord>>,
    fail_inserts: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_inserts: true,
        }
    }

    pub fn insert_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn records(&self) -> Vec<SceneRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScenePersistence for RecordingStore {
    async fn insert(&self, record: &SceneRecord) -> StoreResult<()> {
        if self.fail_inserts {
            return Err(StoreError::InvalidCollection("stub".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn latest(&self) -> StoreResult<Option<SceneRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .max_by_key(|r| r.captured_at)
            .cloned())
    }

    async fn range(
        &self,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    ) -> StoreResult<Vec<SceneRecord>> {
        let mut records: Vec<SceneRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.captured_at >= start && r.captured_at <= end)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.captured_at);
        Ok(records)
    }
}
