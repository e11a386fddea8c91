//! Read-side facade over the persistence backend.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use scenelog_models::{aggregate, today_start, RecurrenceSummary, Scene, SceneRecord};
use scenelog_store::ScenePersistence;

use crate::error::{ApiError, ApiResult};

/// Read-side API: latest scene, range reads, recurrence summaries.
pub struct QueryService<P> {
    store: Arc<P>,
}

impl<P> Clone for QueryService<P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<P: ScenePersistence> QueryService<P> {
    pub fn new(store: Arc<P>) -> Self {
        Self { store }
    }

    /// Most recently captured scene. An empty store is not an error.
    pub async fn latest(&self) -> ApiResult<Option<Scene>> {
        Ok(self.store.latest().await?.map(|record| record.scene))
    }

    /// Records with `start <= captured_at <= end`, ascending by capture
    /// time.
    ///
    /// `start` defaults to the start of the current UTC day, `end` to
    /// now. `start >= end` fails with [`ApiError::InvalidRange`].
    pub async fn range(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> ApiResult<Vec<SceneRecord>> {
        let start = start.unwrap_or_else(today_start);
        let end = end.unwrap_or_else(Utc::now);

        if start >= end {
            return Err(ApiError::InvalidRange { start, end });
        }

        Ok(self.store.range(start, end).await?)
    }

    /// Persons/vehicles seen strictly more than `threshold` times within
    /// the range.
    pub async fn recurring(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        threshold: u64,
    ) -> ApiResult<RecurrenceSummary> {
        let records = self.range(start, end).await?;
        Ok(aggregate(&records, threshold))
    }
}
