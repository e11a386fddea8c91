//! Scene query handlers.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scenelog_models::{parse_utc_timestamp, Gender, RecurrenceSummary, Scene, SceneRecord};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for range-based endpoints. Timestamps are RFC 3339;
/// naive values are taken as UTC wall-clock.
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub threshold: Option<u64>,
}

fn parse_bound(value: Option<&str>, name: &str) -> ApiResult<Option<DateTime<Utc>>> {
    match value {
        None => Ok(None),
        Some(raw) => parse_utc_timestamp(raw)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request(format!("invalid {name} timestamp: {raw:?}"))),
    }
}

/// Latest scene response. An empty store encodes as a null `scene_data`,
/// not an error.
#[derive(Serialize)]
pub struct LatestSceneResponse {
    pub scene_data: Option<Scene>,
}

/// `GET /api/scenes/latest`
pub async fn latest_scene(State(state): State<AppState>) -> ApiResult<Json<LatestSceneResponse>> {
    let scene = state.query.latest().await?;
    Ok(Json(LatestSceneResponse { scene_data: scene }))
}

#[derive(Serialize)]
pub struct RangeResponse {
    pub records: Vec<SceneRecord>,
}

/// `GET /api/scenes?start=..&end=..`
pub async fn scenes_in_range(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Json<RangeResponse>> {
    let start = parse_bound(params.start.as_deref(), "start")?;
    let end = parse_bound(params.end.as_deref(), "end")?;

    let records = state.query.range(start, end).await?;
    Ok(Json(RangeResponse { records }))
}

/// Recurrence summary flattened into JSON-friendly entry lists (the
/// in-memory maps are keyed by composite keys, which JSON objects cannot
/// express directly).
#[derive(Serialize)]
pub struct RecurringResponse {
    pub common_persons: Vec<PersonEntry>,
    pub common_vehicles: Vec<VehicleEntry>,
}

#[derive(Serialize)]
pub struct PersonEntry {
    pub gender: Option<Gender>,
    pub clothes: String,
    pub count: u64,
}

#[derive(Serialize)]
pub struct VehicleEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    pub count: u64,
}

impl From<RecurrenceSummary> for RecurringResponse {
    fn from(summary: RecurrenceSummary) -> Self {
        Self {
            common_persons: summary
                .common_persons
                .into_iter()
                .map(|(key, count)| PersonEntry {
                    gender: key.gender,
                    clothes: key.clothes,
                    count,
                })
                .collect(),
            common_vehicles: summary
                .common_vehicles
                .into_iter()
                .map(|(key, count)| VehicleEntry {
                    kind: key.kind,
                    color: key.color,
                    count,
                })
                .collect(),
        }
    }
}

/// `GET /api/scenes/recurring?start=..&end=..&threshold=..`
pub async fn recurring_entities(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Json<RecurringResponse>> {
    let start = parse_bound(params.start.as_deref(), "start")?;
    let end = parse_bound(params.end.as_deref(), "end")?;
    let threshold = params.threshold.unwrap_or(state.config.recurrence_threshold);

    let summary = state.query.recurring(start, end, threshold).await?;
    Ok(Json(summary.into()))
}
