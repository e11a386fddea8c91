//! Scene description models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Weather and overall summary for a captured frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Environment {
    #[serde(default)]
    pub weather: String,

    #[serde(default)]
    pub summary: String,
}

/// Gender as reported by the describer.
///
/// Unknown values fold into `Unsure` rather than failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[serde(other)]
    Unsure,
}

/// A person spotted in a scene. Fields are best-effort; the describer may
/// omit any of them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clothes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

/// A vehicle spotted in a scene.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Vehicle {
    /// Vehicle type ("car", "van", ...).
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub color: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Structured description of a single captured frame.
///
/// After coercion `persons` and `vehicles` are always present (possibly
/// empty) so downstream consumers never branch on absence. The environment
/// sub-record may be entirely absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Scene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,

    #[serde(default)]
    pub persons: Vec<Person>,

    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

/// A persisted scene plus its capture timestamp. Immutable once stored;
/// ordering is by `captured_at` (always UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SceneRecord {
    pub scene: Scene,
    pub captured_at: DateTime<Utc>,
}

impl SceneRecord {
    pub fn new(scene: Scene, captured_at: DateTime<Utc>) -> Self {
        Self { scene, captured_at }
    }
}
