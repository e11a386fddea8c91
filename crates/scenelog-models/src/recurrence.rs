//! Recurrence aggregation over time-windowed scene records.
//!
//! Persons and vehicles are normalized into coarse identity keys and
//! counted across a slice of records; only keys seen strictly more often
//! than a threshold are reported as "common".

use std::collections::HashMap;

use serde::Serialize;

use crate::scene::{Gender, SceneRecord};

/// Ordered literal substitutions applied to free-text clothing
/// descriptions before they are used as identity keys.
///
/// Applied left to right, each substitution once (replace-all),
/// non-overlapping. Merges near-duplicate phrasings such as
/// "t-shirt"/"tshirt" and "a red jacket"/"red jacket".
pub const SANITISE_RULES: &[(&str, &str)] = &[("t-", "t"), (" and ", ", "), ("a ", "")];

/// Normalized identity of a person across scenes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PersonKey {
    pub gender: Option<Gender>,
    pub clothes: String,
}

/// Normalized identity of a vehicle across scenes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VehicleKey {
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
}

/// Entities whose occurrence count exceeded the threshold. Entry order is
/// not significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurrenceSummary {
    pub common_persons: HashMap<PersonKey, u64>,
    pub common_vehicles: HashMap<VehicleKey, u64>,
}

/// Apply [`SANITISE_RULES`] to a clothing description.
pub fn sanitise_description(description: &str) -> String {
    let mut out = description.to_string();
    for (pattern, replacement) in SANITISE_RULES {
        out = out.replace(pattern, replacement);
    }
    out
}

/// Count recurring persons and vehicles across `records`.
///
/// Only keys seen strictly more than `threshold` times are returned:
/// `threshold = 0` still requires at least one sighting, `threshold = 5`
/// requires six. Empty input yields empty maps.
pub fn aggregate(records: &[SceneRecord], threshold: u64) -> RecurrenceSummary {
    let mut persons: HashMap<PersonKey, u64> = HashMap::new();
    let mut vehicles: HashMap<VehicleKey, u64> = HashMap::new();

    for record in records {
        for person in &record.scene.persons {
            let key = PersonKey {
                gender: person.gender,
                clothes: sanitise_description(person.clothes.as_deref().unwrap_or_default()),
            };
            *persons.entry(key).or_insert(0) += 1;
        }
        for vehicle in &record.scene.vehicles {
            let key = VehicleKey {
                kind: vehicle.kind.clone(),
                color: vehicle.color.clone(),
            };
            *vehicles.entry(key).or_insert(0) += 1;
        }
    }

    persons.retain(|_, count| *count > threshold);
    vehicles.retain(|_, count| *count > threshold);

    RecurrenceSummary {
        common_persons: persons,
        common_vehicles: vehicles,
    }
}
