//! Coercion of raw describer output into a well-formed [`Scene`].
//!
//! The describer is non-deterministic and may return a strict subset of the
//! scene shape. Coercion guarantees the required top-level keys exist with
//! empty defaults instead of letting "missing key" propagate downstream.

use serde_json::Value;
use thiserror::Error;

use crate::scene::Scene;

/// Error for describer output that cannot be turned into a scene.
#[derive(Debug, Error)]
pub enum CoerceError {
    #[error("malformed describer response: {0}")]
    MalformedResponse(String),
}

/// Required top-level sequence keys of a scene.
const REQUIRED_SEQUENCES: [&str; 2] = ["persons", "vehicles"];

/// Turn raw (possibly partial) JSON text from the describer into a valid
/// [`Scene`].
///
/// Missing top-level keys are substituted with empty defaults rather than
/// failing; nested person/vehicle fields pass through as partial records.
/// Raw text that does not parse to a JSON object fails with
/// [`CoerceError::MalformedResponse`]. Pure function of its input.
pub fn coerce_scene(raw: &str) -> Result<Scene, CoerceError> {
    let value: Value = serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| CoerceError::MalformedResponse(e.to_string()))?;

    let mut map = match value {
        Value::Object(map) => map,
        other => {
            return Err(CoerceError::MalformedResponse(format!(
                "expected a JSON object, got: {other}"
            )))
        }
    };

    for key in REQUIRED_SEQUENCES {
        let slot = map
            .entry(key)
            .or_insert_with(|| Value::Array(Vec::new()));
        // An explicit null counts as missing.
        if slot.is_null() {
            *slot = Value::Array(Vec::new());
        }
    }

    serde_json::from_value(Value::Object(map))
        .map_err(|e| CoerceError::MalformedResponse(e.to_string()))
}

/// Models frequently wrap JSON payloads in markdown code fences.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Gender;

    #[test]
    fn missing_top_level_keys_default_to_empty() {
        let scene = coerce_scene(r#"{"environment": {"weather": "rainy", "summary": "a street"}}"#)
            .unwrap();
        assert!(scene.persons.is_empty());
        assert!(scene.vehicles.is_empty());
        assert_eq!(scene.environment.unwrap().weather, "rainy");
    }

    #[test]
    fn all_keys_missing_yields_empty_scene() {
        let scene = coerce_scene("{}").unwrap();
        assert!(scene.environment.is_none());
        assert!(scene.persons.is_empty());
        assert!(scene.vehicles.is_empty());
    }

    #[test]
    fn null_sequences_are_treated_as_missing() {
        let scene = coerce_scene(r#"{"persons": null, "vehicles": null}"#).unwrap();
        assert!(scene.persons.is_empty());
        assert!(scene.vehicles.is_empty());
    }

    #[test]
    fn full_payload_passes_through() {
        let scene = coerce_scene(
            r#"{
                "environment": {"weather": "sunny", "summary": "car park"},
                "persons": [{"clothes": "red jacket", "gender": "female"}],
                "vehicles": [{"type": "car", "color": "red"}]
            }"#,
        )
        .unwrap();
        assert_eq!(scene.persons.len(), 1);
        assert_eq!(scene.persons[0].gender, Some(Gender::Female));
        assert_eq!(scene.vehicles[0].kind, "car");
    }

    #[test]
    fn code_fences_are_stripped() {
        let scene = coerce_scene("```json\n{\"persons\": []}\n```").unwrap();
        assert!(scene.vehicles.is_empty());
    }

    #[test]
    fn non_json_fails_with_malformed_response() {
        let err = coerce_scene("not json").unwrap_err();
        assert!(matches!(err, CoerceError::MalformedResponse(_)));
    }

    #[test]
    fn non_object_json_fails_with_malformed_response() {
        let err = coerce_scene(r#"["persons"]"#).unwrap_err();
        assert!(matches!(err, CoerceError::MalformedResponse(_)));
    }

    #[test]
    fn partial_nested_records_pass_through() {
        let scene = coerce_scene(r#"{"persons": [{}], "vehicles": [{"color": "blue"}]}"#).unwrap();
        assert_eq!(scene.persons[0].clothes, None);
        assert_eq!(scene.vehicles[0].kind, "");
        assert_eq!(scene.vehicles[0].color, "blue");
    }
}
