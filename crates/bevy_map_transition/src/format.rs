//! Transition catalog file format
//!
//! ```json
//! { "transitions": [ { "type": "UP", "in": "grass", "out": "water", "tiles": [3, 4] } ] }
//! ```

use crate::{Transition, TransitionCatalog, TransitionError, TransitionType};
use bevy_map_core::TileRef;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One catalog record: a transition and the tiles rendering it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "in")]
    pub group_in: String,
    #[serde(rename = "out")]
    pub group_out: String,
    #[serde(default)]
    pub tiles: Vec<TileRef>,
}

/// Serialized form of a [`TransitionCatalog`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionsConfig {
    pub transitions: Vec<TransitionRecord>,
}

impl TransitionsConfig {
    /// Records in canonical orientation, sorted by `(in, out, type)`, tiles ascending
    pub fn from_catalog(catalog: &TransitionCatalog) -> Self {
        let transitions = catalog
            .sorted()
            .into_iter()
            .map(|(transition, tiles)| TransitionRecord {
                kind: transition.kind().name().to_string(),
                group_in: transition.group_in().to_string(),
                group_out: transition.group_out().to_string(),
                tiles: tiles.iter().copied().collect(),
            })
            .collect();
        Self { transitions }
    }

    /// Build the catalog, failing on the first invalid record
    pub fn into_catalog(self) -> Result<TransitionCatalog, TransitionError> {
        let mut catalog = TransitionCatalog::new();
        for record in self.transitions {
            let kind = TransitionType::from_name(&record.kind)?;
            if record.group_in.is_empty() {
                return Err(TransitionError::MissingGroup("in"));
            }
            if record.group_out.is_empty() {
                return Err(TransitionError::MissingGroup("out"));
            }
            // A uniform tile belongs to one group only, the other name would be lost
            if kind.is_uniform() && record.group_in != record.group_out {
                return Err(TransitionError::UniformGroupMismatch {
                    kind,
                    group_in: record.group_in,
                    group_out: record.group_out,
                });
            }

            let transition = Transition::new(kind, record.group_in, record.group_out);
            for tile in record.tiles {
                catalog.add(transition.clone(), tile);
            }
        }
        Ok(catalog)
    }
}

/// Load a transition catalog from a JSON file
pub fn import_transitions(path: &Path) -> Result<TransitionCatalog, TransitionError> {
    let content = std::fs::read_to_string(path)?;
    let catalog = parse_transitions(&content)?;
    info!("Loaded {} transitions from {:?}", catalog.len(), path);
    Ok(catalog)
}

/// Parse a transition catalog from a JSON string
pub fn parse_transitions(json: &str) -> Result<TransitionCatalog, TransitionError> {
    let config: TransitionsConfig = serde_json::from_str(json)?;
    config.into_catalog()
}

/// Serialize a transition catalog to a JSON string
pub fn transitions_to_string(catalog: &TransitionCatalog) -> Result<String, TransitionError> {
    Ok(serde_json::to_string_pretty(&TransitionsConfig::from_catalog(catalog))?)
}

/// Save a transition catalog to a JSON file
pub fn export_transitions(catalog: &TransitionCatalog, path: &Path) -> Result<(), TransitionError> {
    let content = transitions_to_string(catalog)?;
    std::fs::write(path, content)?;
    info!("Saved {} transitions to {:?}", catalog.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transitions() {
        let json = r#"{
            "transitions": [
                { "type": "UP", "in": "grass", "out": "water", "tiles": [3, 4] },
                { "type": "CENTER", "in": "grass", "out": "grass", "tiles": [0] }
            ]
        }"#;

        let catalog = parse_transitions(json).unwrap();
        let up = Transition::new(TransitionType::Up, "grass", "water");
        assert_eq!(catalog.tiles(&up).unwrap().len(), 2);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_mirrored_records_merge() {
        let json = r#"{
            "transitions": [
                { "type": "UP", "in": "water", "out": "grass", "tiles": [3] },
                { "type": "DOWN", "in": "grass", "out": "water", "tiles": [4] }
            ]
        }"#;

        let catalog = parse_transitions(json).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_unknown_type_aborts_load() {
        let json = r#"{
            "transitions": [ { "type": "DIAGONAL", "in": "a", "out": "b", "tiles": [1] } ]
        }"#;

        let result = parse_transitions(json);
        assert!(matches!(result, Err(TransitionError::UnknownTransitionName(_))));
    }

    #[test]
    fn test_empty_group_aborts_load() {
        let json = r#"{ "transitions": [ { "type": "UP", "in": "", "out": "b", "tiles": [1] } ] }"#;

        let result = parse_transitions(json);
        assert!(matches!(result, Err(TransitionError::MissingGroup("in"))));
    }

    #[test]
    fn test_uniform_record_with_two_groups_aborts_load() {
        let json = r#"{
            "transitions": [ { "type": "CENTER", "in": "A", "out": "B", "tiles": [1] } ]
        }"#;

        let result = parse_transitions(json);
        assert!(matches!(
            result,
            Err(TransitionError::UniformGroupMismatch { kind: TransitionType::Center, .. })
        ));

        let json = r#"{
            "transitions": [ { "type": "CENTER_OUT", "in": "A", "out": "A", "tiles": [1] } ]
        }"#;
        assert!(parse_transitions(json).is_ok());
    }

    #[test]
    fn test_missing_attribute_is_json_error() {
        let json = r#"{ "transitions": [ { "type": "UP", "in": "a", "tiles": [1] } ] }"#;

        let result = parse_transitions(json);
        assert!(matches!(result, Err(TransitionError::Json(_))));
    }

    #[test]
    fn test_string_round_trip() {
        let json = r#"{
            "transitions": [
                { "type": "CORNER_UP_LEFT", "in": "grass", "out": "water", "tiles": [9, 7] },
                { "type": "CENTER", "in": "water", "out": "water", "tiles": [1] }
            ]
        }"#;

        let exported = transitions_to_string(&parse_transitions(json).unwrap()).unwrap();
        let again = transitions_to_string(&parse_transitions(&exported).unwrap()).unwrap();
        assert_eq!(exported, again);

        let config: TransitionsConfig = serde_json::from_str(&exported).unwrap();
        assert_eq!(config.transitions[0].tiles, vec![7, 9]);
        assert_eq!(config.transitions[1].group_in, "water");
    }

    #[test]
    fn test_hand_written_file_keeps_every_record() {
        // Mirrored and non-canonical records, as someone might write them by hand
        let json = r#"{
            "transitions": [
                { "type": "UP", "in": "water", "out": "grass", "tiles": [3] },
                { "type": "CENTER_OUT", "in": "sand", "out": "sand", "tiles": [5] },
                { "type": "CORNER_UP_LEFT", "in": "grass", "out": "water", "tiles": [9, 7] }
            ]
        }"#;
        let original: TransitionsConfig = serde_json::from_str(json).unwrap();

        let exported = transitions_to_string(&parse_transitions(json).unwrap()).unwrap();
        let reloaded = parse_transitions(&exported).unwrap();

        assert_eq!(reloaded.len(), original.transitions.len());
        for record in original.transitions {
            let kind = TransitionType::from_name(&record.kind).unwrap();
            let transition = Transition::new(kind, record.group_in, record.group_out);
            let tiles: Vec<TileRef> =
                reloaded.tiles(&transition).unwrap().iter().copied().collect();
            let mut expected = record.tiles;
            expected.sort_unstable();
            assert_eq!(tiles, expected, "{transition} changed");
        }

        let config: TransitionsConfig = serde_json::from_str(&exported).unwrap();
        let mut written: Vec<(&str, &str, &str)> = config
            .transitions
            .iter()
            .map(|r| (r.kind.as_str(), r.group_in.as_str(), r.group_out.as_str()))
            .collect();
        written.sort_unstable();
        assert_eq!(
            written,
            vec![
                ("CENTER", "sand", "sand"),
                ("CORNER_UP_LEFT", "grass", "water"),
                ("DOWN", "grass", "water"),
            ]
        );
    }
}
