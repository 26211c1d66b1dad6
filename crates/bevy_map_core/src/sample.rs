//! Sample maps used to learn transitions

use crate::{MapError, TileLayer};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A hand-authored map annotated with tile groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleMap {
    pub name: String,
    pub layer: TileLayer,
}

impl SampleMap {
    pub fn new(name: String, layer: TileLayer) -> Self {
        Self { name, layer }
    }
}

/// Load a sample map from a JSON file
pub fn load_sample_map(path: &Path) -> Result<SampleMap, MapError> {
    let content = std::fs::read_to_string(path)?;
    parse_sample_map(&content)
}

/// Parse a sample map from a JSON string
pub fn parse_sample_map(json: &str) -> Result<SampleMap, MapError> {
    let map: SampleMap = serde_json::from_str(json)?;

    if !map.layer.is_consistent() {
        return Err(MapError::InvalidFormat(format!(
            "map '{}' declares {}x{} but has {} tiles",
            map.name,
            map.layer.width,
            map.layer.height,
            map.layer.tiles.len()
        )));
    }

    Ok(map)
}

/// Save a sample map to a JSON file
pub fn save_sample_map(map: &SampleMap, path: &Path) -> Result<(), MapError> {
    let content = serde_json::to_string_pretty(map)?;
    std::fs::write(path, content)?;
    Ok(())
}
