//! Terrain groups assigned to tiles

use crate::{MapError, TileRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Read-only lookup from tile references to terrain group names
pub trait GroupLookup {
    /// Group name of a tile, `None` if the tile belongs to no group
    fn group(&self, tile: TileRef) -> Option<&str>;

    /// All group names, sorted and deduplicated
    fn groups(&self) -> Vec<&str>;

    /// Whether a tile belongs to a transition-kind group
    fn is_transition_kind(&self, tile: TileRef) -> bool;
}

/// Kind of a tile group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Plain terrain tiles (fill tiles)
    #[default]
    None,
    /// Tiles drawing the border between this group and another one
    Transition,
}

/// A named group of tiles (e.g. "water", "grass")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGroup {
    pub name: String,
    #[serde(default)]
    pub kind: GroupKind,
    /// Tile references belonging to this group
    #[serde(default)]
    pub tiles: Vec<TileRef>,
}

impl TileGroup {
    pub fn new(name: String, kind: GroupKind, tiles: Vec<TileRef>) -> Self {
        Self { name, kind, tiles }
    }
}

/// Table of tile groups with a tile -> group index.
///
/// The same group name may appear twice with different kinds, e.g. "grass"
/// fill tiles and "grass" transition tiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileGroups {
    pub groups: Vec<TileGroup>,
    /// Tile -> index into `groups`, rebuilt after loading
    #[serde(skip)]
    tile_index: HashMap<TileRef, usize>,
}

impl TileGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group, rejecting empty names and tiles already owned by another group
    pub fn add_group(&mut self, group: TileGroup) -> Result<(), MapError> {
        if group.name.is_empty() {
            return Err(MapError::InvalidFormat("group name is empty".to_string()));
        }
        for tile in &group.tiles {
            if let Some(&owner) = self.tile_index.get(tile) {
                return Err(MapError::InvalidFormat(format!(
                    "tile {} is in both '{}' and '{}'",
                    tile, self.groups[owner].name, group.name
                )));
            }
        }

        let idx = self.groups.len();
        for &tile in &group.tiles {
            self.tile_index.insert(tile, idx);
        }
        self.groups.push(group);
        Ok(())
    }

    /// Group record of a tile
    pub fn group_of(&self, tile: TileRef) -> Option<&TileGroup> {
        self.tile_index.get(&tile).and_then(|&idx| self.groups.get(idx))
    }

    /// All tiles of a group name, across every kind, sorted
    pub fn tiles_of(&self, name: &str) -> Vec<TileRef> {
        let mut tiles: Vec<TileRef> = self
            .groups
            .iter()
            .filter(|g| g.name == name)
            .flat_map(|g| g.tiles.iter().copied())
            .collect();
        tiles.sort_unstable();
        tiles
    }

    /// Rebuild the tile index from the group list (after deserialization)
    fn rebuild_index(self) -> Result<Self, MapError> {
        let mut rebuilt = Self::new();
        for group in self.groups {
            rebuilt.add_group(group)?;
        }
        Ok(rebuilt)
    }
}

impl GroupLookup for TileGroups {
    fn group(&self, tile: TileRef) -> Option<&str> {
        self.group_of(tile).map(|g| g.name.as_str())
    }

    fn groups(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.iter().map(|g| g.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    fn is_transition_kind(&self, tile: TileRef) -> bool {
        self.group_of(tile)
            .map(|g| g.kind == GroupKind::Transition)
            .unwrap_or(false)
    }
}

/// Load tile groups from a JSON file
pub fn load_groups(path: &Path) -> Result<TileGroups, MapError> {
    let content = std::fs::read_to_string(path)?;
    parse_groups(&content)
}

/// Parse tile groups from a JSON string
pub fn parse_groups(json: &str) -> Result<TileGroups, MapError> {
    let groups: TileGroups = serde_json::from_str(json)?;
    groups.rebuild_index()
}

/// Save tile groups to a JSON file
pub fn save_groups(groups: &TileGroups, path: &Path) -> Result<(), MapError> {
    let content = serde_json::to_string_pretty(groups)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water_grass() -> TileGroups {
        let mut groups = TileGroups::new();
        groups
            .add_group(TileGroup::new("water".to_string(), GroupKind::None, vec![0, 1]))
            .unwrap();
        groups
            .add_group(TileGroup::new("grass".to_string(), GroupKind::None, vec![2]))
            .unwrap();
        groups
            .add_group(TileGroup::new("grass".to_string(), GroupKind::Transition, vec![10, 11]))
            .unwrap();
        groups
    }

    #[test]
    fn test_group_lookup() {
        let groups = water_grass();

        assert_eq!(groups.group(1), Some("water"));
        assert_eq!(groups.group(11), Some("grass"));
        assert_eq!(groups.group(99), None);
        assert!(groups.is_transition_kind(10));
        assert!(!groups.is_transition_kind(2));
        assert_eq!(groups.groups(), vec!["grass", "water"]);
        assert_eq!(groups.tiles_of("grass"), vec![2, 10, 11]);
    }

    #[test]
    fn test_rejects_shared_tile() {
        let mut groups = water_grass();
        let result = groups.add_group(TileGroup::new("sand".to_string(), GroupKind::None, vec![2]));
        assert!(matches!(result, Err(MapError::InvalidFormat(_))));
    }

    #[test]
    fn test_rejects_empty_name() {
        let mut groups = TileGroups::new();
        let result = groups.add_group(TileGroup::new(String::new(), GroupKind::None, vec![]));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_groups_rebuilds_index() {
        let json = r#"{
            "groups": [
                { "name": "water", "tiles": [0, 1] },
                { "name": "grass", "kind": "transition", "tiles": [5] }
            ]
        }"#;

        let groups = parse_groups(json).unwrap();
        assert_eq!(groups.group(0), Some("water"));
        assert!(groups.is_transition_kind(5));
    }

    #[test]
    fn test_save_and_load_groups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");

        save_groups(&water_grass(), &path).unwrap();
        let loaded = load_groups(&path).unwrap();

        assert_eq!(loaded.groups, water_grass().groups);
        assert_eq!(loaded.group(10), Some("grass"));
    }
}
