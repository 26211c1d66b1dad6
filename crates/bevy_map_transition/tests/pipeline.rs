//! Sample maps on disk -> catalog file -> resolver

use bevy_map_transition::bevy_map_core::{
    save_groups, save_sample_map, GroupKind, SampleMap, TileGrid, TileGroup, TileGroups, TileLayer,
};
use bevy_map_transition::{
    export_transitions, extract_files, import_transitions, MapTileTransitionModel, TileSelection,
    Transition, TransitionError, TransitionSettings, TransitionType,
};
use std::path::{Path, PathBuf};

const GRASS: u32 = 0;
const WATER: u32 = 1;

fn groups() -> TileGroups {
    let mut groups = TileGroups::new();
    groups
        .add_group(TileGroup::new("grass".to_string(), GroupKind::None, vec![GRASS]))
        .unwrap();
    groups
        .add_group(TileGroup::new("water".to_string(), GroupKind::None, vec![WATER]))
        .unwrap();
    groups
        .add_group(TileGroup::new("water".to_string(), GroupKind::Transition, (10..=17).collect()))
        .unwrap();
    groups
}

/// Grass island with a shore of water transition tiles
fn island() -> TileLayer {
    let (g, w) = (GRASS, WATER);
    let rows: Vec<Vec<Option<u32>>> = [
        [w, w, w, w, w, w, w],
        [w, 10, 11, 11, 11, 12, w],
        [w, 13, g, g, g, 14, w],
        [w, 13, g, g, g, 14, w],
        [w, 13, g, g, g, 14, w],
        [w, 15, 16, 16, 16, 17, w],
        [w, w, w, w, w, w, w],
    ]
    .iter()
    .map(|row| row.iter().map(|&t| Some(t)).collect())
    .collect();
    TileLayer::from_rows("island".to_string(), &rows).unwrap()
}

/// Write the group table and one sample map, returning their paths
fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let groups_path = dir.join("groups.json");
    save_groups(&groups(), &groups_path).unwrap();

    let map_path = dir.join("island.json");
    save_sample_map(&SampleMap::new("island".to_string(), island()), &map_path).unwrap();

    (groups_path, map_path)
}

#[test]
fn extract_export_import() {
    let tmp = tempfile::tempdir().unwrap();
    let (groups_path, map_path) = write_inputs(tmp.path());

    let catalog = extract_files(&groups_path, &[map_path]).unwrap();
    assert_eq!(catalog.count_between("grass", "water"), 8);
    assert_eq!(catalog.missing_types("grass", "water").len(), 6);

    let output = tmp.path().join("transitions.json");
    export_transitions(&catalog, &output).unwrap();
    let imported = import_transitions(&output).unwrap();

    assert_eq!(imported.len(), catalog.len());
    for (transition, tiles) in catalog.iter() {
        assert_eq!(imported.tiles(transition), Some(tiles));
    }

    // Exporting the import again gives the same file
    let again = tmp.path().join("again.json");
    export_transitions(&imported, &again).unwrap();
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        std::fs::read_to_string(&again).unwrap()
    );
}

#[test]
fn resolve_with_loaded_catalog() {
    let tmp = tempfile::tempdir().unwrap();
    let (groups_path, map_path) = write_inputs(tmp.path());

    let mut catalog = extract_files(&groups_path, &[map_path]).unwrap();
    // The sample map has no plain water tile away from the shore
    catalog.add(Transition::new(TransitionType::Center, "water", "water"), WATER);
    let output = tmp.path().join("transitions.json");
    export_transitions(&catalog, &output).unwrap();

    let settings_path = tmp.path().join("settings.toml");
    std::fs::write(&settings_path, "[tile_selection]\nmode = \"first\"\n").unwrap();
    let settings = TransitionSettings::load(&settings_path).unwrap();
    assert_eq!(settings.tile_selection, TileSelection::First);

    let mut model = MapTileTransitionModel::new(settings);
    model.load_transitions_file(&output).unwrap();

    let mut layer = TileLayer::filled("lake".to_string(), 4, 4, WATER).unwrap();
    layer.set_tile(1, 2, Some(GRASS));
    let changed = model.resolve(&mut layer, &groups(), 1, 2);

    assert_eq!(changed.len(), 8);
    assert_eq!(layer.tile(0, 3), Some(10));
    assert_eq!(layer.tile(1, 3), Some(11));
    assert_eq!(layer.tile(2, 2), Some(14));
    assert_eq!(layer.tile(1, 1), Some(16));
    assert_eq!(layer.tile(3, 2), Some(WATER));

    // A second pass over any changed cell finds nothing left to do
    for tile in changed {
        assert!(model.resolve(&mut layer, &groups(), tile.x, tile.y).is_empty());
    }
}

#[test]
fn missing_files_are_io_errors() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("nope.json");

    assert!(matches!(import_transitions(&missing), Err(TransitionError::Io(_))));
    assert!(matches!(extract_files(&missing, &[]), Err(TransitionError::Map(_))));

    let mut model = MapTileTransitionModel::default();
    assert!(model.load_transitions_file(&missing).is_err());
    assert!(model.catalog().is_empty());
}
