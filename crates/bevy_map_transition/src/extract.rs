//! Transition extraction from annotated sample maps

use crate::{Transition, TransitionCatalog, TransitionError, TransitionType};
use bevy_map_core::{load_groups, load_sample_map, GroupLookup, MapTile, TileGrid};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Diagonal neighbor offsets, one per corner: UpLeft, UpRight, DownLeft, DownRight
const DIAGONALS: [(i32, i32); 4] = [(-1, 1), (1, 1), (-1, -1), (1, -1)];

/// Classifies the transition drawn by a single tile from its diagonal neighbors
pub struct MapTransitionExtractor<'a, G: TileGrid + ?Sized, L: GroupLookup + ?Sized> {
    grid: &'a G,
    groups: &'a L,
}

impl<'a, G: TileGrid + ?Sized, L: GroupLookup + ?Sized> MapTransitionExtractor<'a, G, L> {
    pub fn new(grid: &'a G, groups: &'a L) -> Self {
        Self { grid, groups }
    }

    /// Transition of the tile at a position, `None` if it draws none
    pub fn transition(&self, x: i32, y: i32) -> Option<Transition> {
        let tile = self.grid.tile_at(x, y)?;
        let group = self.groups.group(tile.tile)?;

        let mut contributed: [Option<&'a str>; 4] = [None; 4];
        for (slot, (dx, dy)) in DIAGONALS.iter().enumerate() {
            if let Some(neighbor) = self.grid.tile_at(x + dx, y + dy) {
                contributed[slot] = self.contributed_group(tile, group, neighbor);
            }
        }

        let distinct: BTreeSet<&str> = contributed.iter().flatten().copied().collect();

        if distinct.len() == 1 && distinct.contains(group) {
            return Some(Transition::new(TransitionType::Center, group, group));
        }

        if distinct.len() == 2
            && distinct.contains(group)
            && contributed.iter().all(Option::is_some)
            && self.groups.is_transition_kind(tile.tile)
        {
            let other = distinct.iter().find(|g| **g != group)?;
            let outer = |slot: usize| contributed[slot] != Some(group);
            let kind = TransitionType::from_corners(outer(3), outer(2), outer(1), outer(0));
            return Some(Transition::new(kind, group, *other));
        }

        None
    }

    /// Group a diagonal neighbor contributes to the corner it touches.
    ///
    /// A transition neighbor contributes the single group both tiles see
    /// around them, besides the tile's own group.
    fn contributed_group(&self, tile: MapTile, group: &str, neighbor: MapTile) -> Option<&'a str> {
        let neighbor_group = self.groups.group(neighbor.tile)?;
        if !self.groups.is_transition_kind(neighbor.tile) {
            return Some(neighbor_group);
        }

        let around_tile = self.groups_around(tile);
        let around_neighbor = self.groups_around(neighbor);
        let mut shared = around_tile
            .intersection(&around_neighbor)
            .copied()
            .filter(|g| *g != group);

        match (shared.next(), shared.next()) {
            (Some(third), None) => Some(third),
            _ => None,
        }
    }

    fn groups_around(&self, tile: MapTile) -> BTreeSet<&'a str> {
        self.grid
            .neighbors8(tile.x, tile.y)
            .into_iter()
            .filter_map(|n| self.groups.group(n.tile))
            .collect()
    }
}

/// Builds a transition catalog from one or more sample maps
pub struct TransitionsExtractor<'a, L: GroupLookup + ?Sized> {
    groups: &'a L,
}

impl<'a, L: GroupLookup + ?Sized> TransitionsExtractor<'a, L> {
    pub fn new(groups: &'a L) -> Self {
        Self { groups }
    }

    /// Add the transitions of a map's interior tiles to `catalog`.
    /// Returns the number of tiles recorded.
    pub fn extract_map<G: TileGrid + ?Sized>(
        &self,
        grid: &G,
        catalog: &mut TransitionCatalog,
    ) -> usize {
        let extractor = MapTransitionExtractor::new(grid, self.groups);
        let mut recorded = 0;

        // Border tiles are skipped: all 4 diagonal neighbors must exist
        let last_x = i32::try_from(grid.width().saturating_sub(1)).unwrap_or(i32::MAX);
        let last_y = i32::try_from(grid.height().saturating_sub(1)).unwrap_or(i32::MAX);
        for y in 1..last_y {
            for x in 1..last_x {
                let Some(tile) = grid.tile(x, y) else {
                    continue;
                };
                if let Some(transition) = extractor.transition(x, y) {
                    debug!("Tile {} at ({}, {}) draws {}", tile, x, y, transition);
                    // The mirror `(type.symmetric(), out, in)` is the same key
                    catalog.add(transition, tile);
                    recorded += 1;
                }
            }
        }

        recorded
    }

    /// Extract and union the transitions of several maps
    pub fn extract<'m, G: TileGrid + ?Sized + 'm>(
        &self,
        maps: impl IntoIterator<Item = &'m G>,
    ) -> TransitionCatalog {
        let mut catalog = TransitionCatalog::new();
        let mut recorded = 0;
        let mut map_count = 0;
        for map in maps {
            recorded += self.extract_map(map, &mut catalog);
            map_count += 1;
        }
        info!(
            "Extracted {} transitions from {} tiles in {} maps",
            catalog.len(),
            recorded,
            map_count
        );
        let ambiguous = catalog.ambiguous_tiles();
        if !ambiguous.is_empty() {
            warn!("Tiles drawing several transitions: {:?}", ambiguous);
        }
        catalog
    }
}

/// Load a group table and sample maps from disk and extract their transitions
pub fn extract_files(
    groups_path: &Path,
    map_paths: &[PathBuf],
) -> Result<TransitionCatalog, TransitionError> {
    let groups = load_groups(groups_path)?;
    let maps = map_paths
        .iter()
        .map(|path| load_sample_map(path))
        .collect::<Result<Vec<_>, _>>()?;

    let extractor = TransitionsExtractor::new(&groups);
    Ok(extractor.extract(maps.iter().map(|m| &m.layer)))
}
