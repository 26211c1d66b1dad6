//! Runtime transition resolver
//!
//! After a tile is placed, [`MapTileTransitionModel::resolve`] rewrites its
//! neighbors so that every shared corner agrees on which group owns it.
//!
//! Resolution runs in three steps, all on a scratch overlay of the grid:
//!
//! 1. Neighbors of a group only reachable through intermediate groups are
//!    first turned into the intermediate group (recursively, bounded by
//!    `max_transitive_depth`).
//! 2. Every neighbor gets the transition combining its own corners with the
//!    corners it shares with the placed tile.
//! 3. Neighbors that had no matching tile but could take the placed tile
//!    itself are resolved once more. Propagation stops after this second ring.
//!
//! Only the final differences are written to the caller grid.

use crate::scratch::ScratchGrid;
use crate::{
    import_transitions, GroupTransition, TileSelection, Transition, TransitionCatalog,
    TransitionError, TransitionSettings, TransitionType, TransitiveGroup,
};
use bevy_map_core::{GroupLookup, MapTile, TileGrid, TileRef, NEIGHBOR_OFFSETS};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Catalog-backed resolver keeping transitions consistent around edited tiles
#[derive(Debug, Clone)]
pub struct MapTileTransitionModel {
    settings: TransitionSettings,
    catalog: TransitionCatalog,
    group_links: HashSet<GroupTransition>,
    transitive: TransitiveGroup,
    rng: Option<SmallRng>,
}

impl Default for MapTileTransitionModel {
    fn default() -> Self {
        Self::new(TransitionSettings::default())
    }
}

impl MapTileTransitionModel {
    pub fn new(settings: TransitionSettings) -> Self {
        let rng = match settings.tile_selection {
            TileSelection::First => None,
            TileSelection::Random { seed } => Some(SmallRng::seed_from_u64(seed)),
        };
        Self {
            settings,
            catalog: TransitionCatalog::new(),
            group_links: HashSet::new(),
            transitive: TransitiveGroup::default(),
            rng,
        }
    }

    /// Create a model and load a catalog into it
    pub fn with_catalog(settings: TransitionSettings, catalog: TransitionCatalog) -> Self {
        let mut model = Self::new(settings);
        model.load_transitions(catalog);
        model
    }

    /// Replace the catalog, rebuilding group links and transitive chains
    pub fn load_transitions(&mut self, catalog: TransitionCatalog) {
        self.group_links = catalog.group_links();
        self.transitive = TransitiveGroup::new(&catalog, self.settings.valid_transitions);
        self.catalog = catalog;
        info!(
            "Loaded {} transitions, {} group links, {} transitive chains",
            self.catalog.len(),
            self.group_links.len(),
            self.transitive.chains().count()
        );
    }

    /// Replace the catalog with the content of a transitions file
    pub fn load_transitions_file(&mut self, path: &Path) -> Result<(), TransitionError> {
        let catalog = import_transitions(path)?;
        self.load_transitions(catalog);
        Ok(())
    }

    pub fn settings(&self) -> &TransitionSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &TransitionCatalog {
        &self.catalog
    }

    /// Group pairs having at least one transition tile, both directions
    pub fn group_links(&self) -> &HashSet<GroupTransition> {
        &self.group_links
    }

    /// First recorded transition of a tile touching `group`
    pub fn transition(&self, tile: TileRef, group: &str) -> Option<&Transition> {
        self.catalog
            .transitions_of(tile)
            .iter()
            .find(|t| t.group_in() == group || t.group_out() == group)
    }

    /// Intermediate hops between two groups, empty when direct or unreachable
    pub fn transitives(&self, group_in: &str, group_out: &str) -> &[GroupTransition] {
        self.transitive.transitives(group_in, group_out)
    }

    /// Tiles able to render a transition, through the middle group when the
    /// two groups are one hop apart
    pub fn tiles(&self, transition: &Transition) -> Vec<TileRef> {
        match self.catalog.tiles(transition) {
            Some(tiles) => tiles.iter().copied().collect(),
            None => self
                .transitive
                .direct_transitive_tiles(&self.catalog, transition)
                .into_iter()
                .collect(),
        }
    }

    /// Rewrite the neighborhood of the tile at `(x, y)`.
    ///
    /// Returns the cells whose reference changed, ordered by position.
    /// An empty or out-of-grid position changes nothing.
    pub fn resolve<G: TileGrid + ?Sized, L: GroupLookup + ?Sized>(
        &mut self,
        grid: &mut G,
        groups: &L,
        x: i32,
        y: i32,
    ) -> Vec<MapTile> {
        let Some(placed) = grid.tile_at(x, y) else {
            return Vec::new();
        };

        let changes = {
            let mut scratch = ScratchGrid::new(&*grid);
            self.resolve_in(&mut scratch, groups, placed, 0);
            scratch.into_changes()
        };

        for change in &changes {
            grid.set_tile(change.x, change.y, Some(change.tile));
        }
        debug!("Resolved tile {} at ({}, {}): {} cells changed", placed.tile, x, y, changes.len());
        changes
    }

    fn resolve_in<G: TileGrid + ?Sized, L: GroupLookup + ?Sized>(
        &mut self,
        grid: &mut ScratchGrid<'_, G>,
        groups: &L,
        placed: MapTile,
        depth: usize,
    ) {
        if depth < self.settings.max_transitive_depth {
            self.check_transitives(grid, groups, placed, depth);
        }

        let mut to_resolve = Vec::new();
        self.resolve_neighbors(grid, groups, placed, &mut to_resolve);

        let mut to_resolve_after = Vec::new();
        for queued in to_resolve {
            if let Some(queued) = grid.tile_at(queued.x, queued.y) {
                self.resolve_neighbors(grid, groups, queued, &mut to_resolve_after);
            }
        }

        if !to_resolve_after.is_empty() {
            warn!(
                "{} tiles around ({}, {}) still need resolving",
                to_resolve_after.len(),
                placed.x,
                placed.y
            );
        }
    }

    /// Turn neighbors only reachable through intermediate groups into the
    /// first intermediate group, resolving around each of them.
    fn check_transitives<G: TileGrid + ?Sized, L: GroupLookup + ?Sized>(
        &mut self,
        grid: &mut ScratchGrid<'_, G>,
        groups: &L,
        placed: MapTile,
        depth: usize,
    ) {
        let Some(group) = groups.group(placed.tile) else {
            return;
        };

        for (dx, dy) in NEIGHBOR_OFFSETS {
            let Some(neighbor) = grid.tile_at(placed.x + dx, placed.y + dy) else {
                continue;
            };
            let Some(neighbor_group) = groups.group(neighbor.tile) else {
                continue;
            };
            if neighbor_group == group {
                continue;
            }
            let Some(middle) = self
                .transitive
                .transitives(group, neighbor_group)
                .first()
                .map(|hop| hop.group_out.clone())
            else {
                continue;
            };

            // Already drawing the edge between both groups
            let direct = self
                .catalog
                .transitions_of(neighbor.tile)
                .iter()
                .any(|t| !t.is_self_loop() && t.joins(group, neighbor_group));
            if direct {
                continue;
            }

            let center = Transition::new(TransitionType::Center, middle.as_str(), middle.as_str());
            let Some(center_tile) = self.select_tile(&center) else {
                debug!("No center tile for intermediate group {}", middle);
                continue;
            };

            // The placed cell only stands in for the middle group while the
            // neighbor is resolved
            grid.set_tile(placed.x, placed.y, Some(center_tile));
            grid.set_tile(neighbor.x, neighbor.y, Some(center_tile));
            let substitute = MapTile::new(neighbor.x, neighbor.y, center_tile);
            self.resolve_in(grid, groups, substitute, depth + 1);
            grid.set_tile(placed.x, placed.y, Some(placed.tile));
            debug!(
                "Neighbor ({}, {}) of {} goes through {}",
                neighbor.x, neighbor.y, group, middle
            );
        }
    }

    /// Rewrite the 8 neighbors of `placed`. Neighbors taking a copy of the
    /// placed tile are pushed to `to_resolve`.
    fn resolve_neighbors<T: TileGrid + ?Sized, L: GroupLookup + ?Sized>(
        &mut self,
        grid: &mut T,
        groups: &L,
        placed: MapTile,
        to_resolve: &mut Vec<MapTile>,
    ) {
        let Some(group) = groups.group(placed.tile) else {
            return;
        };

        for (dx, dy) in NEIGHBOR_OFFSETS {
            let Some(neighbor) = grid.tile_at(placed.x + dx, placed.y + dy) else {
                continue;
            };
            let Some(neighbor_group) = groups.group(neighbor.tile) else {
                continue;
            };
            let Some(outer) =
                self.outer_group(placed.tile, group, neighbor.tile, neighbor_group)
            else {
                continue;
            };

            let placed_type = self.oriented_type(placed.tile, group, &outer);
            let neighbor_type = self.oriented_type(neighbor.tile, group, &outer);
            let (Some(placed_type), Some(neighbor_type)) = (placed_type, neighbor_type) else {
                continue;
            };

            let kind = TransitionType::combine(placed_type, neighbor_type, (dx, dy));
            let transition = Transition::new(kind, group, outer.as_str());
            if self.catalog.renders(neighbor.tile, &transition) {
                continue;
            }

            if let Some(tile) = self.select_tile(&transition) {
                debug!("({}, {}) -> {} for {}", neighbor.x, neighbor.y, tile, transition);
                grid.set_tile(neighbor.x, neighbor.y, Some(tile));
                continue;
            }

            // No tile draws the transition: a plain neighbor may take the
            // placed tile and be resolved on the next ring
            let center = Transition::new(TransitionType::Center, neighbor_group, neighbor_group);
            let linked = neighbor_group == group
                || self.group_links.contains(&GroupTransition::new(group, neighbor_group));
            if linked && self.catalog.renders(neighbor.tile, &center) {
                debug!(
                    "({}, {}) -> {} deferred, no tile for {}",
                    neighbor.x, neighbor.y, placed.tile, transition
                );
                grid.set_tile(neighbor.x, neighbor.y, Some(placed.tile));
                to_resolve.push(MapTile::new(neighbor.x, neighbor.y, placed.tile));
            }
        }
    }

    /// Outer group of the transition between a placed tile and a neighbor.
    ///
    /// Same-group neighbors fall back to the other group of the neighbor's
    /// own transition, then of the placed tile's.
    fn outer_group(
        &self,
        placed: TileRef,
        group: &str,
        neighbor: TileRef,
        neighbor_group: &str,
    ) -> Option<String> {
        if neighbor_group != group {
            return Some(neighbor_group.to_string());
        }
        self.other_group(neighbor, group)
            .or_else(|| self.other_group(placed, group))
    }

    fn other_group(&self, tile: TileRef, group: &str) -> Option<String> {
        self.catalog
            .transitions_of(tile)
            .iter()
            .filter(|t| !t.is_self_loop())
            .find_map(|t| t.other_group(group))
            .map(str::to_string)
    }

    fn oriented_type(&self, tile: TileRef, inner: &str, outer: &str) -> Option<TransitionType> {
        self.catalog
            .transitions_of(tile)
            .iter()
            .find_map(|t| t.oriented(inner, outer))
    }

    fn select_tile(&mut self, transition: &Transition) -> Option<TileRef> {
        let candidates = self.tiles(transition);
        if candidates.is_empty() {
            return None;
        }
        let index = match self.rng.as_mut() {
            Some(rng) => rng.gen_range(0..candidates.len()),
            None => 0,
        };
        Some(candidates[index])
    }
}
