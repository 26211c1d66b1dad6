//! Copy-on-write overlay over a caller grid

use bevy_map_core::{MapTile, TileGrid, TileRef};
use std::collections::BTreeMap;

/// Pending writes on top of a read-only grid.
///
/// Reads see the pending writes first. Nothing reaches the base grid until
/// the caller applies [`ScratchGrid::into_changes`].
pub(crate) struct ScratchGrid<'g, G: TileGrid + ?Sized> {
    base: &'g G,
    writes: BTreeMap<(i32, i32), Option<TileRef>>,
}

impl<'g, G: TileGrid + ?Sized> ScratchGrid<'g, G> {
    pub(crate) fn new(base: &'g G) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Cells whose final reference differs from the base grid, ordered by position
    pub(crate) fn into_changes(self) -> Vec<MapTile> {
        let base = self.base;
        self.writes
            .into_iter()
            .filter_map(|((x, y), tile)| {
                let tile = tile?;
                (base.tile(x, y) != Some(tile)).then_some(MapTile::new(x, y, tile))
            })
            .collect()
    }
}

impl<G: TileGrid + ?Sized> TileGrid for ScratchGrid<'_, G> {
    fn width(&self) -> u32 {
        self.base.width()
    }

    fn height(&self) -> u32 {
        self.base.height()
    }

    fn tile(&self, x: i32, y: i32) -> Option<TileRef> {
        match self.writes.get(&(x, y)) {
            Some(tile) => *tile,
            None => self.base.tile(x, y),
        }
    }

    fn set_tile(&mut self, x: i32, y: i32, tile: Option<TileRef>) -> bool {
        if !self.base.contains(x, y) {
            return false;
        }
        self.writes.insert((x, y), tile);
        true
    }
}
