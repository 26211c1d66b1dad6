//! Tile layers and the grid accessor trait

use crate::MapError;
use serde::{Deserialize, Serialize};

/// Largest width or height a layer may have, so every coordinate fits an `i32`
pub const MAX_LAYER_SIZE: u32 = i32::MAX as u32;

/// Opaque identifier of a tile's visual variant
pub type TileRef = u32;

/// Neighbor offsets in resolution order.
/// Y-UP coordinate system: +Y is up (above), -Y is down (below)
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),  // Left
    (1, 0),   // Right
    (0, 1),   // Top
    (0, -1),  // Bottom
    (-1, 1),  // TopLeft
    (1, 1),   // TopRight
    (-1, -1), // BottomLeft
    (1, -1),  // BottomRight
];

/// A tile reference located on a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapTile {
    pub x: i32,
    pub y: i32,
    pub tile: TileRef,
}

impl MapTile {
    pub const fn new(x: i32, y: i32, tile: TileRef) -> Self {
        Self { x, y, tile }
    }

    /// Position of this tile
    pub const fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// Read/write access to a 2D grid of tile references.
///
/// Coordinates outside the grid are never an error: reads return `None`
/// and writes are ignored.
pub trait TileGrid {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Tile reference at a position, `None` for empty cells or outside the grid
    fn tile(&self, x: i32, y: i32) -> Option<TileRef>;

    /// Write a tile reference, returns `false` when the position is outside the grid
    fn set_tile(&mut self, x: i32, y: i32, tile: Option<TileRef>) -> bool;

    /// Check whether a position lies inside the grid
    fn contains(&self, x: i32, y: i32) -> bool {
        u32::try_from(x).is_ok_and(|x| x < self.width())
            && u32::try_from(y).is_ok_and(|y| y < self.height())
    }

    /// Located tile at a position, if any
    fn tile_at(&self, x: i32, y: i32) -> Option<MapTile> {
        self.tile(x, y).map(|tile| MapTile::new(x, y, tile))
    }

    /// Present neighbors around a position, in [`NEIGHBOR_OFFSETS`] order
    fn neighbors8(&self, x: i32, y: i32) -> Vec<MapTile> {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|(dx, dy)| self.tile_at(x + dx, y + dy))
            .collect()
    }
}

/// A single tile layer with row-major tile storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Tile data - None means empty, Some(idx) is a tile reference
    pub tiles: Vec<Option<TileRef>>,
}

/// Number of cells of a `width` x `height` layer, `None` when too large
fn cell_count(width: u32, height: u32) -> Option<usize> {
    if width > MAX_LAYER_SIZE || height > MAX_LAYER_SIZE {
        return None;
    }
    // Row-major indices are computed in u32
    width.checked_mul(height).and_then(|cells| usize::try_from(cells).ok())
}

impl TileLayer {
    /// Create a new empty layer
    pub fn new(name: String, width: u32, height: u32) -> Result<Self, MapError> {
        let size = cell_count(width, height).ok_or(MapError::LayerTooLarge { width, height })?;
        Ok(Self {
            name,
            width,
            height,
            tiles: vec![None; size],
        })
    }

    /// Create a layer with every cell set to the same tile
    pub fn filled(name: String, width: u32, height: u32, tile: TileRef) -> Result<Self, MapError> {
        let size = cell_count(width, height).ok_or(MapError::LayerTooLarge { width, height })?;
        Ok(Self {
            name,
            width,
            height,
            tiles: vec![Some(tile); size],
        })
    }

    /// Create a layer from rows written top-down, as they read in source code.
    /// Returns `None` if rows have different lengths.
    pub fn from_rows(name: String, rows: &[Vec<Option<TileRef>>]) -> Option<Self> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }

        let height = u32::try_from(rows.len()).ok()?;
        let mut layer = Self::new(name, u32::try_from(width).ok()?, height).ok()?;
        for (row, cells) in rows.iter().enumerate() {
            // First row is the top of the map
            let y = (height as usize - 1 - row) as i32;
            for (x, cell) in cells.iter().enumerate() {
                layer.set_tile(x as i32, y, *cell);
            }
        }
        Some(layer)
    }

    /// Row-major index of a position, `None` outside the layer
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        let cell = (y as u32).checked_mul(self.width)?.checked_add(x as u32)?;
        usize::try_from(cell).ok()
    }

    /// Check that the size is addressable and the tile vector matches it
    pub fn is_consistent(&self) -> bool {
        cell_count(self.width, self.height) == Some(self.tiles.len())
    }

    /// Iterate over all non-empty tiles
    pub fn iter(&self) -> impl Iterator<Item = MapTile> + '_ {
        self.tiles.iter().enumerate().filter_map(move |(idx, tile)| {
            let x = (idx as u32 % self.width.max(1)) as i32;
            let y = (idx as u32 / self.width.max(1)) as i32;
            tile.map(|t| MapTile::new(x, y, t))
        })
    }
}

impl TileGrid for TileLayer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn tile(&self, x: i32, y: i32) -> Option<TileRef> {
        self.index(x, y)
            .and_then(|idx| self.tiles.get(idx).copied().flatten())
    }

    fn set_tile(&mut self, x: i32, y: i32, tile: Option<TileRef>) -> bool {
        match self.index(x, y).and_then(|idx| self.tiles.get_mut(idx)) {
            Some(cell) => {
                *cell = tile;
                true
            }
            None => false,
        }
    }
}
