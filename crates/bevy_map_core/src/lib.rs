//! Core map data for the transition engine
//!
//! This crate provides the collaborator side of tile transitions:
//! - `TileGrid` - Grid accessor trait (read/write tiles, 8-neighbors)
//! - `TileLayer` - Row-major tile layer implementing `TileGrid`
//! - `GroupLookup` - Tile to terrain group lookup trait
//! - `TileGroups` - Serializable group table implementing `GroupLookup`
//! - `SampleMap` - Annotated sample maps used to learn transitions

mod error;
mod group;
mod layer;
mod sample;

pub use error::MapError;
pub use group::{
    load_groups, parse_groups, save_groups, GroupKind, GroupLookup, TileGroup, TileGroups,
};
pub use layer::{MapTile, TileGrid, TileLayer, TileRef, MAX_LAYER_SIZE, NEIGHBOR_OFFSETS};
pub use sample::{load_sample_map, parse_sample_map, save_sample_map, SampleMap};
