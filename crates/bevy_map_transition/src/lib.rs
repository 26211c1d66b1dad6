//! Group-based tile transition engine
//!
//! This crate learns how terrain groups meet from annotated sample maps and
//! keeps painted maps consistent with what it learned.
//!
//! # Features
//! - 16 corner-based transition types between two groups
//! - Transition extraction from sample maps into a catalog
//! - JSON catalog import/export
//! - Intermediate group chains for groups lacking direct transitions
//! - Neighborhood resolution after a tile is placed
//!
//! # Example
//!
//! ```rust,ignore
//! use bevy_map_transition::{
//!     MapTileTransitionModel, TransitionSettings, TransitionsExtractor,
//! };
//!
//! // Learn transitions from sample maps
//! let catalog = TransitionsExtractor::new(&groups).extract([&sample.layer]);
//!
//! // Paint water on a grass map and fix its neighborhood
//! let mut model = MapTileTransitionModel::with_catalog(TransitionSettings::default(), catalog);
//! layer.set_tile(5, 5, Some(water));
//! let changed = model.resolve(&mut layer, &groups, 5, 5);
//! ```

pub mod catalog;
pub mod error;
pub mod extract;
pub mod format;
pub mod model;
mod scratch;
pub mod settings;
pub mod transition;
pub mod transitive;

// Re-export main types at crate root
pub use catalog::TransitionCatalog;
pub use error::TransitionError;
pub use extract::{extract_files, MapTransitionExtractor, TransitionsExtractor};
pub use format::{
    export_transitions, import_transitions, parse_transitions, transitions_to_string,
    TransitionRecord, TransitionsConfig,
};
pub use model::MapTileTransitionModel;
pub use settings::{TileSelection, TransitionSettings, MAX_TRANSITIVE_DEPTH, VALID_TRANSITIONS};
pub use transition::{Corner, GroupTransition, Transition, TransitionType};
pub use transitive::TransitiveGroup;

// Re-export bevy_map_core
pub use bevy_map_core;
