//! Resolver settings
//!
//! Settings are plain TOML, every field optional:
//!
//! ```toml
//! valid_transitions = 8
//! max_transitive_depth = 4
//!
//! [tile_selection]
//! mode = "random"
//! seed = 42
//! ```

use crate::TransitionError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of distinct transitions two groups need to be painted directly
pub const VALID_TRANSITIONS: usize = 8;

/// Default nesting limit for intermediate group substitution
pub const MAX_TRANSITIVE_DEPTH: usize = 4;

/// How a tile is picked when several render the same transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TileSelection {
    /// Lowest tile reference, deterministic
    #[default]
    First,
    /// Seeded random pick for visual variety
    Random { seed: u64 },
}

/// Configuration of the transition model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    /// Distinct transitions required between two groups before they are
    /// considered directly paintable
    pub valid_transitions: usize,
    /// Maximum nesting of intermediate group substitutions during resolve
    pub max_transitive_depth: usize,
    pub tile_selection: TileSelection,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            valid_transitions: VALID_TRANSITIONS,
            max_transitive_depth: MAX_TRANSITIVE_DEPTH,
            tile_selection: TileSelection::First,
        }
    }
}

impl TransitionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tile_selection(mut self, tile_selection: TileSelection) -> Self {
        self.tile_selection = tile_selection;
        self
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, TransitionError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, TransitionError> {
        Ok(toml::from_str(content)?)
    }
}
