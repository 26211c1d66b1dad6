use crate::TransitionType;
use bevy_map_core::MapError;
use thiserror::Error;

/// Errors that can occur when loading transitions or their inputs
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Unknown transition name: {0}")]
    UnknownTransitionName(String),
    #[error("Missing group name: {0}")]
    MissingGroup(&'static str),
    #[error("{kind} covers a single group, got '{group_in}' and '{group_out}'")]
    UniformGroupMismatch {
        kind: TransitionType,
        group_in: String,
        group_out: String,
    },
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to parse settings: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid map data: {0}")]
    Map(#[from] MapError),
}
