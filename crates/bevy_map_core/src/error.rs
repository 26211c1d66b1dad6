use thiserror::Error;

/// Errors that can occur when loading map data
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid map format: {0}")]
    InvalidFormat(String),
    #[error("Layer size {width}x{height} is too large")]
    LayerTooLarge { width: u32, height: u32 },
}
