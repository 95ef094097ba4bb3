use crate::map::TerrainId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrowthError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("Config file I/O failed: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    // Geometry errors
    #[error("Growth boundary needs at least 3 vertices, got {vertices}")]
    DegeneratePolygon { vertices: usize },

    #[error("Ring boundaries differ in length: inner has {inner} vertices, outer has {outer}")]
    MismatchedRingLength { inner: usize, outer: usize },

    // Placement errors
    #[error("Invalid placement rule for terrain '{terrain}': {reason}")]
    InvalidRuleReference { terrain: TerrainId, reason: String },
}

/// Result type alias for all operations
pub type GrowthResult<T> = Result<T, GrowthError>;
