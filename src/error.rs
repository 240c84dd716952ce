//! Error types, one enum per concern.

use crate::types::ObjectId;

/// Geometry construction failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A polygon needs at least three vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
}

/// Scene operation failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The id does not name an object currently in the scene.
    #[error("no object with id {0:?} in scene")]
    UnknownObject(ObjectId),

    /// Pose components must be finite.
    #[error("non-finite pose: x={x}, y={y}, deg={angle_degrees}")]
    NonFinitePose {
        x: f64,
        y: f64,
        angle_degrees: f64,
    },

    /// No object is selected.
    #[error("no object selected")]
    NoSelection,

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Configuration loading failures.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Table import/export failures.
#[derive(thiserror::Error, Debug)]
pub enum ExchangeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Export was requested for a scene with no objects.
    #[error("scene has no objects to export")]
    EmptyScene,
}
