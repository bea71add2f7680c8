//! Error types for hierarchy construction.

use crate::place::{Dimension, PlaceCode};
use thiserror::Error;

/// Hierarchy construction errors.
#[derive(Error, Debug)]
pub enum HierarchyError {
    /// The same place code was produced twice while building the run index.
    /// A duplicate means the upstream boundary data is inconsistent
    /// (versioning artifact); walking such an index would silently pick one
    /// of the two records, so index construction aborts instead.
    #[error("{code}: duplicate place code in hierarchy index")]
    DuplicateCode { code: PlaceCode },

    /// A parent chain revisited a code it already passed through.
    #[error("{code}: parent cycle detected walking {dimension} hierarchy")]
    CycleDetected { code: PlaceCode, dimension: Dimension },

    /// A sanitise rule's pattern failed to compile.
    #[error("sanitise pattern for {entity} is invalid: {source}")]
    BadSanitisePattern {
        entity: String,
        source: regex::Error,
    },

    /// IO error reading config or checkpoint files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in config or checkpoint files.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for hierarchy operations.
pub type Result<T> = std::result::Result<T, HierarchyError>;
