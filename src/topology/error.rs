//! Error types for topological comparisons.
//!
//! All variants indicate a caller ordering bug (e.g. the index space was
//! changed after trees were decorated) rather than a problem with the data.

use crate::model::VertexIndex;
use thiserror::Error;

/// Result type alias using [TopologyError]
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Invariant violations of the bipartition machinery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// Two leaf sets over index spaces of different size were combined
    #[error("leaf set size mismatch: {left} vs {right} (was the index map changed after decorating?)")]
    SizeMismatch { left: usize, right: usize },

    /// A vertex was queried that has no leaf set in the given table
    #[error("vertex {0} has not been decorated with a leaf set")]
    MissingLeafSet(VertexIndex),

    /// A leaf index outside of the index space was used
    #[error("leaf index {index} out of range for index space of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
}
