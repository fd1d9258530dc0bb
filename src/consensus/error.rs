use crate::topology::TopologyError;
use std::error::Error;
use thiserror::Error;

/// Failures of a split count. Either aborts the count before any value is
/// written onto the base tree.
#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// The tree stream failed to deliver tree number `tree` (0-based)
    #[error("failed to read tree {tree} from stream: {source}")]
    Stream {
        tree: usize,
        source: Box<dyn Error + Send + Sync>,
    },
}
