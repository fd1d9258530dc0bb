//! Support value transfer between trees of different topology.
//!
//! [SupportTransfer] maps the values of a source tree (e.g. bootstrap values
//! of a consensus tree) onto the matching branches of a target tree (e.g. a
//! maximum likelihood tree), recording conflicts where the topologies
//! disagree.

pub mod handler;
pub mod options;
pub mod transfer;

pub use handler::{
    EquivalentBranchHandler, EquivalentBranchOutcome, EquivalentBranchStrategy, FirstHandler,
    ListHandler, MaximumHandler,
};
pub use options::TransferOptions;
pub use transfer::{SupportTransfer, TransferReport};
