//! Splitwick is a library to compare phylogenetic trees by their
//! bipartitions (splits).
//!
//! Cutting a branch of a tree divides its leaves into two parts. Trees on
//! the same leaves can therefore be compared branch by branch, independent
//! of how they are drawn or rooted. Core functionality provided:
//! - Support transfer: copy support values (e.g. bootstrap percentages or
//!   posterior probabilities) from a source tree onto the matching branches
//!   of a target tree with a different topology, and mark branches that
//!   conflict with the source. See [crate::support].
//! - Split frequencies: count how many trees of a (possibly huge, lazily
//!   read) stream contain each split of a base tree, optionally normalized
//!   to percentages or proportions. See [crate::consensus].
//! - Bipartition machinery: leaf sets as bit vectors, best match and
//!   conflict search between trees. See [crate::topology].
//! - Tree model: arena-based multifurcating [Tree] with per-vertex
//!   annotations and the [NodeData](model::NodeData) adapters through which
//!   all values are read and written. See [crate::model].
//! - Newick: parser and writer for (extended) Newick strings, including
//!   `[&R]`/`[&U]` rooting comments. See [crate::newick].
//!
//! Logging uses [tracing]; install a subscriber to see what the engines do.
//!
//! # Usage patterns
//! 1. The quick functions [transfer_support] and [count_splits] use the
//!    default configuration: leaves are identified by label, source support
//!    values are read from internal vertex labels, and results are written
//!    to the annotations `"support"`, `"conflict"`, and `"frequency"`.
//! 2. Configure [SupportTransfer](support::SupportTransfer) with
//!    [TransferOptions](support::TransferOptions), or
//!    [SplitCounter](consensus::SplitCounter) with
//!    [ConsensusOptions](consensus::ConsensusOptions), for full control.
//!
//! ## Example
//! ```
//! use splitwick::model::{AnnotationData, NodeData};
//! use splitwick::{parse_newick_str, transfer_support};
//!
//! let bootstrap = parse_newick_str("(((A,B)100,C)72,D,E);").unwrap();
//! let mut ml_tree = parse_newick_str("(((A,B),C),(D,E));").unwrap();
//!
//! let report = transfer_support(&bootstrap, &mut ml_tree).unwrap();
//! assert_eq!(report.matched, 3);
//!
//! let support = AnnotationData::new("support");
//! let abc = ml_tree.root().children()[0];
//! assert_eq!(support.decimal(&ml_tree, abc), Some(72.0));
//! ```

pub mod consensus;
pub mod model;
pub mod newick;
pub mod parser;
pub mod support;
pub mod topology;

pub use model::Tree;

use crate::consensus::{ConsensusError, ConsensusReport, SplitCounter};
use crate::newick::NewickParser;
use crate::parser::ParsingError;
use crate::support::{SupportTransfer, TransferReport};
use crate::topology::TopologyError;
use std::error::Error;

// =#========================================================================#=
// QUICK API
// =#========================================================================$=
/// Parses a single Newick string with default settings.
pub fn parse_newick_str(newick: &str) -> Result<Tree, ParsingError> {
    NewickParser::new().parse_str(newick)
}

/// Transfers support values from `source` onto `target` with default
/// [TransferOptions](support::TransferOptions).
pub fn transfer_support(source: &Tree, target: &mut Tree) -> Result<TransferReport, TopologyError> {
    SupportTransfer::default().transfer(source, target)
}

/// Counts the splits of `base` in `trees` with default
/// [ConsensusOptions](consensus::ConsensusOptions), writing raw counts.
pub fn count_splits<I, E>(base: &mut Tree, trees: I) -> Result<ConsensusReport, ConsensusError>
where
    I: IntoIterator<Item = Result<Tree, E>>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    SplitCounter::default().count(base, trees)
}
