//! Data model for phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Vertex] nodes, referenced by [VertexIndex]. Vertices may have any number
//! of children, so both binary trees and trees with polytomies (e.g. the
//! trifurcating root of an unrooted tree) are supported.
//!
//! # Values on vertices
//! Besides labels and branch lengths, each tree carries named
//! [Annotations], i.e. columns of [BranchValue]s. The comparison engines
//! read and write values exclusively through the [NodeData] trait, so
//! callers decide which column holds support values, conflicts, or
//! frequencies.

pub mod annotation;
pub mod node_data;
pub mod tree;
pub mod vertex;

pub use annotation::{Annotations, BranchValue};
pub use node_data::{AnnotationData, BranchLengthData, NodeData, VertexLabelData};
pub use tree::{Tree, VertexIndex};
pub use vertex::{BranchLength, Vertex};
