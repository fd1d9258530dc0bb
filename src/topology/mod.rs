//! Bipartition machinery shared by the comparison engines.
//!
//! # Overview
//! Cutting a branch of a tree splits its leaves into two parts, a
//! bipartition. Two trees on (partially) the same leaves are compared by
//! encoding every vertex's clade as a [LeafSet] over a common
//! [LeafIndexMap], and testing these bit vectors for equality, containment
//! and incompatible overlap.
//!
//! - [LeafSet]: bit vector with containment, overlap and conflict tests
//! - [LeafIndexMap]: leaf identifier to bit position
//! - [TopologicalCalculator]: decoration of trees and bipartition search
//! - [TopologyError]: invariant violations, e.g. mixing index spaces

pub mod calculator;
pub mod error;
pub mod leaf_index_map;
pub mod leaf_set;

pub use calculator::{MatchDirection, NodeInfo, TopologicalCalculator, TreeLeafSets};
pub use error::TopologyError;
pub use leaf_index_map::LeafIndexMap;
pub use leaf_set::{LeafSet, LeafSetRelation};
