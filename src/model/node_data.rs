//! Adapters for reading and writing values on vertices.
//!
//! The comparison engines never assume where a value lives. They go through
//! the [NodeData] trait, which maps a `(tree, vertex)` pair onto a
//! [BranchValue]. Built-in implementations:
//! * [VertexLabelData] - the vertex label, i.e. leaf names and Newick
//!   internal vertex labels (commonly bootstrap values)
//! * [AnnotationData] - a named column of the tree's annotations
//! * [BranchLengthData] - the length of the incoming branch

use crate::model::annotation::BranchValue;
use crate::model::tree::{Tree, VertexIndex};
use crate::model::vertex::BranchLength;
use std::fmt::Debug;

// =#========================================================================#=
// NODE DATA (trait)
// =#========================================================================T=
/// Column-style accessor for a value stored on vertices of a [Tree].
///
/// Implementors provide [`value`](Self::value) and
/// [`set_value`](Self::set_value); the typed accessors are derived from those.
pub trait NodeData: Debug {
    /// Short name of the column, used in log output.
    fn name(&self) -> &str;

    /// Returns the value stored for `vertex`.
    fn value(&self, tree: &Tree, vertex: VertexIndex) -> BranchValue;

    /// Stores `value` for `vertex`; [BranchValue::Empty] clears it.
    fn set_value(&self, tree: &mut Tree, vertex: VertexIndex, value: BranchValue);

    /// Returns whether the value of `vertex` is a decimal.
    fn is_decimal(&self, tree: &Tree, vertex: VertexIndex) -> bool {
        matches!(self.value(tree, vertex), BranchValue::Decimal(_))
    }

    /// Returns the decimal value of `vertex`, if it is one.
    fn decimal(&self, tree: &Tree, vertex: VertexIndex) -> Option<f64> {
        self.value(tree, vertex).as_decimal()
    }

    /// Stores a decimal value for `vertex`.
    fn set_decimal(&self, tree: &mut Tree, vertex: VertexIndex, value: f64) {
        self.set_value(tree, vertex, BranchValue::Decimal(value));
    }

    /// Returns whether the value of `vertex` is a text.
    fn is_text(&self, tree: &Tree, vertex: VertexIndex) -> bool {
        matches!(self.value(tree, vertex), BranchValue::Text(_))
    }

    /// Returns the text value of `vertex`, if it is one.
    fn text(&self, tree: &Tree, vertex: VertexIndex) -> Option<String> {
        match self.value(tree, vertex) {
            BranchValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Stores a text value for `vertex`.
    fn set_text(&self, tree: &mut Tree, vertex: VertexIndex, value: String) {
        self.set_value(tree, vertex, BranchValue::Text(value));
    }
}

// =#========================================================================#=
// VERTEX LABEL
// =#========================================================================$=
/// Reads and writes the label of a vertex.
///
/// Labels are always text; decimals are written in their shortest
/// [Display](std::fmt::Display) form.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexLabelData;

impl NodeData for VertexLabelData {
    fn name(&self) -> &str {
        "label"
    }

    fn value(&self, tree: &Tree, vertex: VertexIndex) -> BranchValue {
        tree[vertex]
            .label()
            .map_or(BranchValue::Empty, BranchValue::from)
    }

    fn set_value(&self, tree: &mut Tree, vertex: VertexIndex, value: BranchValue) {
        let label = match value {
            BranchValue::Empty => None,
            other => Some(other.to_string()),
        };
        tree[vertex].set_label(label);
    }
}

// =#========================================================================#=
// ANNOTATION
// =#========================================================================$=
/// Reads and writes a named column of the tree's
/// [Annotations](crate::model::Annotations).
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationData {
    key: String,
}

impl AnnotationData {
    /// Creates an adapter for the annotation column `key`.
    pub fn new(key: impl Into<String>) -> Self {
        AnnotationData { key: key.into() }
    }

    /// Returns the annotation key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl NodeData for AnnotationData {
    fn name(&self) -> &str {
        &self.key
    }

    fn value(&self, tree: &Tree, vertex: VertexIndex) -> BranchValue {
        tree.annotations().get(&self.key, vertex).clone()
    }

    fn set_value(&self, tree: &mut Tree, vertex: VertexIndex, value: BranchValue) {
        tree.annotations_mut().set(&self.key, vertex, value);
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================$=
/// Reads and writes the length of the incoming branch.
///
/// Only non-negative, finite decimals can be stored; anything else clears
/// the branch length.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchLengthData;

impl NodeData for BranchLengthData {
    fn name(&self) -> &str {
        "branch length"
    }

    fn value(&self, tree: &Tree, vertex: VertexIndex) -> BranchValue {
        tree[vertex]
            .branch_length()
            .map_or(BranchValue::Empty, |length| BranchValue::Decimal(*length))
    }

    fn set_value(&self, tree: &mut Tree, vertex: VertexIndex, value: BranchValue) {
        let length = value.as_decimal().and_then(BranchLength::try_new);
        tree[vertex].set_branch_length(length);
    }
}
