//! Vertex annotations for phylogenetic trees.
//!
//! Provides the [Annotations] struct, which stores named columns of values
//! for vertices based on their indices. Values are captured by [BranchValue],
//! which is either empty, a decimal, or a text.

use crate::model::VertexIndex;
use std::collections::HashMap;
use std::fmt;

/// Shared value returned for vertices without a stored value
static EMPTY: BranchValue = BranchValue::Empty;

// =#========================================================================#=
// ANNOTATIONS
// =#========================================================================$=
/// Vertex annotations for multiple keys.
///
/// Each key owns a column parallel to the tree's vertex arena. Columns grow
/// on demand, so vertices without a stored value read as [BranchValue::Empty].
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    annotations: HashMap<String, Vec<BranchValue>>,
}

impl Annotations {
    /// Creates a new empty [Annotations].
    pub fn new() -> Self {
        Annotations {
            annotations: HashMap::new(),
        }
    }

    /// Returns all values for a given annotation key, one per vertex
    /// (possibly shorter than the arena), or [None] if the key does not exist.
    pub fn get_all_for_key(&self, key: &str) -> Option<&[BranchValue]> {
        self.annotations.get(key).map(Vec::as_slice)
    }

    /// Returns whether any value was ever stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.annotations.contains_key(key)
    }

    /// Returns the annotation value of a vertex, [BranchValue::Empty] if none.
    ///
    /// # Arguments
    /// * `key` - Annotation name (e.g. "support", "posterior")
    /// * `vertex_index` - Index of the vertex
    pub fn get(&self, key: &str, vertex_index: VertexIndex) -> &BranchValue {
        self.annotations
            .get(key)
            .and_then(|column| column.get(vertex_index))
            .unwrap_or(&EMPTY)
    }

    /// Stores an annotation value for a vertex, replacing any previous one.
    ///
    /// # Arguments
    /// * `key` - Annotation name
    /// * `vertex_index` - Index of the vertex
    /// * `value` - The [BranchValue] to store
    pub fn set(&mut self, key: &str, vertex_index: VertexIndex, value: BranchValue) {
        let column = self.annotations.entry(key.to_string()).or_default();
        if column.len() <= vertex_index {
            column.resize(vertex_index + 1, BranchValue::Empty);
        }
        column[vertex_index] = value;
    }

    /// Removes a whole column, returning it if present.
    pub fn remove_key(&mut self, key: &str) -> Option<Vec<BranchValue>> {
        self.annotations.remove(key)
    }
}

// =#========================================================================#=
// BRANCH VALUE
// =#========================================================================€=
/// A single value attached to a vertex or its incoming branch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BranchValue {
    /// No value stored
    #[default]
    Empty,
    /// For numeric values, e.g. support or frequencies
    Decimal(f64),
    /// For text values, e.g. names or aggregated value lists
    Text(String),
}

impl BranchValue {
    /// Returns `true` for [BranchValue::Empty].
    pub fn is_empty(&self) -> bool {
        matches!(self, BranchValue::Empty)
    }

    /// Returns the decimal if this is a [BranchValue::Decimal].
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            BranchValue::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text if this is a [BranchValue::Text].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            BranchValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns a numeric reading of this value.
    ///
    /// Decimals are returned as is; texts are only parsed if `parse_text`
    /// is set, and unparsable text yields `None`.
    pub fn to_number(&self, parse_text: bool) -> Option<f64> {
        match self {
            BranchValue::Decimal(value) => Some(*value),
            BranchValue::Text(text) if parse_text => text.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for BranchValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BranchValue::Empty => Ok(()),
            BranchValue::Decimal(value) => write!(f, "{}", value),
            BranchValue::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<f64> for BranchValue {
    fn from(v: f64) -> Self {
        BranchValue::Decimal(v)
    }
}

impl From<String> for BranchValue {
    fn from(v: String) -> Self {
        BranchValue::Text(v)
    }
}

impl From<&str> for BranchValue {
    fn from(v: &str) -> Self {
        BranchValue::Text(v.to_string())
    }
}

impl From<Option<f64>> for BranchValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(BranchValue::Empty, BranchValue::Decimal)
    }
}
