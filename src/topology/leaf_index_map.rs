//! Shared leaf index space of a comparison.
//!
//! - `LeafIndexMap`: bidirectional mapping between leaf identifiers and the
//!   bit positions of [LeafSet](crate::topology::LeafSet)s.

use std::collections::HashMap;
use std::fmt;

// =#========================================================================#=
// LEAF INDEX MAP
// =#========================================================================#=
/// Maps leaf identifiers (strings) to compact indices in `[0, n)`.
///
/// All trees compared in one session share a single map, so the same
/// identifier always refers to the same bit. Identifiers are deduplicated;
/// inserting the same identifier twice returns the same index.
///
/// # Example
/// ```
/// use splitwick::topology::LeafIndexMap;
///
/// let mut leaves = LeafIndexMap::new();
///
/// let idx_a = leaves.get_or_insert("A");  // idx_a = 0
/// let idx_b = leaves.get_or_insert("B");  // idx_b = 1
/// let idx_a2 = leaves.get_or_insert("A"); // idx_a2 = 0 (deduplicated)
///
/// assert_eq!(idx_a, idx_a2);
/// assert_eq!(leaves.label(idx_b), Some("B"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LeafIndexMap {
    /// Identifiers in index order
    labels: Vec<String>,
    /// Map from identifier to its index
    map: HashMap<String, usize>,
}

impl LeafIndexMap {
    /// Creates a new empty map.
    pub fn new() -> Self {
        LeafIndexMap::default()
    }

    /// Creates a map assigning indices to `labels` in iteration order,
    /// skipping duplicates.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = LeafIndexMap::new();
        for label in labels {
            map.get_or_insert(label.as_ref());
        }
        map
    }

    /// Gets the index for an identifier, inserting it if it doesn't exist.
    ///
    /// # Returns
    /// The index associated with this identifier
    pub fn get_or_insert(&mut self, label: &str) -> usize {
        if let Some(&index) = self.map.get(label) {
            return index;
        }
        let index = self.labels.len();
        self.labels.push(label.to_string());
        self.map.insert(label.to_string(), index);
        index
    }

    /// Retrieves the index for a given identifier, `None` if unknown.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.map.get(label).copied()
    }

    /// Retrieves the identifier for a given index, `None` if out of range.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Checks if an identifier exists in the map.
    pub fn contains_label(&self, label: &str) -> bool {
        self.map.contains_key(label)
    }

    /// Returns the size of the index space.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if no identifier is stored.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the identifiers in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Removes all identifiers for which `keep` returns `false` and
    /// re-packs the remaining ones into `[0, n')`, preserving their order.
    ///
    /// # Returns
    /// The removed identifiers, in their former index order
    pub fn retain_labels<F>(&mut self, mut keep: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let (kept, removed): (Vec<String>, Vec<String>) =
            self.labels.drain(..).partition(|label| keep(label));

        self.map.clear();
        for (index, label) in kept.iter().enumerate() {
            self.map.insert(label.clone(), index);
        }
        self.labels = kept;

        removed
    }
}

impl fmt::Display for LeafIndexMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "LeafIndexMap ({} leaves):", self.labels.len())?;
        for (index, label) in self.labels.iter().enumerate() {
            writeln!(f, "  [{}] {}", index, label)?;
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for LeafIndexMap {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.labels[index]
    }
}
