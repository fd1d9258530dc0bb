//! Bipartition search, matching and conflict detection between trees.
//!
//! A [TopologicalCalculator] owns the [LeafIndexMap] of one comparison
//! session. Trees are decorated with [LeafSet]s into a [TreeLeafSets] side
//! table, which is then queried for the vertices of another tree that match
//! or conflict with a given bipartition.
//!
//! Usage order within a session:
//! 1. [build_index_map](TopologicalCalculator::build_index_map)
//! 2. optionally [restrict_index_map_to_shared_leaves](TopologicalCalculator::restrict_index_map_to_shared_leaves)
//! 3. [decorate](TopologicalCalculator::decorate) every tree involved
//! 4. [find_best_matches](TopologicalCalculator::find_best_matches) and
//!    [find_highest_conflict](TopologicalCalculator::find_highest_conflict)
//!
//! Changing the index map after step 3 makes the decorated tables
//! incompatible with new ones; the next comparison then fails with
//! [TopologyError::SizeMismatch].

use crate::model::{BranchValue, NodeData, Tree, VertexIndex};
use crate::topology::error::{Result, TopologyError};
use crate::topology::leaf_index_map::LeafIndexMap;
use crate::topology::leaf_set::LeafSet;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

// =#========================================================================#=
// TREE LEAF SETS
// =#========================================================================$=
/// Leaf sets of the vertices of one tree, indexed by [VertexIndex].
///
/// Created by [TopologicalCalculator::decorate] and owned by the caller, so
/// a table never outlives the session it was built for by accident.
#[derive(Debug, Clone)]
pub struct TreeLeafSets {
    sets: Vec<Option<LeafSet>>,
    size: usize,
}

impl TreeLeafSets {
    /// Returns the leaf set of `vertex`.
    ///
    /// # Errors
    /// [TopologyError::MissingLeafSet] if `vertex` was not decorated.
    pub fn get(&self, vertex: VertexIndex) -> Result<&LeafSet> {
        self.sets
            .get(vertex)
            .and_then(Option::as_ref)
            .ok_or(TopologyError::MissingLeafSet(vertex))
    }

    /// Returns whether `vertex` has a leaf set.
    pub fn contains(&self, vertex: VertexIndex) -> bool {
        matches!(self.sets.get(vertex), Some(Some(_)))
    }

    /// Returns the size of the index space the sets were built for.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Iterates over all decorated vertices and their leaf sets.
    pub fn iter(&self) -> impl Iterator<Item = (VertexIndex, &LeafSet)> {
        self.sets
            .iter()
            .enumerate()
            .filter_map(|(vertex, set)| set.as_ref().map(|set| (vertex, set)))
    }
}

// =#========================================================================#=
// NODE INFO
// =#========================================================================$=
/// Whether a match was found for the queried bipartition itself or for its
/// complement (the other side of the same split).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDirection {
    Direct,
    Complement,
}

/// How well a vertex of a searched tree matches a queried bipartition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeInfo {
    /// The matching vertex
    pub vertex: VertexIndex,
    /// Leaves below `vertex` not part of the queried side (0 for an exact match)
    pub additional_leaf_count: usize,
    /// Which side of the query is contained in the vertex's leaf set
    pub direction: MatchDirection,
}

impl NodeInfo {
    /// Returns `true` if the vertex induces exactly the queried bipartition.
    pub fn is_exact(&self) -> bool {
        self.additional_leaf_count == 0
    }
}

// =#========================================================================#=
// TOPOLOGICAL CALCULATOR
// =#========================================================================$=
/// Session object for comparing the bipartitions of trees.
///
/// Leaf identity is read through a [NodeData] adapter: texts are used as
/// is, decimals in their [Display](std::fmt::Display) form, and leaves with
/// an empty value are ignored.
#[derive(Debug)]
pub struct TopologicalCalculator<'a> {
    leaf_data: &'a dyn NodeData,
    index_map: LeafIndexMap,
    leaves_without_counterpart: Vec<String>,
}

impl<'a> TopologicalCalculator<'a> {
    /// Creates a calculator identifying leaves through `leaf_data`.
    pub fn new(leaf_data: &'a dyn NodeData) -> Self {
        TopologicalCalculator {
            leaf_data,
            index_map: LeafIndexMap::new(),
            leaves_without_counterpart: Vec::new(),
        }
    }

    /// Returns the current index map.
    pub fn index_map(&self) -> &LeafIndexMap {
        &self.index_map
    }

    /// Returns the identifiers removed by the last restriction.
    pub fn leaves_without_counterpart(&self) -> &[String] {
        &self.leaves_without_counterpart
    }

    /// Returns the identifier of `vertex`, if it has one.
    pub fn leaf_identifier(&self, tree: &Tree, vertex: VertexIndex) -> Option<String> {
        match self.leaf_data.value(tree, vertex) {
            BranchValue::Text(text) => Some(text),
            BranchValue::Decimal(value) => Some(value.to_string()),
            BranchValue::Empty => None,
        }
    }

    /// Returns the identifiers of all leaves of `tree` in arena order.
    pub fn leaf_identifiers(&self, tree: &Tree) -> Vec<String> {
        tree.leaves()
            .filter_map(|leaf| self.leaf_identifier(tree, leaf.index()))
            .collect()
    }

    /// Starts a new session: assigns indices to all leaf identifiers of `tree`.
    pub fn build_index_map(&mut self, tree: &Tree) {
        self.index_map = LeafIndexMap::from_labels(self.leaf_identifiers(tree));
        self.leaves_without_counterpart.clear();
        debug!(leaves = self.index_map.len(), "built leaf index map");
    }

    /// Removes all identifiers that are not leaves of `other` from the index
    /// space, recording them as leaves without counterpart.
    ///
    /// Must be called before decorating any tree of the session.
    pub fn restrict_index_map_to_shared_leaves(&mut self, other: &Tree) -> &[String] {
        let shared: HashSet<String> = self.leaf_identifiers(other).into_iter().collect();
        self.leaves_without_counterpart = self
            .index_map
            .retain_labels(|label| shared.contains(label));
        debug!(
            leaves = self.index_map.len(),
            removed = self.leaves_without_counterpart.len(),
            "restricted leaf index map to shared leaves"
        );
        &self.leaves_without_counterpart
    }

    /// Computes the leaf set of every vertex of `tree` bottom-up.
    ///
    /// Leaves map to singleton sets; leaves whose identifier is not in the
    /// index map get an empty set. Internal vertices get the union of their
    /// children's sets.
    pub fn decorate(&self, tree: &Tree) -> Result<TreeLeafSets> {
        let size = self.index_map.len();
        let mut sets: Vec<Option<LeafSet>> = vec![None; tree.num_vertices()];

        for vertex in tree.post_order_iter() {
            let set = if vertex.is_leaf() {
                let index = self
                    .leaf_identifier(tree, vertex.index())
                    .and_then(|identifier| self.index_map.index_of(&identifier));
                match index {
                    Some(index) => LeafSet::singleton(size, index)?,
                    None => LeafSet::new(size),
                }
            } else {
                let mut set = LeafSet::new(size);
                for &child in vertex.children() {
                    let child_set = sets[child]
                        .as_ref()
                        .ok_or(TopologyError::MissingLeafSet(child))?;
                    set.union(child_set)?;
                }
                set
            };
            sets[vertex.index()] = Some(set);
        }

        Ok(TreeLeafSets { sets, size })
    }

    /// Searches `tree` for the vertices whose bipartition best matches `query`.
    ///
    /// Every vertex is compared against the query and its complement; the
    /// better direction counts. Subtrees containing neither side are pruned.
    /// All vertices with the minimum number of additional leaves are
    /// returned, the ones closest to the root first (ties at equal depth in
    /// pre-order). Equal minima occur at the two basal branches of an
    /// unrooted tree, which encode the same split.
    ///
    /// The root contains both sides of any query over the full index space,
    /// so the result is only empty if the tree has no root or no leaves of
    /// the index space.
    pub fn find_best_matches(
        &self,
        tree: &Tree,
        leaf_sets: &TreeLeafSets,
        query: &LeafSet,
    ) -> Result<Vec<NodeInfo>> {
        if !tree.is_root_set() {
            return Ok(Vec::new());
        }

        let mut candidates: Vec<(usize, NodeInfo)> = Vec::new();
        let mut stack = vec![(tree.root_index(), 0usize)];
        while let Some((vertex, depth)) = stack.pop() {
            let set = leaf_sets.get(vertex)?;
            let direct = query.compare(set, false)?.additional_leaf_count();
            let complement = query.compare(set, true)?.additional_leaf_count();

            let best = match (direct, complement) {
                (None, None) => continue,
                (Some(d), Some(c)) if c < d => (c, MatchDirection::Complement),
                (Some(d), _) => (d, MatchDirection::Direct),
                (None, Some(c)) => (c, MatchDirection::Complement),
            };
            candidates.push((
                depth,
                NodeInfo {
                    vertex,
                    additional_leaf_count: best.0,
                    direction: best.1,
                },
            ));

            for &child in tree[vertex].children().iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        let Some(minimum) = candidates
            .iter()
            .map(|(_, info)| info.additional_leaf_count)
            .min()
        else {
            return Ok(Vec::new());
        };
        candidates.retain(|(_, info)| info.additional_leaf_count == minimum);
        // Stable sort keeps pre-order among vertices at equal depth
        candidates.sort_by_key(|(depth, _)| *depth);

        trace!(
            query = %query,
            matches = candidates.len(),
            additional = minimum,
            "found best matches"
        );
        Ok(candidates.into_iter().map(|(_, info)| info).collect())
    }

    /// Locates the topologically nearest vertex of `tree` whose bipartition
    /// conflicts with `query`, starting at `candidate`.
    ///
    /// First the ancestors of `candidate` are checked (nearest first), then
    /// its subtree in breadth-first order. Subtrees lying entirely on one
    /// side of the query cannot conflict with it and are not entered.
    ///
    /// # Returns
    /// `None` if the bipartitions around `candidate` are all compatible with
    /// `query`, i.e. `tree` merely lacks resolution for the queried split.
    pub fn find_highest_conflict(
        &self,
        tree: &Tree,
        leaf_sets: &TreeLeafSets,
        candidate: VertexIndex,
        query: &LeafSet,
    ) -> Result<Option<VertexIndex>> {
        let mut ancestor = Some(candidate);
        while let Some(vertex) = ancestor {
            if query.conflicts_with(leaf_sets.get(vertex)?)? {
                return Ok(Some(vertex));
            }
            ancestor = tree[vertex].parent();
        }

        let query_complement = query.complement();
        let mut queue: VecDeque<VertexIndex> = tree[candidate].children().iter().copied().collect();
        while let Some(vertex) = queue.pop_front() {
            let set = leaf_sets.get(vertex)?;
            if query.contains_all(set)? || query_complement.contains_all(set)? {
                continue;
            }
            if query.conflicts_with(set)? {
                return Ok(Some(vertex));
            }
            queue.extend(tree[vertex].children().iter().copied());
        }

        Ok(None)
    }
}
