//! Provides the tree representation.
//!
//! Provides core data structures for representing phylogenetic trees:
//! * [Tree] - Main tree structure using the arena pattern
//!   for efficient memory layout; vertices may have any number of children.
//! * [VertexIndex] as type used to index vertices in tree
//! * Stack-based [PreOrderIter] and [PostOrderIter] traversals

use crate::model::annotation::Annotations;
use crate::model::vertex::{BranchLength, Vertex};

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A phylogenetic tree represented using the arena pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Aim is to avoid referencing troubles as well as to provide
/// efficient memory layout and cache locality for traversal operations.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena.
/// - Index of root is maintained.
/// - No assumption on order of indices is maintained.
/// - Internal vertices have an ordered list of children, so polytomies
///   and a multifurcating root (typical for unrooted trees) are fine.
/// - Parents are stored as indices and only used for navigation.
/// - Branch lengths are optional, but if provided must be non-negative.
/// - The `rooted` flag states whether the root is a true root or only an
///   artifact of representing an unrooted tree.
/// - Named [Annotations] hold additional per-vertex values.
///
/// # Construction
/// Add leaves first, then internal vertices referencing their children,
/// and finally the root. Test validity with [`Tree::is_valid()`].
///
/// # Example
/// ```
/// use splitwick::model::Tree;
///
/// // ((A,B),C);
/// let mut tree = Tree::new();
/// let a = tree.add_leaf(None, "A");
/// let b = tree.add_leaf(None, "B");
/// let c = tree.add_leaf(None, "C");
/// let ab = tree.add_internal_vertex(vec![a, b], None);
/// tree.add_root(vec![ab, c], None);
///
/// assert!(tree.is_valid());
/// assert_eq!(tree.num_leaves(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: VertexIndex,

    /// Whether the root is a true root
    rooted: bool,

    /// Name of tree; optional
    name: Option<String>,

    /// Named per-vertex values
    annotations: Annotations,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Creates a new, empty, rooted tree.
    pub fn new() -> Self {
        Tree {
            vertices: Vec::new(),
            root_index: NO_ROOT_SET_INDEX,
            rooted: true,
            name: None,
            annotations: Annotations::new(),
        }
    }

    /// Creates a new, empty tree with capacity for a binary tree
    /// with `num_leaves` leaves.
    pub fn with_capacity(num_leaves: usize) -> Self {
        let mut tree = Self::new();
        tree.vertices.reserve(2 * num_leaves.max(1) - 1);
        tree
    }

    /// Attaches a name to this tree.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets whether the root of this tree is a true root.
    pub fn with_rooted(mut self, rooted: bool) -> Self {
        self.rooted = rooted;
        self
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    /// * `label` - Name of this leaf
    pub fn add_leaf(&mut self, branch_length: Option<BranchLength>, label: impl Into<String>) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, branch_length, label.into()));
        index
    }

    /// Adds an internal vertex to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Ordered child indices (at least one)
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    ///
    /// # Panics
    /// Panics if `children` is empty or contains an index not yet in the arena.
    pub fn add_internal_vertex(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        assert!(!children.is_empty(), "Internal vertex needs at least one child");
        let index = self.vertices.len();
        for &child in &children {
            self[child].set_parent(index);
        }
        self.vertices
            .push(Vertex::new_internal(index, children, branch_length));

        index
    }

    /// Adds the root to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Ordered child indices (at least one)
    /// * `branch_length` - Optional length of incoming edge (for special cases)
    pub fn add_root(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.add_internal_vertex(children, branch_length);
        self.root_index = index;
        index
    }

    /// Returns reference to name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Set a name for this tree.
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Returns whether the root is a true root (`false` for unrooted trees).
    pub fn is_rooted(&self) -> bool {
        self.rooted
    }

    /// Sets whether the root is a true root.
    pub fn set_rooted(&mut self, rooted: bool) {
        self.rooted = rooted;
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns a mutable reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex_mut(&mut self, index: VertexIndex) -> &mut Vertex {
        &mut self.vertices[index]
    }

    /// Returns the per-vertex annotations of this tree.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Returns the per-vertex annotations of this tree for modification.
    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices in this tree (root included).
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns an iterator over all leaves, in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter().filter(|v| v.is_leaf())
    }

    /// Returns the labels of all leaves, in arena order.
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.leaves().filter_map(|v| v.label()).collect()
    }

    /// Returns the sum of all branch lengths in the tree.
    pub fn total_branch_length(&self) -> f64 {
        self.vertices
            .iter()
            .filter_map(|v| v.branch_length())
            .map(|bl| *bl)
            .sum::<f64>()
    }

    /// Checks if all non-root vertices have branch lengths set.
    pub fn vertices_have_branch_lengths(&self) -> bool {
        self.vertices
            .iter()
            .all(|vertex| vertex.is_root() || vertex.has_branch_length())
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is valid and points to a vertex without parent
    /// - All vertex indices match their position in the arena
    /// - There is exactly one vertex without parent
    /// - All child indices are valid and point back to correct parent
    /// - All parent indices are valid and include this vertex as a child
    /// - Every vertex is reachable from the root
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if !self.is_root_set() || self.root_index >= self.vertices.len() {
            return false;
        }

        if !self.vertices[self.root_index].is_root() {
            return false;
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            // Check vertex index matches its arena position
            if vertex.index() != index {
                return false;
            }

            // Check children point back to this vertex as parent
            for &child in vertex.children() {
                if child >= self.vertices.len() || self.vertices[child].parent() != Some(index) {
                    return false;
                }
            }

            // Check parent references
            match vertex.parent() {
                None if index != self.root_index => return false,
                None => {}
                Some(parent_index) => {
                    if parent_index >= self.vertices.len()
                        || !self.vertices[parent_index].children().contains(&index)
                    {
                        return false;
                    }
                }
            }
        }

        // All vertices must hang off the root
        self.pre_order_iter().count() == self.vertices.len()
    }
}

impl std::ops::Index<VertexIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<VertexIndex> for Tree {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl Tree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Post-order traversal visits each vertex's children before visiting the vertex itself.
    /// This is useful for aggregating data from leaves upward, e.g. leaf sets.
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Pre-order traversal visits each vertex before visiting its children.
    /// This is useful for propagating data from root to leaves.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self, self.is_root_set().then_some(self.root_index))
    }

    /// Returns a pre-order iterator over the subtree rooted at `index`
    /// (the vertex itself comes first).
    pub fn subtree_iter(&self, index: VertexIndex) -> PreOrderIter<'_> {
        PreOrderIter::new(self, Some(index))
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));
            // Push children in reverse, so first child is processed first
            for &child in vertex.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree, start: Option<VertexIndex>) -> Self {
        PreOrderIter {
            tree,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        self.stack.extend(vertex.children().iter().rev());

        Some(vertex)
    }
}
