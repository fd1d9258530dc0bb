//! Newick string serialization.

use crate::model::{BranchLength, NodeData, Tree, VertexIndex};
use crate::parser::utils::escape_label;

/// Characters per internal vertex ("(,)") and per branch length (":0.0123456789")
const INTERNAL_VERTEX_CHARS: usize = 3;
const BRANCH_LENGTH_CHARS: usize = 12;

/// Returns the Newick representation of a tree with closing semicolon.
///
/// Leaves are written with their escaped labels. Internal vertices get the
/// value of `internal_labels` if given (e.g. a support annotation), or their
/// own label otherwise. Unrooted trees are prefixed with `[&U]`.
///
/// # Example
/// ```
/// use splitwick::model::{AnnotationData, BranchLength, NodeData, Tree};
/// use splitwick::newick::to_newick;
///
/// let mut tree = Tree::new().with_rooted(false);
/// let a = tree.add_leaf(Some(BranchLength::new(1.0)), "A");
/// let b = tree.add_leaf(Some(BranchLength::new(2.0)), "B");
/// let c = tree.add_leaf(None, "C");
/// let ab = tree.add_internal_vertex(vec![a, b], None);
/// tree.add_root(vec![ab, c], None);
///
/// let support = AnnotationData::new("support");
/// support.set_decimal(&mut tree, ab, 95.0);
///
/// assert_eq!(to_newick(&tree, Some(&support)), "[&U]((A:1,B:2)95,C);");
/// assert_eq!(to_newick(&tree, None), "[&U]((A:1,B:2),C);");
/// ```
pub fn to_newick(tree: &Tree, internal_labels: Option<&dyn NodeData>) -> String {
    // Recursive helper for building the Newick string
    fn build_newick(
        tree: &Tree,
        newick: &mut String,
        index: VertexIndex,
        internal_labels: Option<&dyn NodeData>,
    ) {
        let vertex = &tree[index];

        if vertex.is_leaf() {
            if let Some(label) = vertex.label() {
                newick.push_str(&escape_label(label));
            }
        } else {
            newick.push('(');
            for (position, &child) in vertex.children().iter().enumerate() {
                if position > 0 {
                    newick.push(',');
                }
                build_newick(tree, newick, child, internal_labels);
            }
            newick.push(')');

            let label = match internal_labels {
                Some(data) => data.value(tree, index).to_string(),
                None => vertex.label().unwrap_or_default().to_string(),
            };
            if !label.is_empty() {
                newick.push_str(&escape_label(&label));
            }
        }

        push_branch_length(newick, vertex.branch_length());
    }

    let mut newick = String::with_capacity(estimate_newick_len(tree));
    if !tree.is_root_set() {
        return newick;
    }

    if !tree.is_rooted() {
        newick.push_str("[&U]");
    }
    build_newick(tree, &mut newick, tree.root_index(), internal_labels);
    newick.push(';');

    newick
}

fn push_branch_length(newick: &mut String, branch_length: Option<BranchLength>) {
    if let Some(branch_length) = branch_length {
        newick.push(':');
        newick.push_str(&branch_length.to_string());
    }
}

/// Estimates the length of the Newick string of `tree`, to pre-allocate.
fn estimate_newick_len(tree: &Tree) -> usize {
    let structure = tree.num_internal() * INTERNAL_VERTEX_CHARS;
    let labels: usize = tree.leaf_labels().iter().map(|label| label.len() + 2).sum();
    let branches = if tree.vertices_have_branch_lengths() {
        tree.num_vertices() * BRANCH_LENGTH_CHARS
    } else {
        0
    };
    structure + labels + branches + 8
}
