use splitwick::model::{
    AnnotationData, BranchLength, BranchLengthData, BranchValue, NodeData, Tree, Vertex,
    VertexLabelData,
};

/// ((Kea:1,Kaka:1):1.5,Kakapo:0.5,Kakariki:2);
fn parrots() -> Tree {
    let mut tree = Tree::new().with_name("parrots".to_string());
    let kea = tree.add_leaf(Some(BranchLength::new(1.0)), "Kea");
    let kaka = tree.add_leaf(Some(BranchLength::new(1.0)), "Kaka");
    let kakapo = tree.add_leaf(Some(BranchLength::new(0.5)), "Kakapo");
    let kakariki = tree.add_leaf(Some(BranchLength::new(2.0)), "Kakariki");
    let nestor = tree.add_internal_vertex(vec![kea, kaka], Some(BranchLength::new(1.5)));
    tree.add_root(vec![nestor, kakapo, kakariki], None);
    tree
}

// ============= Construction =============
#[test]
fn test_building_tree() {
    let tree = parrots();

    // Counts
    assert_eq!(tree.num_leaves(), 4);
    assert_eq!(tree.num_internal(), 2);
    assert_eq!(tree.num_vertices(), 6);
    assert_eq!(tree.name().map(String::as_str), Some("parrots"));
    assert!(tree.is_valid());

    // Root
    let root = tree.root();
    assert!(root.is_root());
    assert_eq!(root.index(), tree.root_index());
    assert_eq!(root.children().len(), 3);

    // Leaf
    let kaka = &tree[1];
    assert!(kaka.is_leaf());
    assert_eq!(kaka.label(), Some("Kaka"));
    assert_eq!(kaka.parent(), Some(4));

    // Internal
    let nestor = &tree[4];
    assert!(nestor.is_internal());
    assert_eq!(nestor.branch_length(), Some(BranchLength::new(1.5)));
    assert_eq!(nestor.children(), &[0, 1]);
}

#[test]
fn test_tree_without_root_is_invalid() {
    let mut tree = Tree::new();
    let a = tree.add_leaf(None, "A");
    let b = tree.add_leaf(None, "B");
    tree.add_internal_vertex(vec![a, b], None);

    assert!(!tree.is_root_set());
    assert!(!tree.is_valid());
    assert_eq!(tree.pre_order_iter().count(), 0);
}

#[test]
fn test_detached_vertex_is_invalid() {
    let mut tree = Tree::new();
    let a = tree.add_leaf(None, "A");
    let b = tree.add_leaf(None, "B");
    tree.add_leaf(None, "stray");
    tree.add_root(vec![a, b], None);

    assert!(!tree.is_valid());
}

#[test]
#[should_panic]
fn test_get_vertex_out_of_bounds() {
    let tree = parrots();
    let _ = &tree[55];
}

#[test]
#[should_panic]
fn test_internal_vertex_without_children() {
    let mut tree = Tree::new();
    tree.add_internal_vertex(Vec::new(), None);
}

// ============= Traversal =============
#[test]
fn test_pre_order() {
    let tree = parrots();
    let labels: Vec<Option<&str>> = tree.pre_order_iter().map(|v| v.label()).collect();
    assert_eq!(
        labels,
        vec![None, None, Some("Kea"), Some("Kaka"), Some("Kakapo"), Some("Kakariki")]
    );
}

#[test]
fn test_post_order() {
    let tree = parrots();
    let indices: Vec<usize> = tree.post_order_iter().map(|v| v.index()).collect();
    assert_eq!(indices, vec![0, 1, 4, 2, 3, 5]);
}

#[test]
fn test_subtree() {
    let tree = parrots();
    let indices: Vec<usize> = tree.subtree_iter(4).map(|v| v.index()).collect();
    assert_eq!(indices, vec![4, 0, 1]);
}

#[test]
fn test_branch_lengths() {
    let tree = parrots();
    assert!(tree.vertices_have_branch_lengths());
    assert_eq!(tree.total_branch_length(), 6.0);
}

// ============= Vertex & Branch Length =============
#[test]
fn test_vertex_variants() {
    let leaf = Vertex::new_leaf(0, Some(BranchLength::new(0.5)), "Tui".to_string());
    assert!(leaf.is_leaf());
    assert!(leaf.children().is_empty());
    assert!(!leaf.has_parent());

    let internal = Vertex::new_internal(3, vec![0, 1, 2], None);
    assert!(internal.is_internal());
    assert_eq!(internal.label(), None);
    assert!(!internal.has_branch_length());
}

#[test]
#[should_panic]
fn test_negative_branch_length() {
    BranchLength::new(-1.0);
}

#[test]
fn test_try_new_branch_length() {
    assert_eq!(BranchLength::try_new(-0.1), None);
    assert_eq!(BranchLength::try_new(f64::NAN), None);
    assert_eq!(BranchLength::try_new(f64::INFINITY), None);
    assert_eq!(BranchLength::try_new(0.0), Some(BranchLength::new(0.0)));
}

// ============= Annotations & Node Data =============
#[test]
fn test_annotations_grow_on_demand() {
    let mut tree = parrots();
    assert!(tree.annotations().get("support", 4).is_empty());

    tree.annotations_mut().set("support", 4, BranchValue::Decimal(87.0));
    assert_eq!(tree.annotations().get("support", 4), &BranchValue::Decimal(87.0));
    assert!(tree.annotations().get("support", 5).is_empty());
    assert_eq!(tree.annotations().get_all_for_key("support").unwrap().len(), 5);

    let removed = tree.annotations_mut().remove_key("support").unwrap();
    assert_eq!(removed[4], BranchValue::Decimal(87.0));
    assert!(!tree.annotations().contains_key("support"));
}

#[test]
fn test_annotation_data() {
    let mut tree = parrots();
    let posterior = AnnotationData::new("posterior");

    posterior.set_decimal(&mut tree, 4, 0.98);
    assert!(posterior.is_decimal(&tree, 4));
    assert_eq!(posterior.decimal(&tree, 4), Some(0.98));

    posterior.set_text(&mut tree, 4, "0.9/0.8".to_string());
    assert!(posterior.is_text(&tree, 4));
    assert_eq!(posterior.decimal(&tree, 4), None);
    assert_eq!(posterior.text(&tree, 4), Some("0.9/0.8".to_string()));

    posterior.set_value(&mut tree, 4, BranchValue::Empty);
    assert!(posterior.value(&tree, 4).is_empty());
}

#[test]
fn test_vertex_label_data() {
    let mut tree = parrots();

    assert_eq!(VertexLabelData.text(&tree, 0), Some("Kea".to_string()));
    assert!(VertexLabelData.value(&tree, 4).is_empty());

    VertexLabelData.set_decimal(&mut tree, 4, 95.0);
    assert_eq!(tree[4].label(), Some("95"));
    // labels are text, numbers only by parsing
    assert_eq!(VertexLabelData.decimal(&tree, 4), None);
    assert_eq!(VertexLabelData.value(&tree, 4).to_number(true), Some(95.0));
    assert_eq!(VertexLabelData.value(&tree, 4).to_number(false), None);
}

#[test]
fn test_branch_length_data() {
    let mut tree = parrots();

    assert_eq!(BranchLengthData.decimal(&tree, 4), Some(1.5));
    BranchLengthData.set_decimal(&mut tree, 4, 0.25);
    assert_eq!(tree[4].branch_length(), Some(BranchLength::new(0.25)));

    BranchLengthData.set_decimal(&mut tree, 4, -3.0);
    assert_eq!(tree[4].branch_length(), None);
    assert!(BranchLengthData.value(&tree, 5).is_empty());
}
