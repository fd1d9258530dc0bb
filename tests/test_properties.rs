use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use splitwick::consensus::SplitCounter;
use splitwick::model::{AnnotationData, NodeData, Tree, VertexIndex, VertexLabelData};
use splitwick::support::SupportTransfer;
use splitwick::topology::{LeafSet, LeafSetRelation, TopologicalCalculator};
use std::collections::HashSet;

fn leaf_set(bits: &[bool]) -> LeafSet {
    let mut set = LeafSet::new(bits.len());
    for (index, &bit) in bits.iter().enumerate() {
        set.set_bit(index, bit).unwrap();
    }
    set
}

/// Builds a tree on `num_leaves` leaves by repeatedly merging two random
/// subtrees until three remain, which become children of the root.
/// Internal vertices are labelled with their arena index.
fn random_tree(num_leaves: usize, seed: u64) -> Tree {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut tree = Tree::new();
    let mut subtrees: Vec<VertexIndex> = (0..num_leaves)
        .map(|i| tree.add_leaf(None, format!("t{i}")))
        .collect();
    while subtrees.len() > 3 {
        let a = subtrees.swap_remove(rng.gen_range(0..subtrees.len()));
        let b = subtrees.swap_remove(rng.gen_range(0..subtrees.len()));
        let merged = tree.add_internal_vertex(vec![a, b], None);
        tree[merged].set_label(Some(merged.to_string()));
        subtrees.push(merged);
    }
    tree.add_root(subtrees, None);
    tree
}

fn non_root_internal(tree: &Tree) -> Vec<VertexIndex> {
    tree.pre_order_iter()
        .filter(|v| v.is_internal() && !v.is_root())
        .map(|v| v.index())
        .collect()
}

// ─── Leaf Set Invariants ───

proptest! {
    #[test]
    fn proptest_double_complement(bits in prop::collection::vec(any::<bool>(), 1..200)) {
        let set = leaf_set(&bits);
        let complement = set.complement();

        prop_assert_eq!(complement.complement(), set.clone());
        prop_assert_eq!(set.popcount() + complement.popcount(), set.len());
        prop_assert_eq!(set.min_side(), complement.min_side());
    }

    #[test]
    fn proptest_compare_with_itself(bits in prop::collection::vec(any::<bool>(), 1..200)) {
        let set = leaf_set(&bits);

        prop_assert_eq!(set.compare(&set, false).unwrap(), LeafSetRelation::Equal);
        prop_assert_eq!(set.compare(&set.complement(), true).unwrap(), LeafSetRelation::Equal);
        prop_assert!(!set.conflicts_with(&set).unwrap());
    }

    #[test]
    fn proptest_compare_counts_additional_leaves(
        pairs in prop::collection::vec((any::<bool>(), any::<bool>()), 1..8),
    ) {
        let own: Vec<bool> = pairs.iter().map(|&(a, _)| a).collect();
        let other: Vec<bool> = pairs.iter().map(|&(a, b)| a || b).collect();
        let (own, other) = (leaf_set(&own), leaf_set(&other));

        match own.compare(&other, false).unwrap() {
            LeafSetRelation::Equal => prop_assert_eq!(&own, &other),
            LeafSetRelation::OtherHasExtra(count) => {
                prop_assert_eq!(count, other.popcount() - own.popcount());
                prop_assert!(own.is_proper_subtree_of(&other, false).unwrap());
            }
            LeafSetRelation::NotContained => prop_assert!(false, "subset reported as not contained"),
        }
    }

    #[test]
    fn proptest_mutual_containment_is_equality(
        a in prop::collection::vec(any::<bool>(), 5),
        b in prop::collection::vec(any::<bool>(), 5),
    ) {
        let (a, b) = (leaf_set(&a), leaf_set(&b));
        let mutual = a.contains_all(&b).unwrap() && b.contains_all(&a).unwrap();
        prop_assert_eq!(mutual, a == b);
    }
}

// ─── Tree Invariants ───

proptest! {
    #[test]
    fn proptest_decoration_unions_children(num_leaves in 4usize..40, seed in any::<u64>()) {
        let tree = random_tree(num_leaves, seed);
        let mut calculator = TopologicalCalculator::new(&VertexLabelData);
        calculator.build_index_map(&tree);
        let sets = calculator.decorate(&tree).unwrap();

        let mut leaf_bits = HashSet::new();
        for vertex in tree.post_order_iter() {
            let set = sets.get(vertex.index()).unwrap();
            if vertex.is_leaf() {
                prop_assert_eq!(set.popcount(), 1);
                let bit = set.iter_ones().next().unwrap();
                prop_assert!(leaf_bits.insert(bit), "leaf bit {} assigned twice", bit);
            } else {
                let mut union = LeafSet::new(num_leaves);
                for &child in vertex.children() {
                    union.union(sets.get(child).unwrap()).unwrap();
                }
                prop_assert_eq!(set, &union);
            }
        }
        prop_assert_eq!(sets.get(tree.root_index()).unwrap().popcount(), num_leaves);
    }

    #[test]
    fn proptest_identical_trees_match_everywhere(num_leaves in 4usize..40, seed in any::<u64>()) {
        let source = random_tree(num_leaves, seed);
        let mut target = source.clone();

        let report = SupportTransfer::default().transfer(&source, &mut target).unwrap();

        prop_assert_eq!(report.conflicting, 0);
        prop_assert_eq!(report.unresolved, 0);
        prop_assert_eq!(report.matched + report.skipped, target.num_internal());
        prop_assert!(report.unmatched_source_leaves.is_empty());
    }

    #[test]
    fn proptest_every_branch_accounted_for(
        num_leaves in 4usize..30,
        source_seed in any::<u64>(),
        target_seed in any::<u64>(),
    ) {
        let source = random_tree(num_leaves, source_seed);
        let mut target = random_tree(num_leaves, target_seed);

        let report = SupportTransfer::default().transfer(&source, &mut target).unwrap();

        prop_assert_eq!(
            report.matched + report.conflicting + report.unresolved + report.skipped,
            target.num_internal()
        );
    }

    #[test]
    fn proptest_tree_contains_all_its_splits(num_leaves in 4usize..30, seed in any::<u64>()) {
        let mut base = random_tree(num_leaves, seed);
        let trees = vec![Ok::<_, String>(base.clone())];

        SplitCounter::default().count(&mut base, trees).unwrap();

        let frequency = AnnotationData::new("frequency");
        for vertex in non_root_internal(&base) {
            prop_assert_eq!(frequency.decimal(&base, vertex), Some(1.0));
        }
    }
}
