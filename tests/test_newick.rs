use splitwick::model::{AnnotationData, BranchValue, NodeData};
use splitwick::newick::{NewickParser, to_newick};
use splitwick::parser::{ByteParser, ParsingErrorType};
use splitwick::support::SupportTransfer;

// --- TESTS NEWICK STRING PARSING ---
#[test]
fn test_basic_tree() {
    let newick = "((A:1.0,B:2.0):3.0,C:4.0):0.5;";
    let tree = NewickParser::new().parse_str(newick).unwrap();

    // Test counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 2);
    assert_eq!(tree.num_vertices(), 5);
    assert!(tree.is_valid());
    assert!(tree.is_rooted());

    // Test relationships
    // - Root has children (internal, C)
    let root = tree.root();
    assert_eq!(*root.branch_length().unwrap(), 0.5);
    let (root_left, root_right) = (root.children()[0], root.children()[1]);

    // - Internal vertex has children (A, B)
    let internal = tree.vertex(root_left);
    assert!(internal.is_internal());
    assert_eq!(*internal.branch_length().unwrap(), 3.0);
    let leaf_a = tree.vertex(internal.children()[0]);
    let leaf_b = tree.vertex(internal.children()[1]);
    let leaf_c = tree.vertex(root_right);
    assert_eq!(leaf_a.label(), Some("A"));
    assert_eq!(leaf_b.label(), Some("B"));
    assert_eq!(leaf_c.label(), Some("C"));

    // - Parent relationships
    assert_eq!(internal.parent(), Some(root.index()));
    assert_eq!(leaf_a.parent(), Some(root_left));
    assert_eq!(leaf_c.parent(), Some(root.index()));
}

#[test]
fn test_polytomies() {
    let tree = NewickParser::new().parse_str("(A,B,C,(D,E,F));").unwrap();

    assert_eq!(tree.num_leaves(), 6);
    assert_eq!(tree.num_internal(), 2);
    assert_eq!(tree.root().children().len(), 4);
    let def = tree.root().children()[3];
    assert_eq!(tree[def].children().len(), 3);
}

#[test]
fn test_rooting_comments() {
    let parser = NewickParser::new();
    assert!(!parser.parse_str("[&U](A,B,C);").unwrap().is_rooted());
    assert!(!parser.parse_str("[&u] (A,B,C);").unwrap().is_rooted());
    assert!(parser.parse_str("[&R]((A,B),C);").unwrap().is_rooted());
    assert!(parser.parse_str("((A,B),C);").unwrap().is_rooted());
    // Regular comments in front of the rooting comment are skipped
    assert!(!parser.parse_str("[tree 1] [&U](A,B,C);").unwrap().is_rooted());

    let unrooted_default = NewickParser::new().with_default_rooted(false);
    assert!(!unrooted_default.parse_str("((A,B),C);").unwrap().is_rooted());
    assert!(unrooted_default.parse_str("[&R]((A,B),C);").unwrap().is_rooted());
}

#[test]
fn test_internal_labels() {
    let tree = NewickParser::new()
        .parse_str("((A,B)95,(C,D)0.87:1.2)root;")
        .unwrap();

    let ab = tree.root().children()[0];
    let cd = tree.root().children()[1];
    assert_eq!(tree[ab].label(), Some("95"));
    assert_eq!(tree[cd].label(), Some("0.87"));
    assert_eq!(*tree[cd].branch_length().unwrap(), 1.2);
    assert_eq!(tree.root().label(), Some("root"));
}

#[test]
fn test_tree_with_quoted_labels() {
    let newick = "(('Taxon one':1.5,'Second''s taxon':2.5):3.0,'3rd Taxon':4.0):0.0;";
    let tree = NewickParser::new().parse_str(newick).unwrap();

    let labels = tree.leaf_labels();
    assert_eq!(tree.num_leaves(), 3);
    assert!(labels.contains(&"Taxon one"));
    assert!(labels.contains(&"Second's taxon"));
    assert!(labels.contains(&"3rd Taxon"));
}

#[test]
fn test_tree_with_scientific_notation() {
    let newick = "((A:1e-5,B:2.5E+3):1.0e2,C:3.14E-10):0.0;";
    let tree = NewickParser::new().parse_str(newick).unwrap();

    assert_eq!(tree.num_leaves(), 3);
    assert!(tree.vertices_have_branch_lengths());
    assert!((tree.total_branch_length() - (1e-5 + 2.5e3 + 1.0e2 + 3.14e-10)).abs() < 1e-9);
}

#[test]
fn test_optional_branch_length() {
    let tree = NewickParser::new().parse_str("((A:1.0,B),C:4.0);").unwrap();
    assert!(!tree.vertices_have_branch_lengths());
}

#[test]
fn test_newick_with_comment_1() {
    let newick_with_comment = "[A tree of] (([Shags!]A[Great Commentoran]:0.33,B[Pied Commentoran]:0.33):1.87,C:[King Commentoran]2.2):0.0;";
    let tree = NewickParser::new().parse_str(newick_with_comment).unwrap();

    assert_eq!(tree.leaf_labels(), vec!["A", "B", "C"]);
}

#[test]
fn test_newick_with_comment_2() {
    let newick_with_comment = "[A tree of] ([Shags!] C:[King Commentoran] 2.2, (A[Great Commentoran]:0.33, B[Pied Commentoran]:0.33):1.87):0.0[The end.];";
    let tree = NewickParser::new().parse_str(newick_with_comment).unwrap();

    assert_eq!(tree.num_leaves(), 3);
    assert!(tree.is_valid());
}

// --- TESTS ANNOTATIONS ---
#[test]
fn test_annotations() {
    let newick = "((A[&colour=red],B)[&posterior=0.95]:1.0,C);";
    let tree = NewickParser::new().with_annotations().parse_str(newick).unwrap();

    let ab = tree.root().children()[0];
    let a = tree[ab].children()[0];
    let posterior = AnnotationData::new("posterior");
    assert_eq!(posterior.decimal(&tree, ab), Some(0.95));
    assert_eq!(tree[ab].label(), None);
    assert_eq!(*tree[ab].branch_length().unwrap(), 1.0);
    assert_eq!(
        tree.annotations().get("colour", a),
        &BranchValue::Text("red".to_string())
    );
    assert_eq!(tree[a].label(), Some("A"));
}

#[test]
fn test_annotations_skipped_as_comments_by_default() {
    let newick = "((A[&colour=red],B)[&posterior=0.95]:1.0,C);";
    let tree = NewickParser::new().parse_str(newick).unwrap();

    let ab = tree.root().children()[0];
    assert!(!tree.annotations().contains_key("posterior"));
    assert_eq!(tree[ab].label(), None);
    assert_eq!(tree.leaf_labels(), vec!["A", "B", "C"]);
}

#[test]
fn test_invalid_annotations() {
    let parser = NewickParser::new().with_annotations();

    let missing_key = parser.parse_str("(A[&=1],B);").unwrap_err();
    assert!(matches!(missing_key.kind(), ParsingErrorType::InvalidAnnotation(_)));

    let missing_value = parser.parse_str("(A[&size],B);").unwrap_err();
    assert!(matches!(missing_value.kind(), ParsingErrorType::InvalidAnnotation(_)));
}

// --- TESTS DEALING WITH CORRUPT NEWICK STRINGS ---
#[test]
fn test_missing_semicolon() {
    let result = NewickParser::new().parse_str("((A:1.0,B:2.0):3.0,C:4.0):0.5");
    assert!(result.is_err());
}

#[test]
fn test_missing_comma() {
    let result = NewickParser::new().parse_str("((A:1.0 B:2.0):3.0,C:4.0):0.5;");
    assert!(result.is_err());
}

#[test]
fn test_unmatched_parentheses() {
    let error = NewickParser::new()
        .parse_str("((A:1.0,B:2.0:3.0,C:4.0):0.5;")
        .unwrap_err();
    assert!(matches!(error.kind(), ParsingErrorType::InvalidNewickString(_)));
}

#[test]
fn test_invalid_branch_length() {
    let result = NewickParser::new().parse_str("((A:1.0,B:abc):3.0,C:4.0):0.5;");
    assert!(result.is_err());
}

#[test]
fn test_negative_branch_length() {
    let result = NewickParser::new().parse_str("((A:1.0,B:-2.0):3.0,C:4.0);");
    assert!(result.is_err());
}

#[test]
fn test_empty_leaf_label() {
    let error = NewickParser::new().parse_str("(A,,B);").unwrap_err();
    assert!(matches!(error.kind(), ParsingErrorType::InvalidNewickString(_)));
    assert_eq!(error.position(), 3);
}

#[test]
fn test_unparenthesized_root() {
    let result = NewickParser::new().parse_str("A;");
    assert!(result.is_err());
}

#[test]
fn test_unclosed_quote_and_comment() {
    let parser = NewickParser::new();
    let quote = parser.parse_str("('A,B);").unwrap_err();
    assert_eq!(quote.kind(), &ParsingErrorType::UnclosedQuote);

    let comment = parser.parse_str("((A,B)[oops,C);").unwrap_err();
    assert_eq!(comment.kind(), &ParsingErrorType::UnclosedComment);
}

#[test]
fn test_empty_input() {
    let error = NewickParser::new().parse_str("  [nothing here]  ").unwrap_err();
    assert_eq!(error.kind(), &ParsingErrorType::UnexpectedEOF);
}

// --- TESTS PARSING MULTIPLE TREES ---
#[test]
fn test_parse_all() {
    let input = "((A,B),C);\n[second tree]\n[&U](A,B,C);\n";
    let trees = NewickParser::new().parse_all(input).unwrap();

    assert_eq!(trees.len(), 2);
    assert!(trees[0].is_rooted());
    assert!(!trees[1].is_rooted());
    for tree in &trees {
        assert_eq!(tree.num_leaves(), 3);
        assert!(tree.is_valid());
    }
}

#[test]
fn test_iterator_stops_after_error() {
    let input = "(A,B);(A,B;(C,D);";
    let mut trees = NewickParser::new().into_iter(ByteParser::for_str(input));

    assert!(trees.next().unwrap().is_ok());
    assert!(trees.next().unwrap().is_err());
    assert!(trees.next().is_none());
}

#[test]
fn test_iterator_on_empty_input() {
    let mut trees = NewickParser::new().into_iter(ByteParser::for_str(" \n[only a comment]\n"));
    assert!(trees.next().is_none());
}

// --- TESTS WRITING ---
#[test]
fn test_write_parsed_tree() {
    let newick = "((A:1.5,B:2)95:0.5,'Baillon''s Crake':3);";
    let tree = NewickParser::new().parse_str(newick).unwrap();
    assert_eq!(to_newick(&tree, None), newick);
}

#[test]
fn test_write_root_branch_length() {
    let parser = NewickParser::new();
    let unrooted = parser.parse_str("[&U]((A,B),C,D):0.5;").unwrap();
    assert_eq!(to_newick(&unrooted, None), "[&U]((A,B),C,D):0.5;");

    let rooted = parser.parse_str("((A:1,B:1)0.9:2,C:3)root:0.25;").unwrap();
    assert_eq!(to_newick(&rooted, None), "((A:1,B:1)0.9:2,C:3)root:0.25;");
}

#[test]
fn test_write_transferred_support() {
    let source = NewickParser::new().parse_str("((A,B)95,(C,D));").unwrap();
    let mut target = NewickParser::new().parse_str("((A,B),(C,D));").unwrap();
    SupportTransfer::default().transfer(&source, &mut target).unwrap();

    let support = AnnotationData::new("support");
    assert_eq!(to_newick(&target, Some(&support)), "((A,B)95,(C,D)95);");
}
