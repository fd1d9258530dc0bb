//! Newick format parser and writer for phylogenetic trees.
//!
//! Trees are read with a [`NewickParser`] and written with [`to_newick`].
//!
//! # Full API
//! * [`NewickParser::parse_str`] - parse a single tree
//! * [`NewickParser::parse_all`] - parse all trees until EOF
//! * [`NewickParser::into_iter`] - obtain a lazy iterator over trees, e.g.
//!   as tree stream for [SplitCounter](crate::consensus::SplitCounter)
//!
//! # Format
//! The Newick format has the following simple grammar:
//! * `tree ::= [rooting] vertex ';'`
//! * `rooting ::= '[&R]' | '[&U]'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex (',' vertex)* ')' [label] [branch_length]`
//! * `leaf ::= label [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch_length
//! * Labels in single quotes may contain any character, `''` escapes a quote
//! * Comments are square brackets and can occur anywhere where whitespace is allowed
//! * Labels of internal vertices commonly hold support values, e.g. `(A,B)95`
//!
//! In the extended Newick format, there can be comment-like annotations
//! after the label of any vertex:
//! * `A[&posterior=0.95,colour=red]:2.1`
//! * `(A,B)[&posterior=0.87]:6.7`
//!
//! These are skipped as comments unless the parser is configured
//! [`with_annotations()`](NewickParser::with_annotations).

mod parser;
mod writer;

pub use self::parser::{NewickIterator, NewickParser};
pub use self::writer::to_newick;
