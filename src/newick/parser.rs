//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which offers methods
//! to parse single strings or all trees of an input eagerly, as well as
//! lazily via a [NewickIterator].

use crate::model::{BranchLength, BranchValue, Tree, VertexIndex};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::{ByteSource, InMemoryByteSource};
use crate::parser::parsing_error::ParsingError;

/// Newick label delimiters: parentheses, comma, colon, semicolon, brackets, whitespace
const NEWICK_LABEL_DELIMITERS: &[u8] = b"([,:; \n\t\r)]";

/// Delimiters of values in an annotation block
const ANNOTATION_VALUE_DELIMITERS: &[u8] = b",]";

/// Annotation key-value pairs of a vertex, before the vertex is added
type PendingAnnotations = Vec<(String, BranchValue)>;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for Newick trees.
///
/// # Configuration
/// * [`with_annotations()`](Self::with_annotations)
///     - Configures the parser to parse vertex annotations
///       (e.g. `[&posterior=0.95,colour=red]`) into the tree's
///       [Annotations](crate::model::Annotations) instead of treating them
///       as comments.
/// * [`with_default_rooted(rooted)`](Self::with_default_rooted)
///     - Whether trees without `[&R]`/`[&U]` prefix are rooted (default).
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) - Parse single tree from a string
/// * [`parse_tree`](Self::parse_tree) - Parse single tree from a [ByteParser]
/// * [`parse_all`](Self::parse_all) - Parse all trees eagerly
/// * [`into_iter`](Self::into_iter) - Parse trees lazily
///
/// # Example
/// ```
/// use splitwick::newick::NewickParser;
///
/// let tree = NewickParser::new()
///     .parse_str("[&U]((A:1.0,B:1.0)87:0.5,C:1.5,D:0.3);")
///     .unwrap();
///
/// assert!(!tree.is_rooted());
/// assert_eq!(tree.num_leaves(), 4);
/// assert_eq!(tree.root().children().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct NewickParser {
    parse_annotations: bool,
    default_rooted: bool,
}

impl Default for NewickParser {
    fn default() -> Self {
        NewickParser {
            parse_annotations: false,
            default_rooted: true,
        }
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    /// Creates a new [NewickParser] with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the parser to parse vertex annotations.
    pub fn with_annotations(mut self) -> Self {
        self.parse_annotations = true;
        self
    }

    /// Sets whether trees without rooting comment are considered rooted.
    pub fn with_default_rooted(mut self, rooted: bool) -> Self {
        self.default_rooted = rooted;
        self
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses the first Newick tree of the given string.
    pub fn parse_str(&self, input: &str) -> Result<Tree, ParsingError> {
        let mut byte_parser = ByteParser::for_str(input);
        self.parse_tree(&mut byte_parser)
    }

    /// Parses all Newick trees of the input until EOF.
    ///
    /// # Returns
    /// * `Ok(Vec<Tree>)` - All parsed trees
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all(&self, input: impl Into<Vec<u8>>) -> Result<Vec<Tree>, ParsingError> {
        self.clone()
            .into_iter(ByteParser::from_bytes(input))
            .collect()
    }

    /// Consumes the parser and returns an iterator over the trees of the
    /// byte source.
    ///
    /// # Arguments
    /// * `byte_parser` - A byte parser with underlying source containing only
    ///   Newick strings, except for whitespace and `[...]` comments.
    pub fn into_iter<B: ByteSource>(self, byte_parser: ByteParser<B>) -> NewickIterator<B> {
        NewickIterator {
            parser: self,
            byte_parser,
            done: false,
        }
    }

    /// Parses a single Newick tree from the given [ByteParser], which is
    /// left positioned after the terminating `;`.
    pub fn parse_tree<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
    ) -> Result<Tree, ParsingError> {
        skip_to_tree_start(parser)?;
        let rooted = if parser.consume_if_sequence(b"[&R]") {
            true
        } else if parser.consume_if_sequence(b"[&U]") {
            false
        } else {
            self.default_rooted
        };

        let mut tree = Tree::new().with_rooted(rooted);
        self.parse_root(parser, &mut tree)?;
        Ok(tree)
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickParser {
    /// Parses root of tree and adds it to tree:
    /// - `(children)[label][annotation][:branch_length];`
    /// - Skips leading comments and whitespace
    fn parse_root<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.is_eof() {
            return Err(ParsingError::unexpected_eof(parser));
        }

        let children = self.parse_children(parser, tree)?;
        let label = self.parse_internal_label(parser)?;
        let annotations = self.parse_annotations(parser)?;
        let branch_length = self.parse_branch_length(parser)?;

        // Consume the terminating semicolon
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", next_char),
            ));
        }

        let root_index = tree.add_root(children, branch_length);
        tree[root_index].set_label(label);
        add_annotations(tree, annotations, root_index);

        Ok(())
    }

    /// Parses a vertex (either internal vertex or leaf) and returns its index:
    /// - Skips leading comments and whitespace
    /// - Dispatches to `parse_internal_vertex` if starts with `(`, otherwise `parse_leaf`
    fn parse_vertex<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<VertexIndex, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.peek_is(b'(') {
            self.parse_internal_vertex(parser, tree)
        } else {
            self.parse_leaf(parser, tree)
        }
    }

    /// Parses internal vertex, adds it to tree, and returns its index:
    /// - `(children)[label][annotation][:branch_length]`
    fn parse_internal_vertex<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<VertexIndex, ParsingError> {
        let children = self.parse_children(parser, tree)?;
        let label = self.parse_internal_label(parser)?;
        let annotations = self.parse_annotations(parser)?;
        let branch_length = self.parse_branch_length(parser)?;

        let index = tree.add_internal_vertex(children, branch_length);
        tree[index].set_label(label);
        add_annotations(tree, annotations, index);

        Ok(index)
    }

    /// Parses children `(vertex,vertex,...)` and returns their indices:
    /// - Expects parser at opening `(`
    ///   (caller should skip leading comments/whitespace)
    fn parse_children<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<Vec<VertexIndex>, ParsingError> {
        if !parser.consume_if(b'(') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected '(' before children but found {:?}", next_char),
            ));
        }

        let mut children = vec![self.parse_vertex(parser, tree)?];
        loop {
            parser.skip_comment_and_whitespace()?;
            if parser.consume_if(b',') {
                children.push(self.parse_vertex(parser, tree)?);
            } else if parser.consume_if(b')') {
                return Ok(children);
            } else if parser.is_eof() {
                return Err(ParsingError::unexpected_eof(parser));
            } else {
                let next_char = parser.peek().map(char::from);
                return Err(ParsingError::invalid_newick_string(
                    parser,
                    format!("Expected ',' or ')' after child but found {:?}", next_char),
                ));
            }
        }
    }

    /// Parses leaf vertex and adds it to tree:
    /// - `label[annotation][:branch_length]`
    fn parse_leaf<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<VertexIndex, ParsingError> {
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        if label.is_empty() {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected leaf label but found {:?}", next_char),
            ));
        }
        let annotations = self.parse_annotations(parser)?;
        let branch_length = self.parse_branch_length(parser)?;

        let leaf_index = tree.add_leaf(branch_length, label);
        add_annotations(tree, annotations, leaf_index);

        Ok(leaf_index)
    }

    /// Parses the optional label after the closing `)` of an internal vertex,
    /// commonly a support value.
    fn parse_internal_label<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<String>, ParsingError> {
        // Annotations directly after ')' must not be skipped as comments
        parser.skip_whitespace();
        if self.parse_annotations && parser.peek_is_sequence(b"[&") {
            return Ok(None);
        }
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        Ok((!label.is_empty()).then_some(label))
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    fn parse_branch_length<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<BranchLength>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let mut branch_length_str = String::new();
        while let Some(b) = parser.peek() {
            // Valid characters for a float: digits, '.', '-', '+', 'e', 'E'
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                branch_length_str.push(b as char);
                parser.next_byte();
            } else {
                break;
            }
        }

        branch_length_str
            .parse::<f64>()
            .ok()
            .and_then(BranchLength::try_new)
            .map(Some)
            .ok_or_else(|| {
                ParsingError::invalid_newick_string(
                    parser,
                    format!("Invalid branch length: {:?}", branch_length_str),
                )
            })
    }

    /// Parses an annotation block `[&key=value,...]` if present and enabled.
    ///
    /// Note that `[` without `&` is a regular comment, not an annotation.
    /// Values that parse as numbers are stored as [BranchValue::Decimal],
    /// all others as [BranchValue::Text].
    fn parse_annotations<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
    ) -> Result<PendingAnnotations, ParsingError> {
        let mut annotations = Vec::new();
        if !self.parse_annotations {
            return Ok(annotations);
        }

        parser.skip_whitespace();
        if !parser.consume_if_sequence(b"[&") {
            return Ok(annotations);
        }

        loop {
            let key = parser.parse_unquoted_label(b"=,]");
            let key = key.trim();
            if key.is_empty() {
                return Err(ParsingError::invalid_annotation(
                    parser,
                    "Empty annotation key".to_string(),
                ));
            }
            if !parser.consume_if(b'=') {
                return Err(ParsingError::invalid_annotation(
                    parser,
                    format!("Expected '=' after annotation key '{}'", key),
                ));
            }

            let value_str = parser.parse_label(ANNOTATION_VALUE_DELIMITERS)?;
            let value_str = value_str.trim();
            if value_str.is_empty() {
                return Err(ParsingError::invalid_annotation(
                    parser,
                    format!("Empty annotation value for key '{}'", key),
                ));
            }
            let value = match value_str.parse::<f64>() {
                Ok(number) => BranchValue::Decimal(number),
                Err(_) => BranchValue::Text(value_str.to_string()),
            };
            annotations.push((key.to_string(), value));

            parser.skip_whitespace();
            if parser.consume_if(b',') {
                continue;
            }
            if parser.consume_if(b']') {
                return Ok(annotations);
            }
            return Err(ParsingError::invalid_annotation(
                parser,
                "Expected ']' at end of annotation block".to_string(),
            ));
        }
    }
}

/// Skips whitespace and comments up to the next tree, stopping in front of
/// a rooting comment `[&R]` or `[&U]`.
fn skip_to_tree_start<B: ByteSource>(parser: &mut ByteParser<B>) -> Result<(), ParsingError> {
    loop {
        parser.skip_whitespace();
        if parser.peek_is_sequence(b"[&R]") || parser.peek_is_sequence(b"[&U]") {
            return Ok(());
        }
        if !parser.skip_comment()? {
            return Ok(());
        }
    }
}

/// Stores parsed annotations of the vertex at `index`.
fn add_annotations(tree: &mut Tree, annotations: PendingAnnotations, index: VertexIndex) {
    for (key, value) in annotations {
        tree.annotations_mut().set(&key, index, value);
    }
}

// =#========================================================================#=
// NEWICK ITERATOR (lazy parser)
// =#========================================================================$=
/// Iterator to parse Newick trees lazily.
///
/// Created by [NewickParser::into_iter()].
/// Yields `Result<Tree, ParsingError>` for each tree and stops after the
/// first error.
pub struct NewickIterator<B: ByteSource = InMemoryByteSource> {
    parser: NewickParser,
    byte_parser: ByteParser<B>,
    done: bool,
}

impl<B: ByteSource> NewickIterator<B> {
    /// Consumes the iterator and returns the underlying [NewickParser].
    pub fn into_parser(self) -> NewickParser {
        self.parser
    }
}

impl<B: ByteSource> Iterator for NewickIterator<B> {
    type Item = Result<Tree, ParsingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Only whitespace and comments left (or none at all)
        if let Err(err) = skip_to_tree_start(&mut self.byte_parser) {
            self.done = true;
            return Some(Err(err));
        }
        if self.byte_parser.is_eof() {
            self.done = true;
            return None;
        }

        let result = self.parser.parse_tree(&mut self.byte_parser);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
