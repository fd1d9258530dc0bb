//! Split frequencies of a base tree across a stream of trees.

use crate::consensus::error::ConsensusError;
use crate::model::{AnnotationData, NodeData, Tree, VertexIndex, VertexLabelData};
use crate::topology::{LeafSet, TopologicalCalculator};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;
use tracing::{debug, info, instrument, trace};

/// Default annotation key for split frequencies
pub const FREQUENCY_KEY: &str = "frequency";

// =#========================================================================#=
// CONSENSUS OPTIONS
// =#========================================================================$=
/// Options for counting split frequencies.
///
/// Defaults: leaves are identified by their label, raw counts are written to
/// the annotation `"frequency"`.
#[derive(Debug)]
pub struct ConsensusOptions {
    leaf_data: Box<dyn NodeData>,
    target_data: Box<dyn NodeData>,
    normalization: Option<f64>,
}

impl Default for ConsensusOptions {
    fn default() -> Self {
        ConsensusOptions {
            leaf_data: Box::new(VertexLabelData),
            target_data: Box::new(AnnotationData::new(FREQUENCY_KEY)),
            normalization: None,
        }
    }
}

impl ConsensusOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how leaves of all trees are identified.
    pub fn with_leaf_data(mut self, leaf_data: impl NodeData + 'static) -> Self {
        self.leaf_data = Box::new(leaf_data);
        self
    }

    /// Sets where the frequencies are written to in the base tree.
    pub fn with_target_data(mut self, target_data: impl NodeData + 'static) -> Self {
        self.target_data = Box::new(target_data);
        self
    }

    /// Scales counts to `count / trees * max`, e.g. `100.0` for percentages
    /// or `1.0` for proportions.
    pub fn with_normalization(mut self, max: f64) -> Self {
        self.normalization = Some(max);
        self
    }
}

// =#========================================================================#=
// SPLIT COUNTER
// =#========================================================================$=
/// Counts how many trees of a stream contain each split of a base tree.
///
/// A split and its complement are the same split, so an input vertex is
/// matched against both. Every base vertex is credited at most once per
/// input tree.
///
/// # Example
/// ```
/// use splitwick::consensus::SplitCounter;
/// use splitwick::model::{AnnotationData, NodeData};
/// use splitwick::newick::NewickParser;
///
/// let mut base = NewickParser::new().parse_str("((A,B),(C,D));").unwrap();
/// let trees = NewickParser::new()
///     .parse_all(b"((A,B),(C,D));((A,C),(B,D));".to_vec())
///     .unwrap();
///
/// let report = SplitCounter::default()
///     .count(&mut base, trees.into_iter().map(Ok::<_, std::io::Error>))
///     .unwrap();
///
/// let ab = base.root().children()[0];
/// assert_eq!(report.trees_processed, 2);
/// assert_eq!(AnnotationData::new("frequency").decimal(&base, ab), Some(1.0));
/// ```
#[derive(Debug, Default)]
pub struct SplitCounter {
    options: ConsensusOptions,
}

impl SplitCounter {
    pub fn new(options: ConsensusOptions) -> Self {
        SplitCounter { options }
    }

    /// Counts the splits of `base` in all `trees` and writes the
    /// (normalized) counts onto the internal non-root vertices of `base`.
    ///
    /// Trees are pulled one at a time. If the stream yields an error, the
    /// count is aborted and `base` is left unchanged.
    #[instrument(skip_all)]
    pub fn count<I, E>(&self, base: &mut Tree, trees: I) -> Result<ConsensusReport, ConsensusError>
    where
        I: IntoIterator<Item = Result<Tree, E>>,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let mut calculator = TopologicalCalculator::new(self.options.leaf_data.as_ref());
        calculator.build_index_map(base);
        let base_sets = calculator.decorate(base)?;

        let base_vertices: Vec<VertexIndex> = base
            .pre_order_iter()
            .filter(|vertex| vertex.is_internal() && !vertex.is_root())
            .map(|vertex| vertex.index())
            .collect();

        let mut splits: HashMap<LeafSet, usize> = HashMap::with_capacity(base_vertices.len());
        for (position, &vertex) in base_vertices.iter().enumerate() {
            splits.entry(base_sets.get(vertex)?.clone()).or_insert(position);
        }
        debug!(splits = splits.len(), leaves = calculator.index_map().len(), "indexed base tree splits");

        let mut counts = vec![0usize; base_vertices.len()];
        let mut unknown_leaves: Vec<String> = Vec::new();
        let mut seen_unknown: HashSet<String> = HashSet::new();
        let mut trees_processed = 0;

        for (number, tree) in trees.into_iter().enumerate() {
            let tree = tree.map_err(|error| ConsensusError::Stream {
                tree: number,
                source: error.into(),
            })?;

            for leaf in calculator.leaf_identifiers(&tree) {
                if !calculator.index_map().contains_label(&leaf) && seen_unknown.insert(leaf.clone()) {
                    unknown_leaves.push(leaf);
                }
            }

            let tree_sets = calculator.decorate(&tree)?;
            let root_set = tree_sets.get(tree.root_index())?;
            let mut hits: HashSet<usize> = HashSet::new();
            for vertex in tree.pre_order_iter().filter(|v| v.is_internal() && !v.is_root()) {
                let set = tree_sets.get(vertex.index())?;
                if set.is_empty() {
                    continue;
                }
                if let Some(&position) = splits.get(set) {
                    hits.insert(position);
                }
                let complement = set.complement_within(root_set)?;
                if complement.is_empty() {
                    continue;
                }
                if let Some(&position) = splits.get(&complement) {
                    hits.insert(position);
                }
            }
            trace!(tree = number, hits = hits.len(), "counted splits");

            for position in hits {
                counts[position] += 1;
            }
            trees_processed += 1;
        }

        for (&vertex, &count) in base_vertices.iter().zip(&counts) {
            let value = match self.options.normalization {
                Some(max) if trees_processed > 0 => count as f64 / trees_processed as f64 * max,
                _ => count as f64,
            };
            self.options.target_data.set_decimal(base, vertex, value);
        }

        let report = ConsensusReport {
            trees_processed,
            unknown_leaves,
        };
        info!(trees = report.trees_processed, "counted split frequencies");
        Ok(report)
    }
}

// =#========================================================================#=
// CONSENSUS REPORT
// =#========================================================================$=
/// Summary of a [SplitCounter::count] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsensusReport {
    /// Number of trees read from the stream
    pub trees_processed: usize,
    /// Leaves of stream trees that do not occur in the base tree
    pub unknown_leaves: Vec<String>,
}

impl fmt::Display for ConsensusReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} trees processed", self.trees_processed)?;
        if !self.unknown_leaves.is_empty() {
            write!(
                f,
                ", leaves unknown to the base tree: {}",
                self.unknown_leaves.join(", ")
            )?;
        }
        Ok(())
    }
}
