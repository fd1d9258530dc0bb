//! Transfer of support values from a source tree onto a target tree.

use crate::model::{Tree, VertexIndex};
use crate::support::options::TransferOptions;
use crate::topology::error::Result;
use crate::topology::{LeafSet, TopologicalCalculator, TreeLeafSets};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, instrument, trace, warn};

/// Branches with fewer shared leaves on either side are not compared
pub const MIN_LEAVES_PER_SIDE: usize = 2;

/// The decorated source tree of one transfer, with the calculator that
/// decorated it.
struct Source<'a> {
    calculator: &'a TopologicalCalculator<'a>,
    tree: &'a Tree,
    leaf_sets: &'a TreeLeafSets,
}

// =#========================================================================#=
// SUPPORT TRANSFER
// =#========================================================================$=
/// Copies values of the branches of a source tree onto the topologically
/// corresponding branches of a target tree.
///
/// For each internal branch of the target, the branch's split is looked up
/// in the source:
/// * exact match: the values of all matching source branches are combined
///   by the configured [EquivalentBranchHandler](crate::support::EquivalentBranchHandler)
///   and written as support value
/// * no exact match, but a source branch conflicts with the split: the
///   conflicting branch's value is written as conflict value
/// * otherwise the target branch stays unannotated
///
/// Only leaves present in both trees take part in the comparison.
///
/// # Example
/// ```
/// use splitwick::model::{AnnotationData, BranchValue, NodeData};
/// use splitwick::newick::NewickParser;
/// use splitwick::support::SupportTransfer;
///
/// let source = NewickParser::new().parse_str("((A,B)95,(C,D));").unwrap();
/// let mut target = NewickParser::new().parse_str("((A,B),(C,D));").unwrap();
///
/// let report = SupportTransfer::default().transfer(&source, &mut target).unwrap();
///
/// let ab = target.root().children()[0];
/// assert_eq!(AnnotationData::new("support").value(&target, ab), BranchValue::Decimal(95.0));
/// assert!(report.warning().is_none());
/// ```
#[derive(Debug, Default)]
pub struct SupportTransfer {
    options: TransferOptions,
}

impl SupportTransfer {
    pub fn new(options: TransferOptions) -> Self {
        SupportTransfer { options }
    }

    pub fn options(&self) -> &TransferOptions {
        &self.options
    }

    /// Transfers values from `source` onto `target`.
    ///
    /// Data mismatches never fail the transfer; they are collected in the
    /// returned [TransferReport].
    ///
    /// # Errors
    /// Only on violated invariants of the bipartition machinery.
    #[instrument(skip_all)]
    pub fn transfer(&self, source: &Tree, target: &mut Tree) -> Result<TransferReport> {
        let mut calculator = TopologicalCalculator::new(self.options.leaf_data.as_ref());

        calculator.build_index_map(target);
        let unmatched_target_leaves = calculator
            .restrict_index_map_to_shared_leaves(source)
            .to_vec();

        let target_leaves: HashSet<String> = calculator.leaf_identifiers(target).into_iter().collect();
        let unmatched_source_leaves: Vec<String> = calculator
            .leaf_identifiers(source)
            .into_iter()
            .filter(|leaf| !target_leaves.contains(leaf))
            .collect();

        let source_sets = calculator.decorate(source)?;
        let target_sets = calculator.decorate(target)?;

        let mut report = TransferReport {
            unmatched_source_leaves,
            unmatched_target_leaves,
            ..TransferReport::default()
        };

        let source_context = Source {
            calculator: &calculator,
            tree: source,
            leaf_sets: &source_sets,
        };
        let internal_vertices: Vec<VertexIndex> = target
            .pre_order_iter()
            .filter(|vertex| vertex.is_internal())
            .map(|vertex| vertex.index())
            .collect();

        for vertex in internal_vertices {
            let query = target_sets.get(vertex)?;
            if query.min_side() < MIN_LEAVES_PER_SIDE {
                trace!(vertex, split = %query, "too few shared leaves, skipped");
                report.skipped += 1;
                continue;
            }
            self.transfer_branch(&source_context, target, vertex, query, &mut report)?;
        }

        debug!(
            matched = report.matched,
            conflicting = report.conflicting,
            unresolved = report.unresolved,
            skipped = report.skipped,
            "transferred support values"
        );
        if let Some(warning) = report.warning() {
            warn!("{}", warning);
        }

        Ok(report)
    }

    fn transfer_branch(
        &self,
        source: &Source,
        target: &mut Tree,
        vertex: VertexIndex,
        query: &LeafSet,
        report: &mut TransferReport,
    ) -> Result<()> {
        let matches = source.calculator.find_best_matches(source.tree, source.leaf_sets, query)?;
        debug_assert!(!matches.is_empty(), "source root always contains the split");
        let Some(best) = matches.first() else {
            report.unresolved += 1;
            return Ok(());
        };

        if best.is_exact() {
            let values: Vec<f64> = matches
                .iter()
                .filter_map(|info| self.source_value(source.tree, info.vertex))
                .collect();
            let outcome = self.options.handler.handle(&values);
            trace!(vertex, matches = matches.len(), value = %outcome.value, "exact match");

            report.matched += 1;
            report.multiple_values_mapped |= outcome.multiple;
            if !outcome.value.is_empty() {
                self.options.support_data.set_value(target, vertex, outcome.value);
            }
            return Ok(());
        }

        let conflict = source
            .calculator
            .find_highest_conflict(source.tree, source.leaf_sets, best.vertex, query)?;
        let conflict_value = match conflict {
            Some(conflict) if source.leaf_sets.get(conflict)?.min_side() >= MIN_LEAVES_PER_SIDE => {
                self.source_value(source.tree, conflict)
            }
            _ => None,
        };

        match conflict_value {
            Some(value) => {
                trace!(vertex, conflict = ?conflict, value, "conflicting source branch");
                report.conflicting += 1;
                self.options.conflict_data.set_decimal(target, vertex, value);
            }
            None => {
                trace!(vertex, "no exact match and no qualifying conflict");
                report.unresolved += 1;
            }
        }
        Ok(())
    }

    fn source_value(&self, source: &Tree, vertex: VertexIndex) -> Option<f64> {
        self.options
            .source_data
            .value(source, vertex)
            .to_number(self.options.parse_numeric_values)
    }
}

// =#========================================================================#=
// TRANSFER REPORT
// =#========================================================================$=
/// Diagnostics of a [SupportTransfer::transfer] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Leaves of the source without counterpart in the target
    pub unmatched_source_leaves: Vec<String>,
    /// Leaves of the target without counterpart in the source
    pub unmatched_target_leaves: Vec<String>,
    /// Whether several source values were mapped onto one target branch
    pub multiple_values_mapped: bool,
    /// Target branches with an exact match in the source
    pub matched: usize,
    /// Target branches that received a conflict value
    pub conflicting: usize,
    /// Target branches without exact match or qualifying conflict
    pub unresolved: usize,
    /// Target branches with too few shared leaves on one side
    pub skipped: usize,
}

impl TransferReport {
    /// Returns the aggregated, human-readable warning, or `None` if there
    /// is nothing to report.
    pub fn warning(&self) -> Option<String> {
        let mut messages = Vec::new();
        if !self.unmatched_source_leaves.is_empty() {
            messages.push(format!(
                "{} leaves of the source tree have no counterpart in the target tree and were ignored: {}",
                self.unmatched_source_leaves.len(),
                self.unmatched_source_leaves.join(", ")
            ));
        }
        if self.multiple_values_mapped {
            messages.push(
                "Some target branches match several equivalent source branches; their values were combined."
                    .to_string(),
            );
        }

        (!messages.is_empty()).then(|| messages.join("\n"))
    }
}

impl fmt::Display for TransferReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} matched, {} conflicting, {} unresolved, {} skipped",
            self.matched, self.conflicting, self.unresolved, self.skipped
        )?;
        if let Some(warning) = self.warning() {
            write!(f, "\n{}", warning)?;
        }
        Ok(())
    }
}
