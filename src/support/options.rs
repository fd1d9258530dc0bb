//! Configuration of [SupportTransfer](crate::support::SupportTransfer).

use crate::model::{AnnotationData, NodeData, VertexLabelData};
use crate::support::handler::{EquivalentBranchHandler, EquivalentBranchStrategy};

/// Default annotation key for transferred support values
pub const SUPPORT_KEY: &str = "support";
/// Default annotation key for conflict values
pub const CONFLICT_KEY: &str = "conflict";

/// Options for transferring support values between trees.
///
/// Defaults:
/// * leaves are identified by their label
/// * source values are read from vertex labels (Newick internal labels)
/// * support values are written to the annotation `"support"`
/// * conflict values are written to the annotation `"conflict"`
/// * text values are parsed as numbers
/// * several equivalent branches are listed, separated by `/`
#[derive(Debug)]
pub struct TransferOptions {
    pub(crate) leaf_data: Box<dyn NodeData>,
    pub(crate) source_data: Box<dyn NodeData>,
    pub(crate) support_data: Box<dyn NodeData>,
    pub(crate) conflict_data: Box<dyn NodeData>,
    pub(crate) parse_numeric_values: bool,
    pub(crate) handler: Box<dyn EquivalentBranchHandler>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        TransferOptions {
            leaf_data: Box::new(VertexLabelData),
            source_data: Box::new(VertexLabelData),
            support_data: Box::new(AnnotationData::new(SUPPORT_KEY)),
            conflict_data: Box::new(AnnotationData::new(CONFLICT_KEY)),
            parse_numeric_values: true,
            handler: EquivalentBranchStrategy::default().handler(),
        }
    }
}

impl TransferOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how leaves of both trees are identified.
    pub fn with_leaf_data(mut self, leaf_data: impl NodeData + 'static) -> Self {
        self.leaf_data = Box::new(leaf_data);
        self
    }

    /// Sets where values are read from in the source tree.
    pub fn with_source_data(mut self, source_data: impl NodeData + 'static) -> Self {
        self.source_data = Box::new(source_data);
        self
    }

    /// Sets where matched support values are written to in the target tree.
    pub fn with_support_data(mut self, support_data: impl NodeData + 'static) -> Self {
        self.support_data = Box::new(support_data);
        self
    }

    /// Sets where values of conflicting source branches are written to in
    /// the target tree.
    pub fn with_conflict_data(mut self, conflict_data: impl NodeData + 'static) -> Self {
        self.conflict_data = Box::new(conflict_data);
        self
    }

    /// Configures whether text values of the source are parsed as numbers.
    /// If disabled, only decimal values are transferred.
    pub fn with_parse_numeric_values(mut self, parse_numeric_values: bool) -> Self {
        self.parse_numeric_values = parse_numeric_values;
        self
    }

    /// Selects one of the built-in equivalent branch handlers.
    pub fn with_equivalent_branch_strategy(mut self, strategy: EquivalentBranchStrategy) -> Self {
        self.handler = strategy.handler();
        self
    }

    /// Replaces the equivalent branch handler with a custom one.
    pub fn with_equivalent_branch_handler(
        mut self,
        handler: impl EquivalentBranchHandler + 'static,
    ) -> Self {
        self.handler = Box::new(handler);
        self
    }
}
