//! Strategies for target branches matching several equivalent source branches.
//!
//! In an unrooted tree drawn with a root, the two branches at the root encode
//! the same split. A target branch matching that split therefore finds two
//! exact matches, each possibly carrying its own value. An
//! [EquivalentBranchHandler] decides what to write in that case.

use crate::model::BranchValue;
use std::fmt::Debug;

/// Default separator of [ListHandler]
pub const DEFAULT_SEPARATOR: &str = "/";

/// Result of combining the values of equivalent source branches.
#[derive(Debug, Clone, PartialEq)]
pub struct EquivalentBranchOutcome {
    /// Value to write onto the target branch; [BranchValue::Empty] writes nothing
    pub value: BranchValue,
    /// Whether more than one value was mapped onto the target branch
    pub multiple: bool,
}

/// Combines the numeric values of all exactly matching source branches.
///
/// `values` holds one entry per matching source branch that carries a
/// numeric value, ordered closest to the root first.
pub trait EquivalentBranchHandler: Debug {
    fn handle(&self, values: &[f64]) -> EquivalentBranchOutcome;
}

// =#========================================================================#=
// STRATEGIES
// =#========================================================================$=
/// Configuration-level choice of the built-in handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquivalentBranchStrategy {
    /// Writes a single value as decimal, several as text joined by `separator`
    List { separator: String },
    /// Writes the value of the branch closest to the root
    First,
    /// Writes the largest value
    Maximum,
}

impl Default for EquivalentBranchStrategy {
    fn default() -> Self {
        EquivalentBranchStrategy::List {
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl EquivalentBranchStrategy {
    /// Creates the handler implementing this strategy.
    pub fn handler(&self) -> Box<dyn EquivalentBranchHandler> {
        match self {
            EquivalentBranchStrategy::List { separator } => Box::new(ListHandler::new(separator.clone())),
            EquivalentBranchStrategy::First => Box::new(FirstHandler),
            EquivalentBranchStrategy::Maximum => Box::new(MaximumHandler),
        }
    }
}

/// Lists all values: one value is written as decimal, several as a text
/// such as `"87/92"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListHandler {
    separator: String,
}

impl ListHandler {
    pub fn new(separator: impl Into<String>) -> Self {
        ListHandler {
            separator: separator.into(),
        }
    }
}

impl Default for ListHandler {
    fn default() -> Self {
        ListHandler::new(DEFAULT_SEPARATOR)
    }
}

impl EquivalentBranchHandler for ListHandler {
    fn handle(&self, values: &[f64]) -> EquivalentBranchOutcome {
        match values {
            [] => single(None),
            [value] => single(Some(*value)),
            _ => {
                let joined = values
                    .iter()
                    .map(f64::to_string)
                    .collect::<Vec<_>>()
                    .join(&self.separator);
                EquivalentBranchOutcome {
                    value: BranchValue::Text(joined),
                    multiple: true,
                }
            }
        }
    }
}

/// Uses the value of the first matching branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstHandler;

impl EquivalentBranchHandler for FirstHandler {
    fn handle(&self, values: &[f64]) -> EquivalentBranchOutcome {
        EquivalentBranchOutcome {
            multiple: values.len() > 1,
            ..single(values.first().copied())
        }
    }
}

/// Uses the largest value of all matching branches.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaximumHandler;

impl EquivalentBranchHandler for MaximumHandler {
    fn handle(&self, values: &[f64]) -> EquivalentBranchOutcome {
        let maximum = values.iter().copied().reduce(f64::max);
        EquivalentBranchOutcome {
            multiple: values.len() > 1,
            ..single(maximum)
        }
    }
}

fn single(value: Option<f64>) -> EquivalentBranchOutcome {
    EquivalentBranchOutcome {
        value: BranchValue::from(value),
        multiple: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_handler() {
        let handler = ListHandler::default();
        assert_eq!(handler.handle(&[]).value, BranchValue::Empty);
        assert_eq!(
            handler.handle(&[95.0]),
            EquivalentBranchOutcome {
                value: BranchValue::Decimal(95.0),
                multiple: false
            }
        );
        assert_eq!(
            handler.handle(&[87.0, 92.5]),
            EquivalentBranchOutcome {
                value: BranchValue::Text("87/92.5".to_string()),
                multiple: true
            }
        );
    }

    #[test]
    fn test_first_and_maximum_handler() {
        assert_eq!(FirstHandler.handle(&[3.0, 7.0]).value, BranchValue::Decimal(3.0));
        assert!(FirstHandler.handle(&[3.0, 7.0]).multiple);
        assert_eq!(MaximumHandler.handle(&[3.0, 7.0]).value, BranchValue::Decimal(7.0));
        assert!(!MaximumHandler.handle(&[3.0]).multiple);
        assert!(MaximumHandler.handle(&[]).value.is_empty());
    }

    #[test]
    fn test_strategy_handler_uses_separator() {
        let strategy = EquivalentBranchStrategy::List {
            separator: "|".to_string(),
        };
        assert_eq!(
            strategy.handler().handle(&[1.0, 2.0]).value,
            BranchValue::Text("1|2".to_string())
        );
    }
}
