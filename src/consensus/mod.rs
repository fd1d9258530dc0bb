//! Majority-rule split frequencies.
//!
//! [SplitCounter] annotates every branch of a base tree with the number (or
//! fraction) of trees in a stream that contain the same split, e.g. to
//! compute posterior clade probabilities of a summary tree from an MCMC
//! sample.

pub mod counter;
pub mod error;

pub use counter::{ConsensusOptions, ConsensusReport, SplitCounter};
pub use error::ConsensusError;
