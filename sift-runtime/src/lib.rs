//! Sift Runtime
//!
//! Concurrent fan-out of the network matchers and merge of their results.

pub mod aggregator;

pub use aggregator::*;
