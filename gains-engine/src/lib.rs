#![warn(missing_docs)]
//! Gains aggregation for warehouse exchange ledgers.
//!
//! [`compute_gains`] is a pure function from validated exchanges to a
//! [`gains_core::models::GainReport`]. [`GainsAnalyzer`] wires it to a
//! [`gains_core::ports::RecordStore`]: it checks the warehouse exists, fetches
//! its exchanges, validates them and runs the aggregation.

/// The aggregation itself.
mod engine;
pub use engine::*;

/// Store-backed orchestration of a single analysis.
mod analysis;
pub use analysis::*;

// We use non-std collections here for their ordering semantics and performance
pub(crate) type Map<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
