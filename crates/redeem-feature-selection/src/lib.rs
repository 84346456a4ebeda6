//! redeem-feature-selection: incremental relevance/redundancy feature selection.
//!
//! This crate provides the incremental selection search (grow the set of
//! relevant features one combination size at a time, optionally pruning
//! redundant members), a bounded memoizing wrapper around arbitrary scoring
//! functions, a lazy combination generator, and a couple of reference
//! scorers over `ndarray` data matrices.
//!
//! The scoring function itself is supplied by the caller through the
//! [`Scorer`](scorer::Scorer) trait; closures work out of the box.
pub mod combinations;
pub mod config;
pub mod error;
pub mod feature_selection;
pub mod feature_set;
pub mod memoized;
pub mod scorer;
pub mod scorers;

pub use config::SelectionConfig;
pub use error::SelectionError;
pub use feature_selection::incremental_selection::{
    incremental_selection, IncrementalSelection, Selection, TierReport,
};
pub use feature_set::FeatureSet;
pub use memoized::{CacheStats, MemoizedScorer};
pub use scorer::{from_fn, Scorer};
