//! Feature selection routines.
//!
//! This module contains the incremental relevance/redundancy search, which
//! grows a set of relevant features one combination size at a time and can
//! prune features whose marginal contribution falls below the threshold.
pub mod incremental_selection;
