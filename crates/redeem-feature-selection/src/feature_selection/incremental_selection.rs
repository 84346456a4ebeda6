//! Incremental relevance/redundancy feature selection.
//!
//! For every combination size `i` from 1 to `max_size`:
//!
//! 1. Take the candidates not found relevant in the previous tier.
//! 2. Score every size-`i` subset of them; the members of each subset
//!    scoring strictly above `threshold` become this tier's relevant set.
//! 3. Optionally look for redundant members: for every size-`i + 1`
//!    subset of the relevant set that shares nothing with the redundant
//!    features found so far in this tier, flag the first member (in
//!    canonical order) whose removal lowers the score by strictly less
//!    than `threshold`.
//! 4. Add the relevant, non-redundant features to the result.
//!
//! The relevant set is cleared at the start of each tier, so tier `i`
//! only excludes what tier `i - 1` marked relevant.
//!
//! The redundancy pass is a heuristic: it flags at most one feature per
//! subset and never revisits subsets touching a flagged feature.

use std::fmt::Debug;
use std::hash::Hash;

use anyhow::Result;
use log::{debug, info, trace};
use rayon::prelude::*;

use crate::combinations::combinations;
use crate::config::SelectionConfig;
use crate::feature_set::FeatureSet;
use crate::memoized::{CacheStats, MemoizedScorer};
use crate::scorer::Scorer;

/// What one combination size contributed to a run.
#[derive(Debug, Clone, PartialEq)]
pub struct TierReport<F> {
    /// Combination size of this tier.
    pub size: usize,
    /// Number of subsets scored for relevance.
    pub candidates: usize,
    pub relevant: FeatureSet<F>,
    pub redundant: FeatureSet<F>,
}

/// Outcome of [`IncrementalSelection::select`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<F> {
    pub features: FeatureSet<F>,
    pub tiers: Vec<TierReport<F>>,
    pub cache: CacheStats,
}

impl<F> Selection<F> {
    pub fn into_features(self) -> FeatureSet<F> {
        self.features
    }
}

#[derive(Debug, Clone, Default)]
pub struct IncrementalSelection {
    config: SelectionConfig,
}

impl IncrementalSelection {
    pub fn new(config: SelectionConfig) -> Self {
        IncrementalSelection { config }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Select the relevant, and optionally non-redundant, subset of `features`.
    ///
    /// # Arguments
    ///
    /// * `features` - The candidate features.
    /// * `scorer` - Deterministic scoring function, defined on every subset of
    ///   `features` including the empty set.
    ///
    /// # Returns
    ///
    /// The selected features together with a per-tier report. The first
    /// scorer failure aborts the run and is returned as the error.
    pub fn select<F, S>(&self, features: &FeatureSet<F>, scorer: &S) -> Result<Selection<F>>
    where
        F: Ord + Hash + Clone + Debug + Send + Sync,
        S: Scorer<F> + Sync + ?Sized,
    {
        self.config.validate()?;
        let capacity = self.config.cache_capacity_for(features.len());
        let cache = MemoizedScorer::new(scorer, capacity)?;

        info!(
            "Selecting from {} features (threshold: {}, max size: {}, remove redundant: {}, cache capacity: {})",
            features.len(),
            self.config.threshold,
            self.config.max_size,
            self.config.remove_redundant,
            capacity
        );

        let mut rel = FeatureSet::new();
        let mut res = FeatureSet::new();
        let mut tiers = Vec::with_capacity(self.config.max_size);

        for size in 1..=self.config.max_size {
            let candidates = features.difference(&rel);
            let (n_candidates, relevant) = self.relevant_features(&cache, &candidates, size)?;
            rel = relevant;

            let redundant = if self.config.remove_redundant {
                self.redundant_features(&cache, &rel, size)?
            } else {
                FeatureSet::new()
            };
            res.union_with(&rel.difference(&redundant));

            debug!(
                "Tier {}: scored {} subsets, {} relevant, {} redundant, {} selected so far",
                size,
                n_candidates,
                rel.len(),
                redundant.len(),
                res.len()
            );
            tiers.push(TierReport {
                size,
                candidates: n_candidates,
                relevant: rel.clone(),
                redundant,
            });
        }

        let stats = cache.stats();
        info!(
            "Selected {} of {} features ({} scorer calls, {} cache hits)",
            res.len(),
            features.len(),
            stats.misses,
            stats.hits
        );

        Ok(Selection {
            features: res,
            tiers,
            cache: stats,
        })
    }

    /// Union of every size-`size` subset of `candidates` that scores above
    /// the threshold, along with the number of subsets scored.
    fn relevant_features<F, S>(
        &self,
        cache: &MemoizedScorer<'_, F, S>,
        candidates: &FeatureSet<F>,
        size: usize,
    ) -> Result<(usize, FeatureSet<F>)>
    where
        F: Ord + Hash + Clone + Debug + Send + Sync,
        S: Scorer<F> + Sync + ?Sized,
    {
        let threshold = self.config.threshold;

        if self.config.parallel {
            return combinations(candidates, size)
                .par_bridge()
                .try_fold(
                    || (0usize, FeatureSet::new()),
                    |(n, mut relevant), fs| -> Result<(usize, FeatureSet<F>)> {
                        if cache.evaluate(&fs)? > threshold {
                            relevant.union_with(&fs);
                        }
                        Ok((n + 1, relevant))
                    },
                )
                .try_reduce(
                    || (0usize, FeatureSet::new()),
                    |(n_a, mut a), (n_b, b)| {
                        a.union_with(&b);
                        Ok((n_a + n_b, a))
                    },
                );
        }

        let mut n = 0;
        let mut relevant = FeatureSet::new();
        for fs in combinations(candidates, size) {
            n += 1;
            let score = cache.evaluate(&fs)?;
            if score > threshold {
                trace!("{:?} is relevant (score {})", fs, score);
                relevant.union_with(&fs);
            }
        }
        Ok((n, relevant))
    }

    /// Features of `relevant` whose marginal contribution to some
    /// size-`size + 1` subset is below the threshold.
    fn redundant_features<F, S>(
        &self,
        cache: &MemoizedScorer<'_, F, S>,
        relevant: &FeatureSet<F>,
        size: usize,
    ) -> Result<FeatureSet<F>>
    where
        F: Ord + Hash + Clone + Debug + Send + Sync,
        S: Scorer<F> + Sync + ?Sized,
    {
        let threshold = self.config.threshold;

        if self.config.parallel {
            // Warm the cache with the size + 1 scores only; the pass below
            // depends on visiting order. Each `fs - {f}` is a size-`size`
            // subset of the relevant set, already scored by the relevance pass.
            combinations(relevant, size + 1)
                .par_bridge()
                .try_for_each(|fs| cache.evaluate(&fs).map(|_| ()))?;
        }

        let mut redundant = FeatureSet::new();
        for fs in combinations(relevant, size + 1) {
            if !fs.is_disjoint(&redundant) {
                continue;
            }
            let score = cache.evaluate(&fs)?;
            for f in fs.iter() {
                let marginal = score - cache.evaluate(&fs.without(f))?;
                if marginal < threshold {
                    trace!("{:?} is redundant in {:?} (marginal {})", f, fs, marginal);
                    redundant.insert(f.clone());
                    break;
                }
            }
        }
        Ok(redundant)
    }
}

/// Run an incremental selection with the given parameters and a fresh cache.
///
/// # Arguments
///
/// * `features` - The initial set of features to be selected from.
/// * `scorer` - The function scoring a set of features.
/// * `threshold` - Score a feature set must exceed to be relevant.
/// * `max_size` - The largest feature set size tested for relevance. Must be at least 1.
/// * `remove_redundant` - Whether redundant features are discarded.
///
/// # Returns
///
/// The selected features, always a subset of `features`.
pub fn incremental_selection<F, S>(
    features: &FeatureSet<F>,
    scorer: &S,
    threshold: f64,
    max_size: usize,
    remove_redundant: bool,
) -> Result<FeatureSet<F>>
where
    F: Ord + Hash + Clone + Debug + Send + Sync,
    S: Scorer<F> + Sync + ?Sized,
{
    let config = SelectionConfig::new(threshold, max_size).with_remove_redundant(remove_redundant);
    IncrementalSelection::new(config)
        .select(features, scorer)
        .map(Selection::into_features)
}
