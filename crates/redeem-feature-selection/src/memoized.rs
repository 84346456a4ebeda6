//! Bounded memoization of scorer results.
//!
//! Each distinct feature set is scored at most once while it stays in the
//! cache. Entries are evicted in least-recently-used order once the
//! capacity is reached; an evicted set is simply rescored on its next
//! request.
//!
//! The cache maps a feature set to a slot. A caller that misses creates
//! the slot, releases the cache lock and computes the score while holding
//! the slot's own lock. Concurrent callers for the same key find the slot
//! and block on it until the score is available, so a key never has two
//! computations in flight. A failed computation removes its slot from the
//! cache before releasing it; a waiter that then finds the slot empty and
//! unlinked goes back to the cache and joins whichever slot is live.
//!
//! Lock order is always slot, then cache.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use log::trace;
use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::feature_set::FeatureSet;
use crate::scorer::Scorer;

type Slot = Arc<Mutex<Option<f64>>>;

/// Counters describing cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Requests answered from a stored score.
    pub hits: usize,
    /// Requests that invoked the underlying scorer.
    pub misses: usize,
    /// Entries currently held.
    pub len: usize,
    pub capacity: usize,
}

pub struct MemoizedScorer<'a, F, S: ?Sized> {
    scorer: &'a S,
    cache: Mutex<LruCache<FeatureSet<F>, Slot>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<'a, F, S> MemoizedScorer<'a, F, S>
where
    F: Ord + Hash + Clone + std::fmt::Debug,
    S: Scorer<F> + ?Sized,
{
    /// Wrap `scorer` with a cache holding at most `capacity` scores.
    pub fn new(scorer: &'a S, capacity: usize) -> anyhow::Result<Self> {
        let capacity =
            NonZeroUsize::new(capacity).ok_or(SelectionError::InvalidCacheCapacity(capacity))?;
        // `LruCache::new` preallocates `capacity` slots, and the default
        // bound `n ^ max_size` is usually far above what a run touches.
        let mut cache = LruCache::unbounded();
        cache.resize(capacity);
        Ok(MemoizedScorer {
            scorer,
            cache: Mutex::new(cache),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        })
    }

    /// Score `features`, reusing a stored result when one exists.
    pub fn evaluate(&self, features: &FeatureSet<F>) -> anyhow::Result<f64> {
        loop {
            let slot = self.slot_for(features);
            let mut value = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(score) = *value {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(score);
            }
            // An empty slot that left the cache belongs to a failed (or
            // evicted) computation; join or create the live one instead.
            if !self.is_cached(features, &slot) {
                continue;
            }

            self.misses.fetch_add(1, Ordering::Relaxed);
            return match self.scorer.score(features) {
                Ok(score) => {
                    *value = Some(score);
                    Ok(score)
                }
                Err(err) => {
                    // Unlink while still holding the slot so waiters see it gone.
                    self.discard(features, &slot);
                    drop(value);
                    Err(err).with_context(|| format!("Failed to score feature set {:?}", features))
                }
            };
        }
    }

    pub fn stats(&self) -> CacheStats {
        let cache = self.lock_cache();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: cache.len(),
            capacity: cache.cap().get(),
        }
    }

    pub fn len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_cache().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock_cache().cap().get()
    }

    /// Drop every stored score. Counters are kept.
    pub fn clear(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> MutexGuard<'_, LruCache<FeatureSet<F>, Slot>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Existing slot for `features` (marked most recently used), or a fresh
    /// empty one inserted in its place.
    fn slot_for(&self, features: &FeatureSet<F>) -> Slot {
        let mut cache = self.lock_cache();
        if let Some(slot) = cache.get(features) {
            return Arc::clone(slot);
        }
        let slot: Slot = Arc::new(Mutex::new(None));
        if let Some((evicted, _)) = cache.push(features.clone(), Arc::clone(&slot)) {
            trace!("Evicted {:?} from score cache", evicted);
        }
        slot
    }

    fn is_cached(&self, features: &FeatureSet<F>, slot: &Slot) -> bool {
        self.lock_cache()
            .peek(features)
            .map_or(false, |current| Arc::ptr_eq(current, slot))
    }

    fn discard(&self, features: &FeatureSet<F>, slot: &Slot) {
        let mut cache = self.lock_cache();
        let same_slot = cache
            .peek(features)
            .map_or(false, |current| Arc::ptr_eq(current, slot));
        if same_slot {
            cache.pop(features);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_scorer(calls: &AtomicUsize) -> impl Fn(&FeatureSet<u32>) -> anyhow::Result<f64> + '_ {
        move |fs: &FeatureSet<u32>| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(fs.iter().map(|&f| f as f64).sum())
        }
    }

    #[test]
    fn repeated_queries_hit_the_cache() {
        let calls = AtomicUsize::new(0);
        let scorer = counting_scorer(&calls);
        let memo = MemoizedScorer::<u32, _>::new(&scorer, 8).unwrap();

        assert_eq!(memo.evaluate(&[1, 2].into()).unwrap(), 3.0);
        assert_eq!(memo.evaluate(&[2, 1].into()).unwrap(), 3.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stats = memo.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.len, 1);
        assert_eq!(stats.capacity, 8);
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let calls = AtomicUsize::new(0);
        let scorer = counting_scorer(&calls);
        let memo = MemoizedScorer::<u32, _>::new(&scorer, 2).unwrap();

        memo.evaluate(&[1].into()).unwrap();
        memo.evaluate(&[2].into()).unwrap();
        // touch {1} so {2} becomes the eviction candidate
        memo.evaluate(&[1].into()).unwrap();
        memo.evaluate(&[3].into()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        memo.evaluate(&[1].into()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(memo.evaluate(&[2].into()).unwrap(), 2.0);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let scorer = |_: &FeatureSet<u32>| -> anyhow::Result<f64> { Ok(0.0) };
        let err = MemoizedScorer::<u32, _>::new(&scorer, 0).err().unwrap();
        assert_eq!(
            err.downcast_ref::<SelectionError>(),
            Some(&SelectionError::InvalidCacheCapacity(0))
        );
    }

    #[test]
    fn failures_are_not_cached() {
        let calls = AtomicUsize::new(0);
        let scorer = |fs: &FeatureSet<u32>| -> anyhow::Result<f64> {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                anyhow::bail!("transient failure");
            }
            Ok(fs.len() as f64)
        };
        let memo = MemoizedScorer::<u32, _>::new(&scorer, 4).unwrap();

        let err = memo.evaluate(&[7].into()).unwrap_err();
        assert!(format!("{:#}", err).contains("transient failure"));
        assert!(memo.is_empty());

        assert_eq!(memo.evaluate(&[7].into()).unwrap(), 1.0);
        assert_eq!(memo.evaluate(&[7].into()).unwrap(), 1.0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn clear_forces_recomputation() {
        let calls = AtomicUsize::new(0);
        let scorer = counting_scorer(&calls);
        let memo = MemoizedScorer::<u32, _>::new(&scorer, 4).unwrap();

        memo.evaluate(&[5].into()).unwrap();
        memo.clear();
        assert!(memo.is_empty());
        memo.evaluate(&[5].into()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
