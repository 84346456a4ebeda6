//! Lazy "n choose k" enumeration over feature sets.
//!
//! Subsets are produced one at a time from an index odometer over the
//! canonical order of the input set, so peak memory stays at one subset
//! regardless of how many combinations exist. Enumeration is still
//! combinatorial in the size of the input; callers bound `k`.

use crate::feature_set::FeatureSet;

/// Number of size-`k` subsets of an `n`-element set, saturating at `usize::MAX`.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: usize = 1;
    for i in 0..k {
        // C(n, i + 1) = C(n, i) * (n - i) / (i + 1), exact at every step
        result = match result.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return usize::MAX,
        };
    }
    result
}

/// Iterator over all size-`k` subsets of a feature set, in lexicographic
/// order of the canonical feature ordering.
#[derive(Debug, Clone)]
pub struct Combinations<F> {
    items: Vec<F>,
    indices: Vec<usize>,
    remaining: usize,
}

impl<F: Ord + Clone> Combinations<F> {
    fn from_items(items: Vec<F>, k: usize) -> Self {
        let remaining = binomial(items.len(), k);
        Combinations {
            items,
            indices: (0..k).collect(),
            remaining,
        }
    }

    /// Moves the odometer to the next combination. Returns `false` once the
    /// last combination has been passed.
    fn advance(&mut self) -> bool {
        let n = self.items.len();
        let k = self.indices.len();
        let mut i = k;
        while i > 0 {
            i -= 1;
            if self.indices[i] != i + n - k {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return true;
            }
        }
        false
    }
}

impl<F: Ord + Clone> Iterator for Combinations<F> {
    type Item = FeatureSet<F>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let subset: FeatureSet<F> = self
            .indices
            .iter()
            .map(|&i| self.items[i].clone())
            .collect();
        self.remaining -= 1;
        if self.remaining > 0 && !self.advance() {
            self.remaining = 0;
        }
        Some(subset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// All subsets of `set` with exactly `k` members.
///
/// `k == 0` yields the single empty subset and `k > set.len()` yields
/// nothing.
pub fn combinations<F: Ord + Clone>(set: &FeatureSet<F>, k: usize) -> Combinations<F> {
    Combinations::from_items(set.to_vec(), k)
}

/// All non-empty subsets of `set` with at most `k` members, smallest sizes first.
pub fn combinations_up_to<F: Ord + Clone>(
    set: &FeatureSet<F>,
    k: usize,
) -> impl Iterator<Item = FeatureSet<F>> {
    let items = set.to_vec();
    let max = k.min(items.len());
    (1..=max).flat_map(move |size| Combinations::from_items(items.clone(), size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn abcd() -> FeatureSet<char> {
        ['a', 'b', 'c', 'd'].into()
    }

    #[test]
    fn binomial_values() {
        assert_eq!(binomial(4, 2), 6);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 5), 1);
        assert_eq!(binomial(3, 4), 0);
        assert_eq!(binomial(52, 5), 2_598_960);
        assert_eq!(binomial(0, 0), 1);
    }

    #[test]
    fn binomial_saturates() {
        assert_eq!(binomial(10_000, 5_000), usize::MAX);
    }

    #[test]
    fn pairs_are_distinct_and_complete() {
        let pairs: Vec<_> = combinations(&abcd(), 2).collect();
        assert_eq!(pairs.len(), 6);
        let unique: HashSet<_> = pairs.iter().cloned().collect();
        assert_eq!(unique.len(), 6);
        assert!(pairs.iter().all(|p| p.len() == 2 && p.is_subset(&abcd())));
        assert_eq!(pairs[0], ['a', 'b'].into());
        assert_eq!(pairs[5], ['c', 'd'].into());
    }

    #[test]
    fn size_zero_yields_empty_subset() {
        let subsets: Vec<_> = combinations(&abcd(), 0).collect();
        assert_eq!(subsets, vec![FeatureSet::new()]);

        let from_empty: Vec<_> = combinations(&FeatureSet::<char>::new(), 0).collect();
        assert_eq!(from_empty, vec![FeatureSet::new()]);
    }

    #[test]
    fn oversized_k_yields_nothing() {
        assert_eq!(combinations(&abcd(), 5).count(), 0);
        assert_eq!(combinations(&FeatureSet::<char>::new(), 1).count(), 0);
    }

    #[test]
    fn full_size_yields_the_set_itself() {
        let subsets: Vec<_> = combinations(&abcd(), 4).collect();
        assert_eq!(subsets, vec![abcd()]);
    }

    #[test]
    fn size_hint_tracks_remaining() {
        let mut it = combinations(&abcd(), 3);
        assert_eq!(it.size_hint(), (4, Some(4)));
        it.next();
        assert_eq!(it.size_hint(), (3, Some(3)));
    }

    #[test]
    fn up_to_covers_every_size() {
        let all: Vec<_> = combinations_up_to(&abcd(), 2).collect();
        assert_eq!(all.len(), 4 + 6);
        assert!(all[..4].iter().all(|s| s.len() == 1));
        assert!(all[4..].iter().all(|s| s.len() == 2));

        // bounded by the set size
        assert_eq!(combinations_up_to(&abcd(), 10).count(), 15);
    }
}
