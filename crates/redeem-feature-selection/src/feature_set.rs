//! Unordered, duplicate-free collections of features.
//!
//! A `FeatureSet` is backed by a `BTreeSet`, so its iteration order is the
//! ascending order of the features. That order is the canonical
//! representation used for cache keys and for every "examine members in
//! order" step of the selection search.

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureSet<F> {
    inner: BTreeSet<F>,
}

impl<F: Ord> FeatureSet<F> {
    pub fn new() -> Self {
        FeatureSet { inner: BTreeSet::new() }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, feature: &F) -> bool {
        self.inner.contains(feature)
    }

    /// Adds a feature, returning `false` if it was already present.
    pub fn insert(&mut self, feature: F) -> bool {
        self.inner.insert(feature)
    }

    pub fn remove(&mut self, feature: &F) -> bool {
        self.inner.remove(feature)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Iterates in canonical (ascending) order.
    pub fn iter(&self) -> btree_set::Iter<'_, F> {
        self.inner.iter()
    }

    pub fn is_disjoint(&self, other: &FeatureSet<F>) -> bool {
        self.inner.is_disjoint(&other.inner)
    }

    pub fn is_subset(&self, other: &FeatureSet<F>) -> bool {
        self.inner.is_subset(&other.inner)
    }

    /// Adds every member of `other` to `self`.
    pub fn union_with(&mut self, other: &FeatureSet<F>)
    where
        F: Clone,
    {
        self.inner.extend(other.inner.iter().cloned());
    }
}

impl<F: Ord + Clone> FeatureSet<F> {
    /// Members of `self` that are not in `other`.
    pub fn difference(&self, other: &FeatureSet<F>) -> FeatureSet<F> {
        self.inner.difference(&other.inner).cloned().collect()
    }

    pub fn union(&self, other: &FeatureSet<F>) -> FeatureSet<F> {
        self.inner.union(&other.inner).cloned().collect()
    }

    pub fn intersection(&self, other: &FeatureSet<F>) -> FeatureSet<F> {
        self.inner.intersection(&other.inner).cloned().collect()
    }

    /// A copy of `self` with `feature` removed.
    pub fn without(&self, feature: &F) -> FeatureSet<F> {
        let mut out = self.clone();
        out.inner.remove(feature);
        out
    }

    /// Members in canonical order, as an owned vector.
    pub fn to_vec(&self) -> Vec<F> {
        self.inner.iter().cloned().collect()
    }
}

impl<F: Ord> Default for FeatureSet<F> {
    fn default() -> Self {
        FeatureSet::new()
    }
}

impl<F: Ord> FromIterator<F> for FeatureSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        FeatureSet {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<F: Ord> Extend<F> for FeatureSet<F> {
    fn extend<I: IntoIterator<Item = F>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

impl<F> IntoIterator for FeatureSet<F> {
    type Item = F;
    type IntoIter = btree_set::IntoIter<F>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, F> IntoIterator for &'a FeatureSet<F> {
    type Item = &'a F;
    type IntoIter = btree_set::Iter<'a, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<F: Ord, const N: usize> From<[F; N]> for FeatureSet<F> {
    fn from(features: [F; N]) -> Self {
        features.into_iter().collect()
    }
}

impl<F: Ord> From<Vec<F>> for FeatureSet<F> {
    fn from(features: Vec<F>) -> Self {
        features.into_iter().collect()
    }
}

impl<F: Ord> From<BTreeSet<F>> for FeatureSet<F> {
    fn from(inner: BTreeSet<F>) -> Self {
        FeatureSet { inner }
    }
}

impl<F: fmt::Debug> fmt::Debug for FeatureSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.inner.iter()).finish()
    }
}

impl<F: fmt::Display> fmt::Display for FeatureSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, feature) in self.inner.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", feature)?;
        }
        write!(f, "}}")
    }
}
