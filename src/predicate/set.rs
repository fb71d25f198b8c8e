//! Unordered sets of predicate values.

use super::erased::{AnyPredicate, PredicateKind};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// An unordered set of predicate values.
///
/// A well-formed set holds at most one value per kind. The type does not
/// enforce that; descriptor validation does.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateSet {
    values: BTreeSet<AnyPredicate>,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: AnyPredicate) -> bool {
        self.values.insert(value)
    }

    pub fn contains(&self, value: &AnyPredicate) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in their stable order (kind, then value).
    pub fn iter(&self) -> impl Iterator<Item = &AnyPredicate> {
        self.values.iter()
    }

    pub fn is_subset(&self, other: &PredicateSet) -> bool {
        self.values.is_subset(&other.values)
    }

    pub fn union(&self, other: &PredicateSet) -> PredicateSet {
        self.values.union(&other.values).cloned().collect()
    }

    pub fn kinds(&self) -> BTreeSet<PredicateKind> {
        self.values.iter().map(AnyPredicate::kind).collect()
    }

    /// True when no two values share a kind.
    pub fn has_unique_kinds(&self) -> bool {
        self.kinds().len() == self.values.len()
    }

    /// True when the sets have no kind in common.
    pub fn kinds_disjoint(&self, other: &PredicateSet) -> bool {
        self.kinds().is_disjoint(&other.kinds())
    }

    /// True when the sets share at least one value.
    pub fn shares_value_with(&self, other: &PredicateSet) -> bool {
        !self.values.is_disjoint(&other.values)
    }

    /// Every subset, largest first.
    ///
    /// Subsets of equal size come in lexicographic order of the positions
    /// of their elements, so the sequence is deterministic for a given set.
    pub fn subsets_by_size(&self) -> Vec<PredicateSet> {
        let values: Vec<&AnyPredicate> = self.values.iter().collect();
        let mut subsets = Vec::with_capacity(1usize << values.len().min(16));
        for size in (0..=values.len()).rev() {
            for indices in index_combinations(values.len(), size) {
                subsets.push(indices.into_iter().map(|i| values[i].clone()).collect());
            }
        }
        subsets
    }
}

/// All `k`-element index combinations of `0..n`, in lexicographic order.
fn index_combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k > n {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.clone());
        // Rightmost index that can still move forward.
        let Some(pivot) = (0..k).rev().find(|&i| indices[i] != i + n - k) else {
            return result;
        };
        indices[pivot] += 1;
        for i in pivot + 1..k {
            indices[i] = indices[i - 1] + 1;
        }
    }
}

impl FromIterator<AnyPredicate> for PredicateSet {
    fn from_iter<I: IntoIterator<Item = AnyPredicate>>(iter: I) -> Self {
        PredicateSet {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<HashSet<AnyPredicate>> for PredicateSet {
    fn from(values: HashSet<AnyPredicate>) -> Self {
        values.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a PredicateSet {
    type Item = &'a AnyPredicate;
    type IntoIter = std::collections::btree_set::Iter<'a, AnyPredicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Debug for PredicateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.iter()).finish()
    }
}

impl fmt::Display for PredicateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
