//! Pure combinatorics over predicate lists.

use super::erased::{AnyPredicate, PredicateKind};
use super::set::PredicateSet;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Cartesian product of the given groups, one element chosen per group.
///
/// An empty input yields an empty output. A group of size one still
/// participates, and an empty group empties the whole product.
///
/// ```rust
/// use statecraft::predicate::combinations;
///
/// let product = combinations(&[vec![1, 2], vec![3], vec![4, 5]]);
/// assert_eq!(
///     product,
///     vec![vec![1, 3, 4], vec![1, 3, 5], vec![2, 3, 4], vec![2, 3, 5]]
/// );
/// assert!(combinations::<u8>(&[]).is_empty());
/// ```
pub fn combinations<T: Clone>(groups: &[Vec<T>]) -> Vec<Vec<T>> {
    if groups.is_empty() {
        return Vec::new();
    }
    groups.iter().fold(vec![Vec::new()], |acc, group| {
        acc.iter()
            .flat_map(|prefix| {
                group.iter().map(move |item| {
                    let mut next = prefix.clone();
                    next.push(item.clone());
                    next
                })
            })
            .collect()
    })
}

/// Keep the first value seen for each kind, preserving order.
pub fn unique_by_kind<I>(values: I) -> Vec<AnyPredicate>
where
    I: IntoIterator<Item = AnyPredicate>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.kind()))
        .collect()
}

/// Group values by kind, preserving the order within each kind.
pub fn group_by_kind<'a, I>(values: I) -> BTreeMap<PredicateKind, Vec<AnyPredicate>>
where
    I: IntoIterator<Item = &'a AnyPredicate>,
{
    let mut groups: BTreeMap<PredicateKind, Vec<AnyPredicate>> = BTreeMap::new();
    for value in values {
        groups.entry(value.kind()).or_default().push(value.clone());
    }
    groups
}

/// The closed world over the given kinds: every combination of one value
/// per kind.
///
/// With no kinds the world holds a single empty set, so rows that do not
/// constrain predicates still have somewhere to land.
pub fn predicate_pool(kinds: &BTreeSet<PredicateKind>) -> HashSet<PredicateSet> {
    if kinds.is_empty() {
        return HashSet::from([PredicateSet::new()]);
    }
    let cases: Vec<Vec<AnyPredicate>> = kinds.iter().map(PredicateKind::all_cases).collect();
    combinations(&cases)
        .into_iter()
        .map(|combination| combination.into_iter().collect())
        .collect()
}
