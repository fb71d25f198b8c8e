//! Match descriptors: boolean expressions over predicates.

use super::error::{MatchError, MatchErrorKind};
use crate::core::{Condition, Origin};
use crate::predicate::{combinations, AnyPredicate, PredicateKind, PredicateSet};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// `(any of group 1) AND (any of group 2) AND ... AND (all of all-list)`,
/// plus an optional runtime condition.
///
/// Every any-group holds values of one predicate type and the types of
/// different groups are distinct; the all-list holds values of distinct
/// types. [`MatchDescriptor::validate`] checks these rules.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Origin;
/// use statecraft::matching::MatchDescriptor;
/// use statecraft::predicate_enum;
///
/// predicate_enum! {
///     enum Speed { Slow, Fast }
/// }
/// predicate_enum! {
///     enum Road { Dry, Wet }
/// }
///
/// let descriptor = MatchDescriptor::new(Origin::here())
///     .with_any([Speed::Slow, Speed::Fast])
///     .with_all([Road::Wet]);
///
/// let expanded = descriptor.combine_any_and_all();
/// assert_eq!(expanded.len(), 2);
/// assert!(expanded.iter().all(|set| set.len() == 2));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MatchDescriptor {
    any: Vec<Vec<AnyPredicate>>,
    all: Vec<AnyPredicate>,
    condition: Option<Condition>,
    origins: Vec<Origin>,
}

/// A predicate set with the specificity of the descriptor that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RankedPredicates {
    pub predicates: PredicateSet,
    pub rank: usize,
}

/// Canonical, comparable form of a descriptor.
///
/// Two descriptors with the same key describe the same rule: group and
/// value order are ignored, and conditions compare only by presence since
/// closures cannot be compared.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    any: BTreeSet<BTreeSet<AnyPredicate>>,
    all: BTreeSet<AnyPredicate>,
    conditional: bool,
}

impl MatchDescriptor {
    /// An empty descriptor, which matches every predicate set.
    pub fn new(origin: Origin) -> Self {
        MatchDescriptor {
            origins: vec![origin],
            ..Self::default()
        }
    }

    /// Add an any-group: at least one of `values` must hold.
    pub fn with_any<I, P>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<AnyPredicate>,
    {
        let group: Vec<AnyPredicate> = values.into_iter().map(Into::into).collect();
        if !group.is_empty() {
            self.any.push(group);
        }
        self
    }

    /// Add values that must all hold.
    pub fn with_all<I, P>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<AnyPredicate>,
    {
        self.all.extend(values.into_iter().map(Into::into));
        self
    }

    /// Attach a runtime condition, ANDed with any existing one.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Condition::and_optional(self.condition.as_ref(), Some(&condition));
        self
    }

    pub fn any_groups(&self) -> &[Vec<AnyPredicate>] {
        &self.any
    }

    pub fn all_values(&self) -> &[AnyPredicate] {
        &self.all
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    pub fn origins(&self) -> &[Origin] {
        &self.origins
    }

    /// True when the descriptor constrains nothing.
    pub fn is_empty(&self) -> bool {
        self.any.is_empty() && self.all.is_empty() && self.condition.is_none()
    }

    /// Every predicate type the descriptor mentions.
    pub fn kinds(&self) -> BTreeSet<PredicateKind> {
        self.any
            .iter()
            .flatten()
            .chain(self.all.iter())
            .map(AnyPredicate::kind)
            .collect()
    }

    pub fn key(&self) -> MatchKey {
        MatchKey {
            any: self
                .any
                .iter()
                .map(|group| group.iter().cloned().collect())
                .collect(),
            all: self.all.iter().cloned().collect(),
            conditional: self.condition.is_some(),
        }
    }

    /// Check the descriptor's structural rules.
    ///
    /// Checks run in a fixed order and the first failure is returned.
    pub fn validate(self) -> Result<Self, MatchError> {
        let fail = |kind, predicates| Err(MatchError::new(kind, predicates, self.origins.clone()));

        let mixed: Vec<AnyPredicate> = self
            .any
            .iter()
            .filter(|group| group.iter().map(AnyPredicate::kind).collect::<BTreeSet<_>>().len() > 1)
            .flatten()
            .cloned()
            .collect();
        if !mixed.is_empty() {
            return fail(MatchErrorKind::ConflictingAnyTypes, mixed);
        }

        let repeated_any = repeated(self.any.iter().flatten());
        if !repeated_any.is_empty() {
            return fail(MatchErrorKind::DuplicateAnyValues, repeated_any);
        }

        let flattened_any: HashSet<&AnyPredicate> = self.any.iter().flatten().collect();
        let shared: Vec<AnyPredicate> = self
            .all
            .iter()
            .filter(|value| flattened_any.contains(value))
            .cloned()
            .collect();
        if !shared.is_empty() {
            return fail(MatchErrorKind::DuplicateAnyAllValues, shared);
        }

        // Each all-value and each any-group claims its type once.
        let mut claims: HashMap<PredicateKind, usize> = HashMap::new();
        for kind in self
            .all
            .iter()
            .map(AnyPredicate::kind)
            .chain(self.any.iter().filter_map(|group| group.first().map(AnyPredicate::kind)))
        {
            *claims.entry(kind).or_default() += 1;
        }
        let clashing: Vec<AnyPredicate> = self
            .all
            .iter()
            .chain(self.any.iter().flatten())
            .filter(|value| claims.get(&value.kind()).copied().unwrap_or(0) > 1)
            .cloned()
            .collect();
        if !clashing.is_empty() {
            return fail(MatchErrorKind::DuplicateMatchTypes, clashing);
        }

        Ok(self)
    }

    /// Concatenate groups, lists and origins; AND the conditions.
    ///
    /// The result is not validated.
    pub fn combine(&self, other: &MatchDescriptor) -> MatchDescriptor {
        MatchDescriptor {
            any: self.any.iter().chain(other.any.iter()).cloned().collect(),
            all: self.all.iter().chain(other.all.iter()).cloned().collect(),
            condition: Condition::and_optional(self.condition.as_ref(), other.condition.as_ref()),
            origins: self
                .origins
                .iter()
                .chain(other.origins.iter())
                .copied()
                .collect(),
        }
    }

    /// Every concrete predicate set the descriptor accepts: one value per
    /// any-group, unioned with the all-list.
    ///
    /// Empty when the descriptor constrains no predicates.
    pub fn combine_any_and_all(&self) -> Vec<PredicateSet> {
        let all: PredicateSet = self.all.iter().cloned().collect();
        if self.any.is_empty() {
            return if all.is_empty() { Vec::new() } else { vec![all] };
        }
        combinations(&self.any)
            .into_iter()
            .map(|choice| choice.into_iter().chain(all.iter().cloned()).collect())
            .collect()
    }

    /// Match the descriptor against every set in `pool`.
    ///
    /// A descriptor that constrains no predicates matches the whole pool at
    /// rank 0. Otherwise a pool set matches once per concrete set it
    /// contains, ranked by that concrete set's size; callers keep the
    /// highest rank per pool set.
    pub fn all_predicate_combinations(&self, pool: &HashSet<PredicateSet>) -> Vec<RankedPredicates> {
        let concrete = self.combine_any_and_all();
        if concrete.is_empty() {
            return pool
                .iter()
                .map(|predicates| RankedPredicates {
                    predicates: predicates.clone(),
                    rank: 0,
                })
                .collect();
        }
        pool.iter()
            .flat_map(|element| {
                concrete
                    .iter()
                    .filter(move |set| set.is_subset(element))
                    .map(move |set| RankedPredicates {
                        predicates: element.clone(),
                        rank: set.len(),
                    })
            })
            .collect()
    }
}

fn repeated<'a, I>(values: I) -> Vec<AnyPredicate>
where
    I: IntoIterator<Item = &'a AnyPredicate>,
{
    let mut seen = HashSet::new();
    let mut repeats = Vec::new();
    for value in values {
        if !seen.insert(value) && !repeats.contains(value) {
            repeats.push(value.clone());
        }
    }
    repeats
}

impl fmt::Display for MatchDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(unconditional)");
        }
        let mut parts = Vec::new();
        for group in &self.any {
            let values: Vec<String> = group.iter().map(ToString::to_string).collect();
            parts.push(format!("any({})", values.join(" | ")));
        }
        if !self.all.is_empty() {
            let values: Vec<String> = self.all.iter().map(ToString::to_string).collect();
            parts.push(format!("all({})", values.join(", ")));
        }
        if self.condition.is_some() {
            parts.push("condition".to_string());
        }
        f.write_str(&parts.join(" & "))
    }
}
