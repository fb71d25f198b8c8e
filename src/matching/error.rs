//! Errors raised while validating match descriptors.

use crate::core::{join_origins, Origin};
use crate::predicate::AnyPredicate;
use std::fmt;
use thiserror::Error;

/// The way a descriptor is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchErrorKind {
    /// An any-group mixes predicate types.
    ConflictingAnyTypes,
    /// A predicate type is constrained more than once.
    DuplicateMatchTypes,
    /// The any-groups repeat a value.
    DuplicateAnyValues,
    /// A value appears in both the all-list and the any-groups.
    DuplicateAnyAllValues,
}

impl fmt::Display for MatchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ConflictingAnyTypes => "matching_any groups must share a single predicate type",
            Self::DuplicateMatchTypes => "a predicate type may only be matched once",
            Self::DuplicateAnyValues => "matching_any values must be unique",
            Self::DuplicateAnyAllValues => {
                "values cannot appear in both matching_any and matching_all"
            }
        };
        f.write_str(text)
    }
}

/// A descriptor validation failure with the offending predicates and every
/// declaration that contributed to it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: [{}] (declared at {})", list_predicates(.predicates), join_origins(.origins))]
pub struct MatchError {
    pub kind: MatchErrorKind,
    pub predicates: Vec<AnyPredicate>,
    pub origins: Vec<Origin>,
}

impl MatchError {
    pub fn new(kind: MatchErrorKind, predicates: Vec<AnyPredicate>, origins: Vec<Origin>) -> Self {
        MatchError {
            kind,
            predicates,
            origins,
        }
    }

    /// Fold another failure of the same kind into this one.
    pub(crate) fn absorb(&mut self, other: MatchError) {
        for predicate in other.predicates {
            if !self.predicates.contains(&predicate) {
                self.predicates.push(predicate);
            }
        }
        for origin in other.origins {
            if !self.origins.contains(&origin) {
                self.origins.push(origin);
            }
        }
    }
}

fn list_predicates(predicates: &[AnyPredicate]) -> String {
    predicates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Merge failures of the same kind, keeping first-seen order of kinds.
pub(crate) fn merge_by_kind(errors: Vec<MatchError>) -> Vec<MatchError> {
    let mut merged: Vec<MatchError> = Vec::new();
    for error in errors {
        match merged.iter_mut().find(|existing| existing.kind == error.kind) {
            Some(existing) => existing.absorb(error),
            None => merged.push(error),
        }
    }
    merged
}
