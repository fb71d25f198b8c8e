//! Predicate algebra.
//!
//! Predicates are external condition axes with a closed set of values
//! (for example an `Enforcement` enum with `Weak` and `Strong`). Values of
//! different predicate types are stored side by side as [`AnyPredicate`],
//! which keeps a kind tag next to the value for later grouping.
//!
//! All functions here are pure.

mod combinatorics;
mod erased;
mod set;

pub use combinatorics::{combinations, group_by_kind, predicate_pool, unique_by_kind};
pub use erased::{AnyPredicate, Predicate, PredicateKind};
pub use set::PredicateSet;

/// Erase a single predicate value.
pub fn erase<P: Predicate>(value: P) -> AnyPredicate {
    value.erase()
}
