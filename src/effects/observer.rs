//! Dispatch notifications.

use crate::core::{Event, State};
use crate::predicate::PredicateSet;
use tracing::{debug, warn};

/// Receives a notification for every dispatched event.
///
/// Passed to the machine at construction; the default
/// [`TracingObserver`] writes `tracing` events.
pub trait DispatchObserver<S: State, E: Event>: Send + Sync {
    fn transition_executed(&self, from: &S, to: &S, event: &E, predicates: &PredicateSet);

    fn transition_not_found(&self, state: &S, event: &E, predicates: &PredicateSet);

    /// A transition matched but its condition was false.
    fn transition_not_executed(&self, state: &S, event: &E, predicates: &PredicateSet);
}

/// Logs dispatch through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<S: State, E: Event> DispatchObserver<S, E> for TracingObserver {
    fn transition_executed(&self, from: &S, to: &S, event: &E, predicates: &PredicateSet) {
        debug!(
            from = from.name(),
            to = to.name(),
            event = event.name(),
            predicates = %predicates,
            "transition executed"
        );
    }

    fn transition_not_found(&self, state: &S, event: &E, predicates: &PredicateSet) {
        warn!(
            state = state.name(),
            event = event.name(),
            predicates = %predicates,
            "no transition found"
        );
    }

    fn transition_not_executed(&self, state: &S, event: &E, predicates: &PredicateSet) {
        warn!(
            state = state.name(),
            event = event.name(),
            predicates = %predicates,
            "transition condition not met"
        );
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl<S: State, E: Event> DispatchObserver<S, E> for SilentObserver {
    fn transition_executed(&self, _: &S, _: &S, _: &E, _: &PredicateSet) {}

    fn transition_not_found(&self, _: &S, _: &E, _: &PredicateSet) {}

    fn transition_not_executed(&self, _: &S, _: &E, _: &PredicateSet) {}
}
