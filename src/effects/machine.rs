//! The runtime dispatcher.

use super::config::FsmConfig;
use super::observer::{DispatchObserver, TracingObserver};
use super::transition::{DispatchError, Transition};
use crate::builder::error::{BuildError, BuildErrors};
use crate::builder::Define;
use crate::core::{Event, State, StateHistory, StateTransition};
use crate::predicate::{AnyPredicate, PredicateSet};
use crate::table::TransitionTable;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

/// What happened to a dispatched event.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome<S: State> {
    /// A transition ran.
    Executed { from: S, to: S },

    /// No entry matched the state, predicates and event.
    NotFound,

    /// Entries matched but every condition was false.
    NotExecuted,
}

impl<S: State> DispatchOutcome<S> {
    pub fn is_executed(&self) -> bool {
        matches!(self, DispatchOutcome::Executed { .. })
    }
}

/// A finite-state machine driven by events and predicates.
///
/// The table is built once with [`Fsm::build_table`]; events are then
/// dispatched with [`Fsm::handle_event`] or, when actions are stillwater
/// effects, [`Fsm::handle_event_async`]. One event is handled completely
/// before the next; sharing a machine across tasks needs external
/// synchronization.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::{define, when};
/// use statecraft::effects::{DispatchOutcome, Fsm};
/// use statecraft::{event_enum, state_enum};
///
/// state_enum! {
///     enum Door { Open, Closed }
/// }
/// event_enum! {
///     enum Push { Hard }
/// }
///
/// let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Closed);
/// fsm.build_table(vec![
///     define(Door::Closed).rules([when(Push::Hard).then(Door::Open)]),
/// ])
/// .unwrap();
///
/// let outcome = fsm.fire(Push::Hard).unwrap();
/// assert_eq!(outcome, DispatchOutcome::Executed { from: Door::Closed, to: Door::Open });
/// assert_eq!(fsm.state(), &Door::Open);
/// ```
pub struct Fsm<S: State, E: Event, Env = ()> {
    state: S,
    config: FsmConfig,
    table: Option<TransitionTable<S, E, Env>>,
    build_attempted: bool,
    observer: Arc<dyn DispatchObserver<S, E>>,
    history: StateHistory<S>,
}

impl<S: State, E: Event, Env> Fsm<S, E, Env> {
    /// Create a machine in `initial` with the default configuration.
    pub fn new(initial: S) -> Self {
        Self::with_config(initial, FsmConfig::default())
    }

    pub fn with_config(initial: S, config: FsmConfig) -> Self {
        Fsm {
            state: initial,
            config,
            table: None,
            build_attempted: false,
            observer: Arc::new(TracingObserver),
            history: StateHistory::new(),
        }
    }

    /// Replace the dispatch observer.
    pub fn with_observer<O>(mut self, observer: O) -> Self
    where
        O: DispatchObserver<S, E> + 'static,
    {
        self.observer = Arc::new(observer);
        self
    }

    /// Current state (pure)
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn config(&self) -> &FsmConfig {
        &self.config
    }

    /// The built table, if any.
    pub fn table(&self) -> Option<&TransitionTable<S, E, Env>> {
        self.table.as_ref()
    }

    /// Every executed transition so far.
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// Check if machine is in a final state (pure)
    pub fn is_final(&self) -> bool {
        self.state.is_final()
    }

    /// Compile `defines` into the machine's table.
    ///
    /// Can only be attempted once per machine, whether or not the first
    /// attempt succeeded. All errors found are returned together.
    pub fn build_table<I>(&mut self, defines: I) -> Result<(), BuildErrors>
    where
        I: IntoIterator<Item = Define<S, E, Env>>,
    {
        if self.build_attempted {
            return Err(BuildError::TableAlreadyBuilt.into());
        }
        self.build_attempted = true;

        let defines: Vec<_> = defines.into_iter().collect();
        match TransitionTable::compile(&defines, &self.config) {
            Ok(table) => {
                debug!(
                    defines = defines.len(),
                    entries = table.len(),
                    strategy = ?self.config.strategy,
                    "transition table built"
                );
                self.table = Some(table);
                Ok(())
            }
            Err(errors) => {
                warn!(errors = errors.len(), "transition table build failed");
                Err(BuildErrors::new(errors))
            }
        }
    }

    /// Find the transition to run, reporting suppressed candidates to the
    /// observer.
    fn select(&self, event: &E, predicates: &PredicateSet) -> Result<Option<&Transition<S, E, Env>>, DispatchError> {
        let table = self.table.as_ref().ok_or(DispatchError::TableNotBuilt)?;
        for candidate in table.candidates(&self.state, predicates, event) {
            if candidate.can_execute() {
                return Ok(Some(candidate));
            }
            self.observer
                .transition_not_executed(&self.state, event, predicates);
        }
        Ok(None)
    }

    /// Outcome for an event that found nothing to run.
    fn unmatched(&self, found_any: bool, event: &E, predicates: &PredicateSet) -> DispatchOutcome<S> {
        if found_any {
            DispatchOutcome::NotExecuted
        } else {
            self.observer
                .transition_not_found(&self.state, event, predicates);
            DispatchOutcome::NotFound
        }
    }

    /// Move to the transition's next state and record it.
    fn enter(&mut self, next_state: S, event: &E, predicates: &PredicateSet) -> DispatchOutcome<S> {
        let from = std::mem::replace(&mut self.state, next_state.clone());
        self.history = self.history.record(StateTransition {
            from: from.clone(),
            to: next_state.clone(),
            event: event.name().to_string(),
            timestamp: Utc::now(),
        });
        self.observer
            .transition_executed(&from, &next_state, event, predicates);
        DispatchOutcome::Executed {
            from,
            to: next_state,
        }
    }

    fn any_candidate(&self, event: &E, predicates: &PredicateSet) -> bool {
        self.table
            .as_ref()
            .is_some_and(|table| !table.candidates(&self.state, predicates, event).is_empty())
    }

    /// Dispatch an event, running plain actions in place.
    ///
    /// Fails before changing anything if the chosen transition has effect
    /// actions; use [`Fsm::handle_event_async`] for those.
    pub fn handle_event<P>(&mut self, event: E, predicates: P) -> Result<DispatchOutcome<S>, DispatchError>
    where
        P: IntoIterator<Item = AnyPredicate>,
    {
        let predicates: PredicateSet = predicates.into_iter().collect();
        let Some(transition) = self.select(&event, &predicates)?.cloned() else {
            let found_any = self.any_candidate(&event, &predicates);
            return Ok(self.unmatched(found_any, &event, &predicates));
        };
        if transition.is_async() {
            return Err(DispatchError::AsyncActionInSyncContext {
                from: self.state.name().to_string(),
                event: event.name().to_string(),
            });
        }

        let outcome = self.enter(transition.next_state.clone(), &event, &predicates);
        for action in &transition.actions {
            action.run_blocking(&event);
        }
        Ok(outcome)
    }

    /// Dispatch an event with no predicates.
    pub fn fire(&mut self, event: E) -> Result<DispatchOutcome<S>, DispatchError> {
        self.handle_event(event, [])
    }
}

impl<S: State, E: Event, Env> Fsm<S, E, Env>
where
    Env: Clone + Send + Sync + 'static,
{
    /// Dispatch an event, awaiting effect actions against `env`.
    ///
    /// Actions run in declared order. The state has already changed when
    /// they run; a failing effect stops the remaining actions and is
    /// returned as [`DispatchError::ActionFailed`].
    pub async fn handle_event_async<P>(
        &mut self,
        event: E,
        predicates: P,
        env: &Env,
    ) -> Result<DispatchOutcome<S>, DispatchError>
    where
        P: IntoIterator<Item = AnyPredicate>,
    {
        let predicates: PredicateSet = predicates.into_iter().collect();
        let Some(transition) = self.select(&event, &predicates)?.cloned() else {
            let found_any = self.any_candidate(&event, &predicates);
            return Ok(self.unmatched(found_any, &event, &predicates));
        };

        let outcome = self.enter(transition.next_state.clone(), &event, &predicates);
        for action in &transition.actions {
            action
                .run(&event, env)
                .await
                .map_err(|source| DispatchError::ActionFailed {
                    from: transition.state.name().to_string(),
                    to: transition.next_state.name().to_string(),
                    source,
                })?;
        }
        Ok(outcome)
    }

    /// Async dispatch with no predicates.
    pub async fn fire_async(&mut self, event: E, env: &Env) -> Result<DispatchOutcome<S>, DispatchError> {
        self.handle_event_async(event, [], env).await
    }
}
