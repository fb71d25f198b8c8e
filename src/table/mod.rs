//! Building and querying the transition table.
//!
//! Validated rows are resolved into a table keyed by
//! `(state, predicate set, event)` with one of two strategies:
//!
//! - **Eager** expands every row against the closed world of predicate
//!   values and keeps the most specific row for each concrete set. Ties
//!   between different rows are implicit clashes.
//! - **Lazy** stores each row under the predicate sets it names; lookup
//!   probes the supplied set and then ever smaller subsets.

mod eager;
mod lazy;

use crate::builder::error::BuildError;
use crate::builder::Define;
use crate::core::{Event, State};
use crate::effects::{Action, ActionsPolicy, FsmConfig, TableStrategy, Transition};
use crate::pipeline::{fold_all, Row};
use crate::predicate::PredicateSet;
use crate::validation::{collect, validate_rows};
use std::collections::HashMap;

/// Lookup key of a table entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableKey<S, E> {
    pub state: S,
    pub predicates: PredicateSet,
    pub event: E,
}

impl<S, E> TableKey<S, E> {
    pub fn new(state: S, predicates: PredicateSet, event: E) -> Self {
        TableKey {
            state,
            predicates,
            event,
        }
    }
}

/// Rows chosen by a resolver: each key with the position of its row.
type Selection<S, E> = Vec<(TableKey<S, E>, usize)>;

/// The compiled, immutable transition table.
pub struct TransitionTable<S, E, Env = ()> {
    strategy: TableStrategy,
    entries: HashMap<TableKey<S, E>, Transition<S, E, Env>>,
}

impl<S: State, E: Event, Env> TransitionTable<S, E, Env> {
    /// Fold, validate and resolve `defines` into a table.
    ///
    /// Every error found is returned. Later stages only run once the
    /// earlier ones succeeded, since their input would be meaningless.
    pub(crate) fn compile(
        defines: &[Define<S, E, Env>],
        config: &FsmConfig,
    ) -> Result<Self, Vec<BuildError>> {
        let rows = collect(fold_all(defines))?;
        if rows.is_empty() {
            return Err(vec![BuildError::EmptyTable]);
        }
        let rows = collect(validate_rows(rows))?;

        let selection = collect(match config.strategy {
            TableStrategy::Eager => eager::resolve(&rows),
            TableStrategy::Lazy => lazy::resolve(&rows),
        })?;

        let hooks = StateHooks::from_defines(defines);
        let actions: Vec<Vec<Action<E, Env>>> = rows
            .iter()
            .map(|row| hooks.merged_actions(row, config.actions_policy))
            .collect();

        let entries = selection
            .into_iter()
            .map(|(key, position)| {
                let row = &rows[position];
                let transition = Transition {
                    state: key.state.clone(),
                    predicates: key.predicates.clone(),
                    event: key.event.clone(),
                    next_state: row.next_state.clone(),
                    actions: actions[position].clone(),
                    condition: row.descriptor.condition().cloned(),
                    origin: row.origin_event,
                };
                (key, transition)
            })
            .collect();

        Ok(TransitionTable {
            strategy: config.strategy,
            entries,
        })
    }

    pub fn strategy(&self) -> TableStrategy {
        self.strategy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry stored under exactly this key.
    pub fn get(&self, state: &S, predicates: &PredicateSet, event: &E) -> Option<&Transition<S, E, Env>> {
        self.entries.get(&TableKey::new(
            state.clone(),
            predicates.clone(),
            event.clone(),
        ))
    }

    /// Entries to try, in order, for a dispatched event.
    ///
    /// Eager tables only hold exact keys. Lazy tables are probed with the
    /// supplied set and every subset of it, largest first.
    pub fn candidates(
        &self,
        state: &S,
        predicates: &PredicateSet,
        event: &E,
    ) -> Vec<&Transition<S, E, Env>> {
        match self.strategy {
            TableStrategy::Eager => self.get(state, predicates, event).into_iter().collect(),
            TableStrategy::Lazy => predicates
                .subsets_by_size()
                .iter()
                .filter_map(|subset| self.get(state, subset, event))
                .collect(),
        }
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition<S, E, Env>> {
        self.entries.values()
    }
}

/// Accumulated entry and exit actions of each state.
struct StateHooks<S, E, Env> {
    entry: HashMap<S, Vec<Action<E, Env>>>,
    exit: HashMap<S, Vec<Action<E, Env>>>,
}

impl<S: State, E: Event, Env> StateHooks<S, E, Env> {
    fn from_defines(defines: &[Define<S, E, Env>]) -> Self {
        let mut hooks = StateHooks {
            entry: HashMap::new(),
            exit: HashMap::new(),
        };
        for define in defines {
            let entry = define.entry_actions();
            let exit = define.exit_actions();
            for state in define.states() {
                hooks
                    .entry
                    .entry(state.clone())
                    .or_default()
                    .extend(entry.iter().cloned());
                hooks
                    .exit
                    .entry(state.clone())
                    .or_default()
                    .extend(exit.iter().cloned());
            }
        }
        hooks
    }

    /// The row's actions, then exit actions of the old state and entry
    /// actions of the new one if the policy asks for them.
    fn merged_actions(&self, row: &Row<S, E, Env>, policy: ActionsPolicy) -> Vec<Action<E, Env>> {
        let mut actions = row.actions.clone();
        if row.state != row.next_state || policy == ActionsPolicy::ExecuteAlways {
            actions.extend(self.exit.get(&row.state).into_iter().flatten().cloned());
            actions.extend(self.entry.get(&row.next_state).into_iter().flatten().cloned());
        }
        actions
    }
}
