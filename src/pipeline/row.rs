//! Rows at each stage of the pipeline.

use crate::builder::error::{BuildError, RowSummary};
use crate::core::{Event, Origin, State};
use crate::effects::Action;
use crate::matching::{MatchChain, MatchDescriptor, MatchKey};
use std::fmt;
use uuid::Uuid;

/// Identifies the declaration that authored a set of rows.
///
/// Overrides may only replace rows from an earlier group, so every
/// `define` and every superstate gets its own group when created.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverrideGroup(Uuid);

impl OverrideGroup {
    pub fn new() -> Self {
        OverrideGroup(Uuid::new_v4())
    }
}

impl Default for OverrideGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OverrideGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OverrideGroup({})", self.0)
    }
}

/// A row whose state is not bound yet.
pub(crate) struct PartialRow<S, E, Env> {
    pub matches: MatchChain,
    pub event: Option<(E, Origin)>,
    pub next: Option<(S, Origin)>,
    pub actions: Vec<Action<E, Env>>,
    pub is_override: bool,
    pub group: Option<OverrideGroup>,
    /// Innermost node the row came from.
    pub origin: Origin,
}

impl<S, E, Env> PartialRow<S, E, Env> {
    pub fn seed(origin: Origin) -> Self {
        PartialRow {
            matches: MatchChain::new(),
            event: None,
            next: None,
            actions: Vec::new(),
            is_override: false,
            group: None,
            origin,
        }
    }

    pub fn stamp(mut self, group: OverrideGroup) -> Self {
        self.group.get_or_insert(group);
        self
    }
}

impl<S: Clone, E: Clone, Env> Clone for PartialRow<S, E, Env> {
    fn clone(&self) -> Self {
        PartialRow {
            matches: self.matches.clone(),
            event: self.event.clone(),
            next: self.next.clone(),
            actions: self.actions.clone(),
            is_override: self.is_override,
            group: self.group,
            origin: self.origin,
        }
    }
}

/// A row bound to a state, with its match scopes still unresolved.
pub(crate) struct RawRow<S, E, Env> {
    pub state: S,
    pub matches: MatchChain,
    pub event: E,
    pub next_state: S,
    pub actions: Vec<Action<E, Env>>,
    pub is_override: bool,
    pub group: OverrideGroup,
    pub origin_state: Origin,
    pub origin_event: Origin,
    pub origin_next_state: Origin,
}

impl<S: State, E: Event, Env> RawRow<S, E, Env> {
    /// Resolve the match chain into a single validated descriptor.
    pub fn resolve(self) -> Result<Row<S, E, Env>, Vec<BuildError>> {
        let descriptor = self
            .matches
            .resolve()
            .map_err(|errors| errors.into_iter().map(BuildError::Match).collect::<Vec<_>>())?;
        Ok(Row {
            key: descriptor.key(),
            descriptor,
            state: self.state,
            event: self.event,
            next_state: self.next_state,
            actions: self.actions,
            is_override: self.is_override,
            group: self.group,
            origin_state: self.origin_state,
            origin_event: self.origin_event,
            origin_next_state: self.origin_next_state,
        })
    }
}

/// A fully resolved candidate row.
pub(crate) struct Row<S, E, Env> {
    pub state: S,
    pub descriptor: MatchDescriptor,
    pub key: MatchKey,
    pub event: E,
    pub next_state: S,
    pub actions: Vec<Action<E, Env>>,
    pub is_override: bool,
    pub group: OverrideGroup,
    pub origin_state: Origin,
    pub origin_event: Origin,
    pub origin_next_state: Origin,
}

/// What two rows must share to describe the same rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct RuleKey<S, E> {
    pub state: S,
    pub matches: MatchKey,
    pub event: E,
}

impl<S: State, E: Event, Env> Row<S, E, Env> {
    pub fn rule_key(&self) -> RuleKey<S, E> {
        RuleKey {
            state: self.state.clone(),
            matches: self.key.clone(),
            event: self.event.clone(),
        }
    }

    pub fn summary(&self) -> RowSummary {
        RowSummary {
            state: self.state.name().to_string(),
            descriptor: self.descriptor.to_string(),
            event: self.event.name().to_string(),
            next_state: self.next_state.name().to_string(),
            is_override: self.is_override,
            origin_state: self.origin_state,
            origin_event: self.origin_event,
            origin_next_state: self.origin_next_state,
            match_origins: self.descriptor.origins().to_vec(),
        }
    }
}
