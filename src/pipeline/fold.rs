//! Folding rule trees into rows.

use super::row::{OverrideGroup, PartialRow, RawRow, Row};
use crate::builder::error::{BuildError, NodeKind};
use crate::builder::node::{Body, Node, Step};
use crate::builder::{Define, SuperState};
use crate::core::{Event, Origin, State};
use crate::validation::{checked, Checked};
use stillwater::validation::Validation;

/// Fold one node and everything below it, leaves first.
pub(crate) fn fold_node<S, E, Env>(node: &Node<S, E, Env>) -> Checked<Vec<PartialRow<S, E, Env>>>
where
    S: State,
    E: Event,
{
    let children = match &node.body {
        Body::Leaf => Validation::success(vec![PartialRow::seed(node.origin)]),
        Body::Chain(inner) => fold_node(inner),
        Body::Block(rules) => fold_block(rules, node.kind(), node.origin),
    };
    match children {
        Validation::Success(rows) => apply(node, rows),
        failure => failure,
    }
}

/// Fold a block of sibling rules. A block that exists but is empty is an
/// authoring error.
pub(crate) fn fold_block<S, E, Env>(
    rules: &[Node<S, E, Env>],
    kind: NodeKind,
    origin: Origin,
) -> Checked<Vec<PartialRow<S, E, Env>>>
where
    S: State,
    E: Event,
{
    if rules.is_empty() {
        return Validation::fail(BuildError::EmptyBuilder { kind, origin });
    }
    Validation::all_vec(rules.iter().map(fold_node).collect())
        .map(|rows: Vec<Vec<_>>| rows.into_iter().flatten().collect())
}

fn apply<S, E, Env>(
    node: &Node<S, E, Env>,
    rows: Vec<PartialRow<S, E, Env>>,
) -> Checked<Vec<PartialRow<S, E, Env>>>
where
    S: State,
    E: Event,
{
    let origin = node.origin;
    let rows = match &node.step {
        Step::Match(descriptor) => rows
            .into_iter()
            .map(|mut row| {
                row.matches.prepend(descriptor.clone());
                row
            })
            .collect(),
        Step::When(events) if events.is_empty() => {
            return Validation::fail(BuildError::EmptyBuilder {
                kind: NodeKind::When,
                origin,
            });
        }
        Step::When(events) => rows
            .into_iter()
            .flat_map(|row| {
                // An inner `when` already chose the event.
                if row.event.is_some() {
                    return vec![row];
                }
                events
                    .iter()
                    .map(|event| PartialRow {
                        event: Some((event.clone(), origin)),
                        ..row.clone()
                    })
                    .collect()
            })
            .collect(),
        Step::Then(state) => rows
            .into_iter()
            .map(|mut row| {
                row.next.get_or_insert_with(|| (state.clone(), origin));
                row
            })
            .collect(),
        Step::Actions(actions) => rows
            .into_iter()
            .map(|mut row| {
                let inner = std::mem::take(&mut row.actions);
                row.actions = actions.iter().cloned().chain(inner).collect();
                row
            })
            .collect(),
        Step::Override => rows
            .into_iter()
            .map(|mut row| {
                row.is_override = true;
                row
            })
            .collect(),
    };
    Validation::success(rows)
}

fn fold_rules<S, E, Env>(
    rules: &Option<Vec<Node<S, E, Env>>>,
    kind: NodeKind,
    origin: Origin,
    group: OverrideGroup,
) -> Checked<Vec<PartialRow<S, E, Env>>>
where
    S: State,
    E: Event,
{
    match rules {
        None => Validation::success(Vec::new()),
        Some(rules) => fold_block(rules, kind, origin)
            .map(|rows| rows.into_iter().map(|row| row.stamp(group)).collect()),
    }
}

/// Rows of a superstate: those of its parents first, then its own.
pub(crate) fn expand_superstate<S, E, Env>(
    superstate: &SuperState<S, E, Env>,
) -> Checked<Vec<PartialRow<S, E, Env>>>
where
    S: State,
    E: Event,
{
    let parents = superstate.adopted.iter().map(expand_superstate);
    let own = fold_rules(
        &superstate.rules,
        NodeKind::SuperState,
        superstate.origin,
        superstate.group,
    );
    Validation::all_vec(parents.chain(std::iter::once(own)).collect())
        .map(|rows: Vec<Vec<_>>| rows.into_iter().flatten().collect())
}

/// Rows of a define, bound to each of its states.
pub(crate) fn fold_define<S, E, Env>(define: &Define<S, E, Env>) -> Checked<Vec<RawRow<S, E, Env>>>
where
    S: State,
    E: Event,
{
    if define.states.is_empty() {
        return Validation::fail(BuildError::EmptyBuilder {
            kind: NodeKind::Define,
            origin: define.origin,
        });
    }

    let inherited = define.superstates.iter().map(expand_superstate);
    let own = fold_rules(&define.rules, NodeKind::Define, define.origin, define.group);
    let partial = match Validation::all_vec(inherited.chain(std::iter::once(own)).collect()) {
        Validation::Success(rows) => rows.into_iter().flatten().collect::<Vec<_>>(),
        Validation::Failure(errors) => return Validation::Failure(errors),
    };

    let complete = partial.into_iter().map(|row| match row.event.clone() {
        Some(event) => Validation::success((row, event)),
        None => Validation::fail(BuildError::MissingEvent { origin: row.origin }),
    });
    Validation::all_vec(complete.collect()).map(|rows| {
        define
            .states
            .iter()
            .flat_map(|state| {
                rows.iter().map(move |(row, (event, origin_event))| {
                    let (next_state, origin_next_state) = row
                        .next
                        .clone()
                        .unwrap_or_else(|| (state.clone(), define.origin));
                    RawRow {
                        state: state.clone(),
                        matches: row.matches.clone(),
                        event: event.clone(),
                        next_state,
                        actions: row.actions.clone(),
                        is_override: row.is_override,
                        group: row.group.unwrap_or(define.group),
                        origin_state: define.origin,
                        origin_event: *origin_event,
                        origin_next_state,
                    }
                })
            })
            .collect()
    })
}

/// Fold every define and resolve each row's match scopes.
///
/// Rows keep declaration order: define by define, and within a define
/// state by state.
pub(crate) fn fold_all<S, E, Env>(defines: &[Define<S, E, Env>]) -> Checked<Vec<Row<S, E, Env>>>
where
    S: State,
    E: Event,
{
    let raw = match Validation::all_vec(defines.iter().map(fold_define).collect()) {
        Validation::Success(raw) => raw.into_iter().flatten().collect::<Vec<_>>(),
        Validation::Failure(errors) => return Validation::Failure(errors),
    };

    let mut rows = Vec::with_capacity(raw.len());
    let mut errors: Vec<BuildError> = Vec::new();
    for row in raw {
        match row.resolve() {
            Ok(row) => rows.push(row),
            Err(found) => {
                // The same broken chain is reported once, not once per state.
                for error in found {
                    if !errors.contains(&error) {
                        errors.push(error);
                    }
                }
            }
        }
    }
    checked(errors).map(move |_| rows)
}
