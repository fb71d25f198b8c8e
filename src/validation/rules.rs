//! Duplicate, clash and override rules.

use super::Checked;
use crate::builder::error::{BuildError, RowSummary};
use crate::core::{Event, State};
use crate::pipeline::{Row, RuleKey};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;

/// Apply overrides, then check the remaining rows for duplicates and
/// clashes.
///
/// Returns the surviving rows in declaration order, or every error found.
pub(crate) fn validate_rows<S, E, Env>(rows: Vec<Row<S, E, Env>>) -> Checked<Vec<Row<S, E, Env>>>
where
    S: State,
    E: Event,
{
    let (kept, override_errors) = reconcile_overrides(rows);

    let mut checks: Vec<Checked<()>> = override_errors.into_iter().map(Validation::fail).collect();
    checks.push(check_duplicates(&kept));
    checks.push(check_clashes(&kept));

    Validation::all_vec(checks).map(move |_| kept)
}

/// Let each override replace the most recent earlier row with the same
/// state, match and event.
fn reconcile_overrides<S, E, Env>(
    rows: Vec<Row<S, E, Env>>,
) -> (Vec<Row<S, E, Env>>, Vec<BuildError>)
where
    S: State,
    E: Event,
{
    let keys: Vec<RuleKey<S, E>> = rows.iter().map(Row::rule_key).collect();
    let mut kept: Vec<usize> = Vec::new();
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        if !row.is_override {
            kept.push(index);
            continue;
        }

        // Rows from another declaration that only show up later cannot
        // have been meant as the target.
        let out_of_order: Vec<RowSummary> = rows
            .iter()
            .enumerate()
            .skip(index + 1)
            .filter(|(later, candidate)| {
                !candidate.is_override && candidate.group != row.group && keys[*later] == keys[index]
            })
            .map(|(_, candidate)| candidate.summary())
            .collect();
        if !out_of_order.is_empty() {
            errors.push(BuildError::OverrideOutOfOrder {
                row: row.summary(),
                out_of_order,
            });
            continue;
        }

        match kept.iter().rposition(|&earlier| keys[earlier] == keys[index]) {
            Some(position) => {
                kept.remove(position);
                kept.push(index);
            }
            None => errors.push(BuildError::NothingToOverride { row: row.summary() }),
        }
    }

    let kept: HashSet<usize> = kept.into_iter().collect();
    let rows = rows
        .into_iter()
        .enumerate()
        .filter(|(index, _)| kept.contains(index))
        .map(|(_, row)| row)
        .collect();
    (rows, errors)
}

/// Rows grouped by rule key, groups in order of first declaration.
fn group_by_rule<'a, S, E, Env>(rows: &'a [Row<S, E, Env>]) -> Vec<Vec<&'a Row<S, E, Env>>>
where
    S: State,
    E: Event,
{
    let mut positions: HashMap<RuleKey<S, E>, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Row<S, E, Env>>> = Vec::new();
    for row in rows {
        let position = *positions.entry(row.rule_key()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[position].push(row);
    }
    groups
}

/// Rows of one rule key, split by next state.
fn split_by_next<'a, S, E, Env>(group: &[&'a Row<S, E, Env>]) -> Vec<Vec<&'a Row<S, E, Env>>>
where
    S: State,
    E: Event,
{
    let mut splits: Vec<Vec<&Row<S, E, Env>>> = Vec::new();
    for &row in group {
        match splits
            .iter_mut()
            .find(|split| split[0].next_state == row.next_state)
        {
            Some(split) => split.push(row),
            None => splits.push(vec![row]),
        }
    }
    splits
}

fn summaries<S: State, E: Event, Env>(rows: &[&Row<S, E, Env>]) -> Vec<RowSummary> {
    rows.iter().map(|row| row.summary()).collect()
}

/// Same state, match, event and next state declared more than once.
fn check_duplicates<S, E, Env>(rows: &[Row<S, E, Env>]) -> Checked<()>
where
    S: State,
    E: Event,
{
    let groups: Vec<Vec<RowSummary>> = group_by_rule(rows)
        .iter()
        .flat_map(|group| split_by_next(group))
        .filter(|split| split.len() > 1)
        .map(|split| summaries(&split))
        .collect();

    if groups.is_empty() {
        Validation::success(())
    } else {
        Validation::fail(BuildError::Duplicates { groups })
    }
}

/// Same state, match and event leading to different next states.
fn check_clashes<S, E, Env>(rows: &[Row<S, E, Env>]) -> Checked<()>
where
    S: State,
    E: Event,
{
    let groups: Vec<Vec<RowSummary>> = group_by_rule(rows)
        .iter()
        .filter(|group| split_by_next(group).len() > 1)
        .map(|group| summaries(group))
        .collect();

    if groups.is_empty() {
        Validation::success(())
    } else {
        Validation::fail(BuildError::Clashes { groups })
    }
}
