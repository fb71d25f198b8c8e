//! Lazy resolution: rows are stored under the sets they name.

use super::{Selection, TableKey};
use crate::builder::error::{BuildError, ImplicitClash};
use crate::core::{Event, State};
use crate::pipeline::Row;
use crate::predicate::PredicateSet;
use crate::validation::Checked;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use stillwater::validation::Validation;

/// The concrete sets a row is stored under. A row that names no
/// predicates is stored under the empty set.
fn stored_sets<S, E, Env>(row: &Row<S, E, Env>) -> Vec<PredicateSet> {
    let sets = row.descriptor.combine_any_and_all();
    if sets.is_empty() {
        vec![PredicateSet::new()]
    } else {
        sets
    }
}

/// Groups of rows that amount to the same rule, by position.
#[derive(Default)]
struct DuplicateGroups {
    groups: Vec<Vec<usize>>,
}

impl DuplicateGroups {
    fn add(&mut self, earlier: usize, later: usize) {
        match self.groups.iter_mut().find(|group| group.contains(&earlier)) {
            Some(group) if !group.contains(&later) => group.push(later),
            Some(_) => {}
            None => self.groups.push(vec![earlier, later]),
        }
    }
}

/// Store every row under each of its own concrete sets.
///
/// Two rows stored under the same key clash when they lead to different
/// states and are duplicates when they lead to the same one. Rows with
/// the same state, event and next state are also duplicates when they
/// have sets of equal size that either share a value or use disjoint
/// predicate types.
pub(super) fn resolve<S, E, Env>(rows: &[Row<S, E, Env>]) -> Checked<Selection<S, E>>
where
    S: State,
    E: Event,
{
    let sets: Vec<Vec<PredicateSet>> = rows.iter().map(stored_sets).collect();

    let mut entries: HashMap<TableKey<S, E>, usize> = HashMap::new();
    let mut clashes: Vec<(TableKey<S, E>, Vec<usize>)> = Vec::new();
    let mut duplicates = DuplicateGroups::default();

    for (position, row) in rows.iter().enumerate() {
        for predicates in &sets[position] {
            let key = TableKey::new(row.state.clone(), predicates.clone(), row.event.clone());
            match entries.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(slot) => {
                    let earlier = *slot.get();
                    if rows[earlier].next_state == row.next_state {
                        duplicates.add(earlier, position);
                        continue;
                    }
                    match clashes.iter_mut().find(|(key, _)| *key == *slot.key()) {
                        Some((_, tied)) => tied.push(position),
                        None => clashes.push((slot.key().clone(), vec![earlier, position])),
                    }
                }
            }
        }
    }

    for (later, row) in rows.iter().enumerate() {
        for earlier in 0..later {
            let other = &rows[earlier];
            if other.state != row.state
                || other.event != row.event
                || other.next_state != row.next_state
                || other.key == row.key
            {
                continue;
            }
            let equivalent = sets[earlier].iter().any(|a| {
                sets[later].iter().any(|b| {
                    !a.is_empty()
                        && a.len() == b.len()
                        && (a.kinds_disjoint(b) || a.shares_value_with(b))
                })
            });
            if equivalent {
                duplicates.add(earlier, later);
            }
        }
    }

    let mut errors = Vec::new();
    if !duplicates.groups.is_empty() {
        errors.push(Validation::fail(BuildError::Duplicates {
            groups: duplicates
                .groups
                .iter()
                .map(|group| group.iter().map(|&p| rows[p].summary()).collect())
                .collect(),
        }));
    }
    if !clashes.is_empty() {
        errors.push(Validation::fail(BuildError::ImplicitClashes {
            clashes: clashes
                .iter()
                .map(|(key, tied)| ImplicitClash {
                    state: key.state.name().to_string(),
                    predicates: key.predicates.clone(),
                    event: key.event.name().to_string(),
                    rows: tied.iter().map(|&p| rows[p].summary()).collect(),
                })
                .collect(),
        }));
    }
    if !errors.is_empty() {
        return Validation::all_vec(errors).map(|_: Vec<()>| Vec::new());
    }

    Validation::success(entries.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{define, matching, matching_all, matching_any, when, Define};
    use crate::pipeline::fold_all;
    use crate::predicate::Predicate;
    use crate::validation::collect;
    use crate::{event_enum, predicate_enum, state_enum};

    state_enum! {
        enum Pump {
            Idle,
            Slow,
            Fast,
        }
    }

    event_enum! {
        enum Demand {
            Rise,
        }
    }

    predicate_enum! {
        enum Pressure {
            Low,
            High,
        }
    }

    predicate_enum! {
        enum Tank {
            Empty,
            Full,
        }
    }

    fn resolved(
        defines: Vec<Define<Pump, Demand>>,
    ) -> Result<HashMap<PredicateSet, Pump>, Vec<BuildError>> {
        let rows = collect(fold_all(&defines))?;
        let selection = collect(resolve(&rows))?;
        Ok(selection
            .into_iter()
            .map(|(key, position)| (key.predicates, rows[position].next_state.clone()))
            .collect())
    }

    #[test]
    fn rows_are_stored_under_their_own_sets() {
        let table = resolved(vec![define(Pump::Idle).rules([
            when(Demand::Rise).then(Pump::Slow),
            matching_all([Pressure::High.erase(), Tank::Full.erase()])
                .when(Demand::Rise)
                .then(Pump::Fast),
        ])])
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table[&PredicateSet::new()], Pump::Slow);
        let both: PredicateSet = [Pressure::High.erase(), Tank::Full.erase()]
            .into_iter()
            .collect();
        assert_eq!(table[&both], Pump::Fast);
    }

    #[test]
    fn different_sizes_are_not_duplicates() {
        let table = resolved(vec![define(Pump::Idle).rules([
            matching(Pressure::High).when(Demand::Rise).then(Pump::Fast),
            matching_all([Pressure::High.erase(), Tank::Full.erase()])
                .when(Demand::Rise)
                .then(Pump::Fast),
        ])])
        .unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn shared_value_with_same_target_is_duplicate() {
        let errors = resolved(vec![define(Pump::Idle).rules([
            matching_all([Pressure::High.erase(), Tank::Full.erase()])
                .when(Demand::Rise)
                .then(Pump::Fast),
            matching_all([Pressure::High.erase(), Tank::Empty.erase()])
                .when(Demand::Rise)
                .then(Pump::Fast),
        ])])
        .unwrap_err();
        assert!(matches!(&errors[0], BuildError::Duplicates { groups } if groups.len() == 1));
    }

    #[test]
    fn same_type_different_values_are_not_duplicates() {
        let table = resolved(vec![define(Pump::Idle).rules([
            matching(Pressure::Low).when(Demand::Rise).then(Pump::Fast),
            matching(Pressure::High).when(Demand::Rise).then(Pump::Fast),
        ])])
        .unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn collisions_with_different_targets_are_clashes() {
        let errors = resolved(vec![define(Pump::Idle).rules([
            matching_any([Pressure::Low, Pressure::High])
                .when(Demand::Rise)
                .then(Pump::Slow),
            matching(Pressure::High).when(Demand::Rise).then(Pump::Fast),
        ])])
        .unwrap_err();

        match &errors[0] {
            BuildError::ImplicitClashes { clashes } => {
                assert_eq!(clashes.len(), 1);
                assert_eq!(clashes[0].rows.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn collisions_with_same_target_are_duplicates() {
        let errors = resolved(vec![define(Pump::Idle).rules([
            matching_any([Pressure::Low, Pressure::High])
                .when(Demand::Rise)
                .then(Pump::Fast),
            matching(Pressure::High).when(Demand::Rise).then(Pump::Fast),
        ])])
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], BuildError::Duplicates { groups } if groups[0].len() == 2));
    }
}
