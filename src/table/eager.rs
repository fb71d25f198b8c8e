//! Eager resolution against the closed world of predicate values.

use super::{Selection, TableKey};
use crate::builder::error::{BuildError, ImplicitClash};
use crate::core::{Event, State};
use crate::pipeline::Row;
use crate::predicate::{predicate_pool, PredicateKind, PredicateSet};
use crate::validation::Checked;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use stillwater::validation::Validation;

/// The row currently winning a key, or the rows tied for it.
struct Candidate {
    rank: usize,
    rows: Vec<usize>,
}

/// Expand every row against the pool of all predicate combinations and
/// keep the highest-ranked row per key.
///
/// Two different rows reaching one key at the same rank cannot be told
/// apart; all such ties are reported together as implicit clashes.
pub(super) fn resolve<S, E, Env>(rows: &[Row<S, E, Env>]) -> Checked<Selection<S, E>>
where
    S: State,
    E: Event,
{
    let kinds: BTreeSet<PredicateKind> = rows.iter().flat_map(|row| row.descriptor.kinds()).collect();
    let pool = predicate_pool(&kinds);

    let mut candidates: HashMap<TableKey<S, E>, Candidate> = HashMap::new();
    for (position, row) in rows.iter().enumerate() {
        // A pool set can be reached through several concrete sets of one
        // row; only the best of them counts.
        let mut best: HashMap<PredicateSet, usize> = HashMap::new();
        for ranked in row.descriptor.all_predicate_combinations(&pool) {
            let rank = best.entry(ranked.predicates).or_insert(ranked.rank);
            *rank = (*rank).max(ranked.rank);
        }

        for (predicates, rank) in best {
            let key = TableKey::new(row.state.clone(), predicates, row.event.clone());
            match candidates.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(Candidate {
                        rank,
                        rows: vec![position],
                    });
                }
                Entry::Occupied(slot) => {
                    let candidate = slot.into_mut();
                    if rank > candidate.rank {
                        *candidate = Candidate {
                            rank,
                            rows: vec![position],
                        };
                    } else if rank == candidate.rank {
                        candidate.rows.push(position);
                    }
                }
            }
        }
    }

    let mut clashes: Vec<ImplicitClash> = candidates
        .iter()
        .filter(|(_, candidate)| candidate.rows.len() > 1)
        .map(|(key, candidate)| ImplicitClash {
            state: key.state.name().to_string(),
            predicates: key.predicates.clone(),
            event: key.event.name().to_string(),
            rows: candidate.rows.iter().map(|&p| rows[p].summary()).collect(),
        })
        .collect();

    if !clashes.is_empty() {
        clashes.sort_by(|a, b| {
            (&a.state, &a.event, &a.predicates).cmp(&(&b.state, &b.event, &b.predicates))
        });
        return Validation::fail(BuildError::ImplicitClashes { clashes });
    }

    Validation::success(
        candidates
            .into_iter()
            .map(|(key, candidate)| (key, candidate.rows[0]))
            .collect(),
    )
}
