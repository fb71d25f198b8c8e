//! Errors raised while building a transition table.
//!
//! Every problem found during a build is collected; [`BuildErrors`] carries
//! all of them so one run reports everything.

use crate::core::{join_origins, Origin};
use crate::matching::MatchError;
use crate::predicate::PredicateSet;
use std::fmt;
use thiserror::Error;

/// The kind of authoring node an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Define,
    SuperState,
    Match,
    When,
    Then,
    Actions,
    Override,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Define => "define",
            Self::SuperState => "superstate",
            Self::Match => "matching",
            Self::When => "when",
            Self::Then => "then",
            Self::Actions => "actions",
            Self::Override => "overriding",
        };
        f.write_str(name)
    }
}

/// Printable description of a declared row, kept in errors so they do not
/// depend on the state and event types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSummary {
    pub state: String,
    pub descriptor: String,
    pub event: String,
    pub next_state: String,
    pub is_override: bool,
    pub origin_state: Origin,
    pub origin_event: Origin,
    pub origin_next_state: Origin,
    pub match_origins: Vec<Origin>,
}

impl fmt::Display for RowSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_override {
            f.write_str("overriding ")?;
        }
        write!(
            f,
            "define({}) | {} | when({}) | then({}) at {}",
            self.state, self.descriptor, self.event, self.next_state, self.origin_event
        )?;
        if !self.match_origins.is_empty() {
            write!(f, " (matching at {})", join_origins(&self.match_origins))?;
        }
        Ok(())
    }
}

/// Rows that could all apply to one concrete `(state, predicates, event)`
/// with the same specificity.
#[derive(Debug, Clone, PartialEq)]
pub struct ImplicitClash {
    pub state: String,
    pub predicates: PredicateSet,
    pub event: String,
    pub rows: Vec<RowSummary>,
}

impl fmt::Display for ImplicitClash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state {} with {} on {}: {}",
            self.state,
            self.predicates,
            self.event,
            list(&self.rows, "; ")
        )
    }
}

/// Errors that can occur when building a transition table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("Empty {kind} block at {origin}. Add at least one rule or remove the block")]
    EmptyBuilder { kind: NodeKind, origin: Origin },

    #[error("Rule at {origin} has no event. Wrap it in when(..)")]
    MissingEvent { origin: Origin },

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("Duplicate rows:\n{}", list_groups(.groups))]
    Duplicates { groups: Vec<Vec<RowSummary>> },

    #[error("Clashing rows (same state, match and event, different next state):\n{}", list_groups(.groups))]
    Clashes { groups: Vec<Vec<RowSummary>> },

    #[error("Nothing to override: {row}")]
    NothingToOverride { row: RowSummary },

    #[error("Override {row} is declared before the rows it overrides: {}", list(.out_of_order, "; "))]
    OverrideOutOfOrder {
        row: RowSummary,
        out_of_order: Vec<RowSummary>,
    },

    #[error("Implicit clashes (rows tie for the same predicates):\n{}", list(.clashes, "\n"))]
    ImplicitClashes { clashes: Vec<ImplicitClash> },

    #[error("Transition table has already been built")]
    TableAlreadyBuilt,

    #[error("Transition table is empty. Declare at least one rule")]
    EmptyTable,
}

fn list<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

fn list_groups(groups: &[Vec<RowSummary>]) -> String {
    groups
        .iter()
        .map(|group| format!("  - {}", list(group, "\n    ")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_all(errors: &[BuildError]) -> String {
    format!(
        "{} error(s) building the transition table:\n{}",
        errors.len(),
        list(errors, "\n")
    )
}

/// Every error found by one build attempt.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", render_all(.errors))]
pub struct BuildErrors {
    errors: Vec<BuildError>,
}

impl BuildErrors {
    pub fn new(errors: Vec<BuildError>) -> Self {
        BuildErrors { errors }
    }

    pub fn errors(&self) -> &[BuildError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<BuildError> {
        self.errors
    }
}

impl From<BuildError> for BuildErrors {
    fn from(error: BuildError) -> Self {
        BuildErrors::new(vec![error])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(line: u32) -> Origin {
        Origin {
            file: "machine.rs",
            line,
            column: 9,
        }
    }

    fn summary(next: &str, line: u32) -> RowSummary {
        RowSummary {
            state: "Locked".to_string(),
            descriptor: "(unconditional)".to_string(),
            event: "Coin".to_string(),
            next_state: next.to_string(),
            is_override: false,
            origin_state: origin(1),
            origin_event: origin(line),
            origin_next_state: origin(line),
            match_origins: Vec::new(),
        }
    }

    #[test]
    fn empty_builder_names_kind_and_origin() {
        let error = BuildError::EmptyBuilder {
            kind: NodeKind::When,
            origin: origin(4),
        };
        assert_eq!(
            error.to_string(),
            "Empty when block at machine.rs:4. Add at least one rule or remove the block"
        );
    }

    #[test]
    fn row_summary_reads_like_a_declaration() {
        assert_eq!(
            summary("Unlocked", 7).to_string(),
            "define(Locked) | (unconditional) | when(Coin) | then(Unlocked) at machine.rs:7"
        );
        let mut overriding = summary("Unlocked", 7);
        overriding.is_override = true;
        overriding.match_origins = vec![origin(6)];
        assert!(overriding.to_string().starts_with("overriding define(Locked)"));
        assert!(overriding.to_string().ends_with("(matching at machine.rs:6)"));
    }

    #[test]
    fn clashes_list_every_row() {
        let error = BuildError::Clashes {
            groups: vec![vec![summary("Unlocked", 7), summary("Alarming", 8)]],
        };
        let message = error.to_string();
        assert!(message.contains("then(Unlocked) at machine.rs:7"));
        assert!(message.contains("then(Alarming) at machine.rs:8"));
    }

    #[test]
    fn build_errors_report_count_and_each_error() {
        let errors = BuildErrors::new(vec![
            BuildError::EmptyTable,
            BuildError::MissingEvent { origin: origin(3) },
        ]);

        assert_eq!(errors.len(), 2);
        let message = errors.to_string();
        assert!(message.starts_with("2 error(s)"));
        assert!(message.contains("Transition table is empty"));
        assert!(message.contains("machine.rs:3"));
    }
}
