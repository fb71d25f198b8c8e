//! Source locations attached to declarations for diagnostics.

use std::fmt;
use std::panic::Location;

/// Where a declaration was written.
///
/// Builder functions are `#[track_caller]`, so the origin points at the
/// user's call site rather than at this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Origin {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl Origin {
    /// Capture the caller's location.
    #[track_caller]
    pub fn here() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Origin {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Render a list of origins as `file:line, file:line`.
pub(crate) fn join_origins(origins: &[Origin]) -> String {
    origins
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn capture() -> Origin {
        Origin::here()
    }

    #[test]
    fn here_points_at_caller() {
        let line = line!() + 1;
        let origin = capture();
        assert_eq!(origin.line, line);
        assert!(origin.file.ends_with("origin.rs"));
    }

    #[test]
    fn display_is_file_and_line() {
        let origin = Origin {
            file: "src/machine.rs",
            line: 12,
            column: 5,
        };
        assert_eq!(origin.to_string(), "src/machine.rs:12");
    }

    #[test]
    fn join_origins_separates_with_commas() {
        let a = Origin {
            file: "a.rs",
            line: 1,
            column: 1,
        };
        let b = Origin {
            file: "b.rs",
            line: 2,
            column: 1,
        };
        assert_eq!(join_origins(&[a, b]), "a.rs:1, b.rs:2");
        assert_eq!(join_origins(&[]), "");
    }
}
