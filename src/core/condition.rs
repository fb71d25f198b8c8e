//! Runtime conditions attached to match descriptors.
//!
//! A condition is an arbitrary zero-argument check evaluated at dispatch
//! time, after the table lookup has already selected a transition. It
//! complements predicates, which are resolved when the table is built.

use std::fmt;
use std::sync::Arc;

/// Zero-argument boolean check that can veto a transition at dispatch time.
///
/// Conditions are cheap to clone (the closure is shared) and combine with
/// logical AND.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Condition;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let armed = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&armed);
/// let condition = Condition::new(move || flag.load(Ordering::SeqCst));
///
/// assert!(!condition.check());
/// armed.store(true, Ordering::SeqCst);
/// assert!(condition.check());
/// ```
#[derive(Clone)]
pub struct Condition {
    check: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl Condition {
    /// Create a condition from a closure.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Condition {
            check: Arc::new(check),
        }
    }

    /// Evaluate the condition.
    pub fn check(&self) -> bool {
        (self.check)()
    }

    /// Combine two conditions; the result holds only when both hold.
    ///
    /// The right-hand side is not evaluated when the left-hand side fails.
    pub fn and(&self, other: &Condition) -> Condition {
        let lhs = Arc::clone(&self.check);
        let rhs = Arc::clone(&other.check);
        Condition::new(move || lhs() && rhs())
    }

    /// Combine two optional conditions, treating an absent one as `true`.
    pub fn and_optional(lhs: Option<&Condition>, rhs: Option<&Condition>) -> Option<Condition> {
        match (lhs, rhs) {
            (Some(l), Some(r)) => Some(l.and(r)),
            (Some(c), None) | (None, Some(c)) => Some(c.clone()),
            (None, None) => None,
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}
