//! Type-erased predicate values.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An external condition axis with a closed, enumerable set of values.
///
/// # Example
///
/// ```rust
/// use statecraft::predicate::Predicate;
///
/// #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
/// enum Enforcement {
///     Weak,
///     Strong,
/// }
///
/// impl Predicate for Enforcement {
///     fn all_cases() -> Vec<Self> {
///         vec![Self::Weak, Self::Strong]
///     }
/// }
///
/// let weak = Enforcement::Weak.erase();
/// assert_eq!(weak.downcast::<Enforcement>(), Some(&Enforcement::Weak));
/// assert_eq!(weak.to_string(), "Enforcement.Weak");
/// ```
pub trait Predicate: Clone + Eq + Ord + Hash + Debug + Send + Sync + 'static {
    /// Every value this predicate can take.
    fn all_cases() -> Vec<Self>;

    /// Wrap the value for storage next to predicates of other types.
    fn erase(self) -> AnyPredicate {
        AnyPredicate::new(self)
    }
}

/// The type of a predicate value, used for grouping and for enumerating
/// the closed world.
#[derive(Clone, Copy)]
pub struct PredicateKind {
    id: TypeId,
    name: &'static str,
    all_cases: fn() -> Vec<AnyPredicate>,
}

impl PredicateKind {
    pub fn of<P: Predicate>() -> Self {
        PredicateKind {
            id: TypeId::of::<P>(),
            name: std::any::type_name::<P>(),
            all_cases: all_cases_of::<P>,
        }
    }

    /// Fully qualified type name.
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }

    /// Every value of this kind, erased.
    pub fn all_cases(&self) -> Vec<AnyPredicate> {
        (self.all_cases)()
    }
}

fn all_cases_of<P: Predicate>() -> Vec<AnyPredicate> {
    P::all_cases().into_iter().map(AnyPredicate::new).collect()
}

fn short_type_name(name: &'static str) -> &'static str {
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

impl PartialEq for PredicateKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PredicateKind {}

impl Hash for PredicateKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for PredicateKind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PredicateKind {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl Debug for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

trait ErasedPredicate: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
    fn dyn_cmp(&self, other: &dyn Any) -> Ordering;
    fn dyn_hash(&self, state: &mut dyn Hasher);
    fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<P: Predicate> ErasedPredicate for P {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<P>().is_some_and(|other| self == other)
    }

    // Only reached for equal kinds, so the downcast cannot miss.
    fn dyn_cmp(&self, other: &dyn Any) -> Ordering {
        other
            .downcast_ref::<P>()
            .map_or(Ordering::Less, |other| self.cmp(other))
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }

    fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

/// A predicate value of any type, tagged with its kind.
///
/// Identity is `(kind, value)`: two erased values are equal only when they
/// have the same type and compare equal as that type.
#[derive(Clone)]
pub struct AnyPredicate {
    kind: PredicateKind,
    value: Arc<dyn ErasedPredicate>,
}

impl AnyPredicate {
    pub fn new<P: Predicate>(value: P) -> Self {
        AnyPredicate {
            kind: PredicateKind::of::<P>(),
            value: Arc::new(value),
        }
    }

    pub fn kind(&self) -> PredicateKind {
        self.kind
    }

    /// Recover the concrete value if it has type `P`.
    pub fn downcast<P: Predicate>(&self) -> Option<&P> {
        self.value.as_any().downcast_ref::<P>()
    }
}

impl<P: Predicate> From<P> for AnyPredicate {
    fn from(value: P) -> Self {
        AnyPredicate::new(value)
    }
}

impl PartialEq for AnyPredicate {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value.dyn_eq(other.value.as_any())
    }
}

impl Eq for AnyPredicate {}

impl Hash for AnyPredicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.value.dyn_hash(state);
    }
}

impl PartialOrd for AnyPredicate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AnyPredicate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.value.dyn_cmp(other.value.as_any()))
    }
}

impl Debug for AnyPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.", self.kind.short_name())?;
        self.value.dyn_fmt(f)
    }
}

impl fmt::Display for AnyPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    enum Enforcement {
        Weak,
        Strong,
    }

    impl Predicate for Enforcement {
        fn all_cases() -> Vec<Self> {
            vec![Self::Weak, Self::Strong]
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    enum Reward {
        Punishing,
        Rewarding,
    }

    impl Predicate for Reward {
        fn all_cases() -> Vec<Self> {
            vec![Self::Punishing, Self::Rewarding]
        }
    }

    fn hash_of(value: &AnyPredicate) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equal_values_of_same_kind_are_equal() {
        assert_eq!(Enforcement::Weak.erase(), Enforcement::Weak.erase());
        assert_ne!(Enforcement::Weak.erase(), Enforcement::Strong.erase());
        assert_eq!(
            hash_of(&Enforcement::Weak.erase()),
            hash_of(&Enforcement::Weak.erase())
        );
    }

    #[test]
    fn values_of_different_kinds_are_never_equal() {
        // Both are discriminant 0 of their enum.
        assert_ne!(Enforcement::Weak.erase(), Reward::Punishing.erase());
        assert_ne!(
            Enforcement::Weak.erase().kind(),
            Reward::Punishing.erase().kind()
        );
    }

    #[test]
    fn ordering_groups_by_kind_then_value() {
        let mut values = vec![
            Reward::Rewarding.erase(),
            Enforcement::Strong.erase(),
            Reward::Punishing.erase(),
            Enforcement::Weak.erase(),
        ];
        values.sort();

        assert_eq!(
            values,
            vec![
                Enforcement::Weak.erase(),
                Enforcement::Strong.erase(),
                Reward::Punishing.erase(),
                Reward::Rewarding.erase(),
            ]
        );
    }

    #[test]
    fn kind_enumerates_all_cases() {
        let cases = PredicateKind::of::<Enforcement>().all_cases();
        assert_eq!(
            cases,
            vec![Enforcement::Weak.erase(), Enforcement::Strong.erase()]
        );
    }

    #[test]
    fn downcast_recovers_value() {
        let erased = Reward::Rewarding.erase();
        assert_eq!(erased.downcast::<Reward>(), Some(&Reward::Rewarding));
        assert_eq!(erased.downcast::<Enforcement>(), None);
    }

    #[test]
    fn display_uses_short_type_name() {
        assert_eq!(Enforcement::Strong.erase().to_string(), "Enforcement.Strong");
        assert_eq!(PredicateKind::of::<Reward>().to_string(), "Reward");
    }
}
