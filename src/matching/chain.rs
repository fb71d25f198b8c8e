//! Descriptors contributed at nested authoring scopes.

use super::descriptor::MatchDescriptor;
use super::error::{merge_by_kind, MatchError};

/// The descriptors that apply to one row, outermost scope first.
///
/// Links stay separate until [`MatchChain::resolve`] so that every error
/// can name each declaration that took part in it.
#[derive(Clone, Debug, Default)]
pub struct MatchChain {
    links: Vec<MatchDescriptor>,
}

impl MatchChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor from an enclosing scope.
    pub fn prepend(&mut self, descriptor: MatchDescriptor) {
        self.links.insert(0, descriptor);
    }

    pub fn links(&self) -> &[MatchDescriptor] {
        &self.links
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Validate every link and merge them into a single descriptor.
    ///
    /// Succeeds only when every link, and every partial combination of
    /// links, is valid. Failures of the same kind are merged so that one
    /// error lists all the declarations involved.
    pub fn resolve(&self) -> Result<MatchDescriptor, Vec<MatchError>> {
        let mut combined: Option<MatchDescriptor> = None;
        let mut errors = Vec::new();

        for link in &self.links {
            match link.clone().validate() {
                Ok(valid) if errors.is_empty() => {
                    let next = match combined.take() {
                        Some(outer) => outer.combine(&valid),
                        None => valid,
                    };
                    match next.validate() {
                        Ok(resolved) => combined = Some(resolved),
                        Err(error) => errors.push(error),
                    }
                }
                Ok(_) => {}
                Err(error) => errors.push(error),
            }
        }

        if errors.is_empty() {
            Ok(combined.unwrap_or_default())
        } else {
            Err(merge_by_kind(errors))
        }
    }
}

impl From<MatchDescriptor> for MatchChain {
    fn from(descriptor: MatchDescriptor) -> Self {
        MatchChain {
            links: vec![descriptor],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Condition, Origin};
    use crate::matching::MatchErrorKind;
    use crate::predicate::Predicate;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    enum Grip {
        Loose,
        Firm,
    }

    impl Predicate for Grip {
        fn all_cases() -> Vec<Self> {
            vec![Self::Loose, Self::Firm]
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    enum Surface {
        Ice,
        Rock,
    }

    impl Predicate for Surface {
        fn all_cases() -> Vec<Self> {
            vec![Self::Ice, Self::Rock]
        }
    }

    fn at(line: u32) -> Origin {
        Origin {
            file: "chain.rs",
            line,
            column: 1,
        }
    }

    fn chain(links: Vec<MatchDescriptor>) -> MatchChain {
        let mut chain = MatchChain::new();
        for link in links.into_iter().rev() {
            chain.prepend(link);
        }
        chain
    }

    #[test]
    fn empty_chain_resolves_to_unconditional() {
        let resolved = MatchChain::new().resolve().unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn valid_links_merge() {
        let resolved = chain(vec![
            MatchDescriptor::new(at(1)).with_all([Grip::Firm]),
            MatchDescriptor::new(at(2))
                .with_any([Surface::Ice, Surface::Rock])
                .with_condition(Condition::new(|| true)),
        ])
        .resolve()
        .unwrap();

        assert_eq!(resolved.all_values(), &[Grip::Firm.erase()]);
        assert_eq!(resolved.any_groups().len(), 1);
        assert_eq!(resolved.origins(), &[at(1), at(2)]);
        assert!(resolved.condition().is_some());
    }

    #[test]
    fn conflict_between_links_names_both_origins() {
        let errors = chain(vec![
            MatchDescriptor::new(at(1)).with_all([Grip::Firm]),
            MatchDescriptor::new(at(2)).with_all([Grip::Loose]),
        ])
        .resolve()
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, MatchErrorKind::DuplicateMatchTypes);
        assert_eq!(errors[0].origins, vec![at(1), at(2)]);
    }

    #[test]
    fn failures_in_several_links_accumulate() {
        let errors = chain(vec![
            MatchDescriptor::new(at(1)).with_all([Grip::Firm, Grip::Loose]),
            MatchDescriptor::new(at(2)).with_all([Surface::Ice]),
            MatchDescriptor::new(at(3)).with_all([Surface::Rock, Surface::Ice]),
        ])
        .resolve()
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].origins, vec![at(1), at(3)]);
        assert_eq!(errors[0].predicates.len(), 4);
    }

    #[test]
    fn distinct_failure_kinds_stay_separate() {
        let errors = chain(vec![
            MatchDescriptor::new(at(1)).with_any([Grip::Firm.erase(), Surface::Ice.erase()]),
            MatchDescriptor::new(at(2)).with_any([Surface::Rock, Surface::Rock]),
        ])
        .resolve()
        .unwrap_err();

        let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MatchErrorKind::ConflictingAnyTypes,
                MatchErrorKind::DuplicateAnyValues
            ]
        );
    }
}
