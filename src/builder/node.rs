//! Rule nodes: the tree a state declaration is written as.
//!
//! Nodes chain (`matching(p).when(e).then(s)`) or open a block of nested
//! nodes (`when(e).block([..])`). Folding the tree turns it into flat rows.

use super::error::NodeKind;
use crate::core::{Condition, Event, Origin, State};
use crate::effects::Action;
use crate::matching::MatchDescriptor;
use crate::predicate::AnyPredicate;

/// What a node contributes to the rows below it.
pub(crate) enum Step<S, E, Env> {
    Match(MatchDescriptor),
    When(Vec<E>),
    Then(S),
    Actions(Vec<Action<E, Env>>),
    Override,
}

pub(crate) enum Body<S, E, Env> {
    /// End of a chain: yields one empty row for the node to fill in.
    Leaf,
    Chain(Box<Node<S, E, Env>>),
    Block(Vec<Node<S, E, Env>>),
}

/// One node of a rule tree.
pub struct Node<S, E, Env = ()> {
    pub(crate) step: Step<S, E, Env>,
    pub(crate) body: Body<S, E, Env>,
    pub(crate) origin: Origin,
}

impl<S, E, Env> Node<S, E, Env> {
    fn leaf(step: Step<S, E, Env>, origin: Origin) -> Self {
        Node {
            step,
            body: Body::Leaf,
            origin,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.step {
            Step::Match(_) => NodeKind::Match,
            Step::When(_) => NodeKind::When,
            Step::Then(_) => NodeKind::Then,
            Step::Actions(_) => NodeKind::Actions,
            Step::Override => NodeKind::Override,
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

impl<S: State, E: Event, Env> Node<S, E, Env> {
    /// Attach `next` at the end of this chain. After a block, `next` is
    /// attached to every node of the block.
    fn append(self, next: Node<S, E, Env>) -> Self {
        let body = match self.body {
            Body::Leaf => Body::Chain(Box::new(next)),
            Body::Chain(inner) => Body::Chain(Box::new(inner.append(next))),
            Body::Block(nodes) => Body::Block(
                nodes
                    .into_iter()
                    .map(|node| node.append(next.clone()))
                    .collect(),
            ),
        };
        Node { body, ..self }
    }

    /// Open a block of nested rules at the end of this chain.
    pub fn block<I>(self, rules: I) -> Self
    where
        I: IntoIterator<Item = Node<S, E, Env>>,
    {
        let rules: Vec<_> = rules.into_iter().collect();
        self.attach_block(rules)
    }

    fn attach_block(self, rules: Vec<Node<S, E, Env>>) -> Self {
        let body = match self.body {
            Body::Leaf => Body::Block(rules),
            Body::Chain(inner) => Body::Chain(Box::new(inner.attach_block(rules))),
            Body::Block(nodes) => Body::Block(
                nodes
                    .into_iter()
                    .map(|node| node.attach_block(rules.clone()))
                    .collect(),
            ),
        };
        Node { body, ..self }
    }

    #[track_caller]
    pub fn matching<P: Into<AnyPredicate>>(self, predicate: P) -> Self {
        self.append(matching(predicate))
    }

    #[track_caller]
    pub fn matching_any<I, P>(self, values: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<AnyPredicate>,
    {
        self.append(matching_any(values))
    }

    #[track_caller]
    pub fn matching_all<I, P>(self, values: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<AnyPredicate>,
    {
        self.append(matching_all(values))
    }

    #[track_caller]
    pub fn condition<F>(self, check: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.append(matching_condition(check))
    }

    #[track_caller]
    pub fn when(self, event: E) -> Self {
        self.append(when(event))
    }

    #[track_caller]
    pub fn when_any<I: IntoIterator<Item = E>>(self, events: I) -> Self {
        self.append(when_any(events))
    }

    #[track_caller]
    pub fn then(self, state: S) -> Self {
        self.append(then(state))
    }

    #[track_caller]
    pub fn actions<I: IntoIterator<Item = Action<E, Env>>>(self, actions: I) -> Self {
        self.append(actions_node(actions))
    }

    /// Shorthand for a single plain action.
    #[track_caller]
    pub fn action<F>(self, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.append(actions_node([Action::new(action)]))
    }

    /// Shorthand for a single plain action that receives the event.
    #[track_caller]
    pub fn action_with_event<F>(self, action: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.append(actions_node([Action::with_event(action)]))
    }
}

/// Match rows on one predicate value.
#[track_caller]
pub fn matching<S, E, Env, P: Into<AnyPredicate>>(predicate: P) -> Node<S, E, Env> {
    matching_descriptor(MatchDescriptor::new(Origin::here()).with_all([predicate]))
}

/// Match rows when any one of `values` holds. All values must share a type.
#[track_caller]
pub fn matching_any<S, E, Env, I, P>(values: I) -> Node<S, E, Env>
where
    I: IntoIterator<Item = P>,
    P: Into<AnyPredicate>,
{
    matching_descriptor(MatchDescriptor::new(Origin::here()).with_any(values))
}

/// Match rows when every one of `values` holds.
#[track_caller]
pub fn matching_all<S, E, Env, I, P>(values: I) -> Node<S, E, Env>
where
    I: IntoIterator<Item = P>,
    P: Into<AnyPredicate>,
{
    matching_descriptor(MatchDescriptor::new(Origin::here()).with_all(values))
}

/// Gate rows behind a condition evaluated at dispatch time.
#[track_caller]
pub fn matching_condition<S, E, Env, F>(check: F) -> Node<S, E, Env>
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    matching_descriptor(MatchDescriptor::new(Origin::here()).with_condition(Condition::new(check)))
}

/// Match rows with a hand-built descriptor.
#[track_caller]
pub fn matching_descriptor<S, E, Env>(descriptor: MatchDescriptor) -> Node<S, E, Env> {
    Node::leaf(Step::Match(descriptor), Origin::here())
}

#[track_caller]
pub fn when<S, E, Env>(event: E) -> Node<S, E, Env> {
    Node::leaf(Step::When(vec![event]), Origin::here())
}

/// One row per event, everything else shared.
#[track_caller]
pub fn when_any<S, E, Env, I: IntoIterator<Item = E>>(events: I) -> Node<S, E, Env> {
    Node::leaf(Step::When(events.into_iter().collect()), Origin::here())
}

#[track_caller]
pub fn then<S, E, Env>(state: S) -> Node<S, E, Env> {
    Node::leaf(Step::Then(state), Origin::here())
}

#[track_caller]
pub fn actions<S, E, Env, I>(actions: I) -> Node<S, E, Env>
where
    I: IntoIterator<Item = Action<E, Env>>,
{
    actions_node(actions)
}

#[track_caller]
fn actions_node<S, E, Env, I>(actions: I) -> Node<S, E, Env>
where
    I: IntoIterator<Item = Action<E, Env>>,
{
    Node::leaf(Step::Actions(actions.into_iter().collect()), Origin::here())
}

/// Mark every row in `rules` as replacing an earlier row with the same
/// state, match and event.
#[track_caller]
pub fn overriding<S, E, Env, I>(rules: I) -> Node<S, E, Env>
where
    I: IntoIterator<Item = Node<S, E, Env>>,
{
    Node {
        step: Step::Override,
        body: Body::Block(rules.into_iter().collect()),
        origin: Origin::here(),
    }
}

impl<S: Clone, E: Clone, Env> Clone for Step<S, E, Env> {
    fn clone(&self) -> Self {
        match self {
            Step::Match(descriptor) => Step::Match(descriptor.clone()),
            Step::When(events) => Step::When(events.clone()),
            Step::Then(state) => Step::Then(state.clone()),
            Step::Actions(actions) => Step::Actions(actions.clone()),
            Step::Override => Step::Override,
        }
    }
}

impl<S: Clone, E: Clone, Env> Clone for Body<S, E, Env> {
    fn clone(&self) -> Self {
        match self {
            Body::Leaf => Body::Leaf,
            Body::Chain(inner) => Body::Chain(inner.clone()),
            Body::Block(nodes) => Body::Block(nodes.clone()),
        }
    }
}

impl<S: Clone, E: Clone, Env> Clone for Node<S, E, Env> {
    fn clone(&self) -> Self {
        Node {
            step: self.step.clone(),
            body: self.body.clone(),
            origin: self.origin,
        }
    }
}
