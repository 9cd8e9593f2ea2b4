use std::{collections::VecDeque, fmt::Display};

use bit_set::BitSet;
use itertools::Itertools;
use thiserror::Error;

use crate::{
    math::{Bijection, Set},
    prelude::*,
};

mod builder;
pub use builder::DfaBuilder;

mod runner;
pub use runner::Runner;

/// Type used to identify states. States of an automaton with `n` states are `0..n`.
pub type StateId = usize;

/// Type used for the symbols that label transitions.
pub type Symbol = u32;

/// The role in which a state occurs, used for reporting invalid states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateRole {
    /// The designated initial state.
    Initial,
    /// The origin of a transition.
    Source,
    /// The target of a transition.
    Target,
    /// A state that should be accepting.
    Accepting,
}

impl Display for StateRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateRole::Initial => write!(f, "initial"),
            StateRole::Source => write!(f, "source"),
            StateRole::Target => write!(f, "target"),
            StateRole::Accepting => write!(f, "accepting"),
        }
    }
}

/// Errors that are raised when an automaton is constructed from invalid parts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// A state id that is not smaller than the number of states.
    #[error("{role} state {state} does not exist in an automaton with {state_count} states")]
    InvalidState {
        /// The offending state.
        state: StateId,
        /// The number of states of the automaton.
        state_count: usize,
        /// Where the state was used.
        role: StateRole,
    },
    /// Some argument, for example the number of states, is unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A transition leads from one state to another on reading a symbol. Transitions are
/// identified by their position in the list of transitions of an automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transition {
    /// The state in which the transition originates.
    pub from: StateId,
    /// The symbol on which the transition is taken.
    pub on_input: Symbol,
    /// The state that the transition leads to.
    pub to: StateId,
}

impl Transition {
    /// Creates a new transition from `from` to `to` on `on_input`.
    pub fn new(from: StateId, on_input: Symbol, to: StateId) -> Self {
        Self { from, on_input, to }
    }
}

impl From<(StateId, Symbol, StateId)> for Transition {
    fn from((from, on_input, to): (StateId, Symbol, StateId)) -> Self {
        Self::new(from, on_input, to)
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.from, self.on_input, self.to)
    }
}

/// A deterministic finite automaton, consisting of the states `0..state_count`, an
/// initial state, a list of transitions and a set of accepting states. A finite word is
/// accepted if reading it from the initial state leads to an accepting state.
///
/// The automaton may be partial, i.e. some state may have no transition on some symbol.
/// Reading that symbol in that state rejects the word. Determinism is not enforced upon
/// construction, see [`Dfa::is_deterministic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    state_count: usize,
    initial: StateId,
    transitions: Vec<Transition>,
    accepting: BitSet,
}

impl Dfa {
    /// Creates an automaton with `state_count` states and the given `initial` state, which
    /// has neither transitions nor accepting states. Nothing is allocated per state.
    pub fn new(state_count: usize, initial: StateId) -> Result<Self, AutomatonError> {
        if state_count == 0 {
            return Err(AutomatonError::InvalidArgument(
                "an automaton needs at least one state".to_string(),
            ));
        }
        check_state(initial, state_count, StateRole::Initial)?;
        Ok(Self::from_raw_parts(
            state_count,
            initial,
            vec![],
            BitSet::new(),
        ))
    }

    /// Assembles an automaton without checking any of the parts, callers guarantee that all
    /// states are in range.
    pub(crate) fn from_raw_parts(
        state_count: usize,
        initial: StateId,
        transitions: Vec<Transition>,
        accepting: BitSet,
    ) -> Self {
        debug_assert!(initial < state_count);
        debug_assert!(transitions
            .iter()
            .all(|t| t.from < state_count && t.to < state_count));
        Self {
            state_count,
            initial,
            transitions,
            accepting,
        }
    }

    /// Returns a [`DfaBuilder`] for conveniently creating an automaton.
    pub fn builder() -> DfaBuilder {
        DfaBuilder::default()
    }

    /// Adds a transition from `from` to `to` on `on_input`.
    pub fn add_transition(
        &mut self,
        from: StateId,
        on_input: Symbol,
        to: StateId,
    ) -> Result<(), AutomatonError> {
        check_state(from, self.state_count, StateRole::Source)?;
        check_state(to, self.state_count, StateRole::Target)?;
        self.transitions.push(Transition::new(from, on_input, to));
        Ok(())
    }

    /// Makes `state` accepting. Returns whether it was rejecting before.
    pub fn add_accepting(&mut self, state: StateId) -> Result<bool, AutomatonError> {
        check_state(state, self.state_count, StateRole::Accepting)?;
        Ok(self.accepting.insert(state))
    }

    /// The number of states.
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// The initial state.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// All transitions in the order in which they were added.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Iterates over the accepting states in ascending order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.accepting.iter()
    }

    /// Returns true if `state` is accepting.
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(state)
    }

    /// Returns the symbols that label at least one transition, in ascending order.
    pub fn alphabet(&self) -> Vec<Symbol> {
        self.transitions
            .iter()
            .map(|t| t.on_input)
            .sorted()
            .dedup()
            .collect()
    }

    /// Returns true if no two transitions leave the same state on the same symbol.
    pub fn is_deterministic(&self) -> bool {
        let mut seen: Set<(StateId, Symbol)> = Set::default();
        self.transitions
            .iter()
            .all(|t| seen.insert((t.from, t.on_input)))
    }

    fn outgoing(&self) -> AdjacentTransitions {
        AdjacentTransitions::new(self.state_count, &self.transitions, |t| t.from)
    }

    /// Returns the state reached from `state` on `symbol`, or `None` if there is no such
    /// transition. If there are several, the one that was added first is taken. This scans
    /// all transitions, use a [`Runner`] for repeated lookups.
    pub fn successor(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        self.transitions
            .iter()
            .find(|t| t.from == state && t.on_input == symbol)
            .map(|t| t.to)
    }

    /// Returns a [`Runner`] that indexes the outgoing transitions once and can then read
    /// any number of words.
    pub fn runner(&self) -> Runner<'_> {
        Runner::new(self)
    }

    /// Reads `word` starting in the initial state and returns the state that is reached,
    /// or `None` if some transition along the way is missing.
    ///
    /// Every call indexes the transitions in `O(n + m)` first, so reading many words
    /// should go through [`Dfa::runner`] instead.
    pub fn run<W>(&self, word: W) -> Option<StateId>
    where
        W: IntoIterator<Item = Symbol>,
    {
        self.runner().run(word)
    }

    /// Returns true if `word` is accepted, i.e. if reading it from the initial state leads
    /// to an accepting state. Like [`Dfa::run`], this builds an index on every call.
    pub fn accepts<W>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = Symbol>,
    {
        self.runner().accepts(word)
    }

    /// Checks whether `self` and `other` are the same automaton up to a renaming of states.
    /// Both automata are traversed in lock step starting from their initial states, so this
    /// is meant for deterministic automata in which every state is reachable, such as
    /// the result of a minimization. Automata with unreachable states are never considered
    /// isomorphic.
    pub fn is_isomorphic_to(&self, other: &Dfa) -> bool {
        if self.state_count != other.state_count
            || self.transitions.len() != other.transitions.len()
            || self.accepting.len() != other.accepting.len()
        {
            return false;
        }

        let ours = self.outgoing();
        let theirs = other.outgoing();
        let labeled_successors = |dfa: &Dfa, index: &AdjacentTransitions, state: StateId| {
            index
                .adjacent_to(state)
                .map(|t| (dfa.transitions[t].on_input, dfa.transitions[t].to))
                .sorted()
                .collect_vec()
        };

        let mut bijection: Bijection<StateId, StateId> = Bijection::new();
        bijection.insert(self.initial, other.initial);
        let mut queue = VecDeque::from([(self.initial, other.initial)]);

        while let Some((p, q)) = queue.pop_front() {
            if self.is_accepting(p) != other.is_accepting(q) {
                return false;
            }
            let left = labeled_successors(self, &ours, p);
            let right = labeled_successors(other, &theirs, q);
            if left.len() != right.len() {
                return false;
            }
            for ((a, p_next), (b, q_next)) in left.into_iter().zip(right) {
                if a != b {
                    return false;
                }
                match (
                    bijection.get_by_left(&p_next),
                    bijection.get_by_right(&q_next),
                ) {
                    (None, None) => {
                        bijection.insert(p_next, q_next);
                        queue.push_back((p_next, q_next));
                    }
                    (Some(&mapped), Some(_)) if mapped == q_next => {}
                    _ => return false,
                }
            }
        }

        bijection.len() == self.state_count
    }

    /// Returns a string representation of the transition table. There is one row per state
    /// and one column per symbol of the [`Dfa::alphabet`]. The initial state is prefixed
    /// with `->` and accepting states are suffixed with `*`.
    pub fn transition_table(&self) -> String {
        let alphabet = self.alphabet();
        let outgoing = self.outgoing();

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(alphabet.iter().map(|a| a.to_string())),
        );
        for state in 0..self.state_count {
            let mut row = vec![format!(
                "{}{}{}",
                if state == self.initial { "->" } else { "" },
                state,
                if self.is_accepting(state) { "*" } else { "" }
            )];
            for &symbol in &alphabet {
                let targets = outgoing
                    .adjacent_to(state)
                    .map(|t| &self.transitions[t])
                    .filter(|t| t.on_input == symbol)
                    .map(|t| t.to)
                    .join(", ");
                row.push(if targets.is_empty() {
                    "-".to_string()
                } else {
                    targets
                });
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.transition_table())
    }
}

fn check_state(state: StateId, state_count: usize, role: StateRole) -> Result<(), AutomatonError> {
    if state < state_count {
        Ok(())
    } else {
        Err(AutomatonError::InvalidState {
            state,
            state_count,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn parity_of_ones() -> Dfa {
        Dfa::builder()
            .with_transitions([(0, 0, 0), (0, 1, 1), (1, 0, 1), (1, 1, 0)])
            .with_accepting([0])
            .into_dfa(0)
            .unwrap()
    }

    #[test]
    fn construction_checks_states() {
        assert!(matches!(
            Dfa::new(0, 0),
            Err(AutomatonError::InvalidArgument(_))
        ));
        assert_eq!(
            Dfa::new(2, 2),
            Err(AutomatonError::InvalidState {
                state: 2,
                state_count: 2,
                role: StateRole::Initial
            })
        );

        // states are not allocated up front
        let huge = Dfa::new(usize::MAX, 0).unwrap();
        assert_eq!(huge.state_count(), usize::MAX);
        assert!(!huge.is_accepting(usize::MAX - 1));

        let mut dfa = Dfa::new(2, 0).unwrap();
        assert!(dfa.add_transition(0, 3, 1).is_ok());
        assert_eq!(
            dfa.add_transition(0, 3, 5),
            Err(AutomatonError::InvalidState {
                state: 5,
                state_count: 2,
                role: StateRole::Target
            })
        );
        assert!(matches!(
            dfa.add_transition(7, 3, 1),
            Err(AutomatonError::InvalidState {
                role: StateRole::Source,
                ..
            })
        ));
        assert_eq!(dfa.add_accepting(1), Ok(true));
        assert_eq!(dfa.add_accepting(1), Ok(false));
        assert!(dfa.add_accepting(2).is_err());
        assert_eq!(dfa.transitions().len(), 1);
    }

    #[test]
    fn error_messages() {
        let error = AutomatonError::InvalidState {
            state: 4,
            state_count: 3,
            role: StateRole::Accepting,
        };
        assert_eq!(
            error.to_string(),
            "accepting state 4 does not exist in an automaton with 3 states"
        );
    }

    #[test]
    fn running_words() {
        let dfa = parity_of_ones();
        assert_eq!(dfa.alphabet(), vec![0, 1]);
        assert!(dfa.is_deterministic());
        assert_eq!(dfa.successor(0, 1), Some(1));
        assert_eq!(dfa.successor(1, 2), None);

        assert!(dfa.accepts([]));
        assert!(dfa.accepts([1, 0, 1]));
        assert!(!dfa.accepts([1, 0, 0]));
        assert_eq!(dfa.run([1, 1, 1]), Some(1));
        // symbol 2 has no transition
        assert_eq!(dfa.run([0, 2]), None);
        assert!(!dfa.accepts([2]));
    }

    #[test]
    fn nondeterminism_is_detected() {
        let dfa = Dfa::builder()
            .with_transitions([(0, 0, 0), (0, 0, 1)])
            .into_dfa(0)
            .unwrap();
        assert!(!dfa.is_deterministic());
    }

    #[test]
    fn isomorphism() {
        let dfa = parity_of_ones();
        let renamed = Dfa::builder()
            .with_transitions([(1, 1, 0), (0, 0, 0), (1, 0, 1), (0, 1, 1)])
            .with_accepting([1])
            .into_dfa(1)
            .unwrap();
        assert!(dfa.is_isomorphic_to(&renamed));
        assert!(renamed.is_isomorphic_to(&dfa));

        let flipped = Dfa::builder()
            .with_transitions([(0, 0, 0), (0, 1, 1), (1, 0, 1), (1, 1, 0)])
            .with_accepting([1])
            .into_dfa(0)
            .unwrap();
        assert!(!dfa.is_isomorphic_to(&flipped));

        let relabeled = Dfa::builder()
            .with_transitions([(0, 0, 0), (0, 2, 1), (1, 0, 1), (1, 2, 0)])
            .with_accepting([0])
            .into_dfa(0)
            .unwrap();
        assert!(!dfa.is_isomorphic_to(&relabeled));
    }

    #[test]
    fn transition_table() {
        let table = parity_of_ones().transition_table();
        assert!(table.contains("->0*"));
        assert!(table.contains("State"));
        assert_eq!(table, parity_of_ones().to_string());
    }
}
