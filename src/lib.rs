//! Minimization of deterministic finite automata (DFA) in near-linear time.
//!
//! A [`Dfa`] is given by a number of states, a designated initial state, a list of labeled
//! transitions and a set of accepting states. Transitions may be missing, in which case a
//! run that would need them is rejected, so automata do not need to be complete. Calling
//! [`Dfa::minimize`] yields the unique (up to renaming of states) smallest automaton that
//! accepts the same language, computed with the partition refinement algorithm from
//! Valmari's "Fast brief practical DFA minimization" (2011).
//!
//! The algorithm works on two refinable partitions at the same time: one that groups states
//! into *blocks* and one that groups transitions into *cords*. Initially, blocks separate
//! accepting from rejecting states and cords separate transitions by their symbol. Then
//! cords split blocks by where transitions originate, and newly created blocks split cords
//! by where transitions lead, until neither partition changes any more. Before that,
//! states that are unreachable from the initial state or from which no accepting state can
//! be reached are removed, along with their transitions.
//!
//! The building blocks of the algorithm are exposed as well:
//! - [`minimization::RefinablePartition`] is the partition data structure with marking,
//!   splitting and discarding of elements.
//! - [`adjacency::AdjacentTransitions`] indexes the transitions by one of their endpoints.
//!
//! A simpler Moore-style minimizer lives in [`minimization::moore`], it mainly serves as a
//! reference to compare against. The [`text`] module reads and writes automata in a
//! plain line-based format.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_minimize::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        adjacency::AdjacentTransitions,
        automaton::{
            AutomatonError, Dfa, DfaBuilder, Runner, StateId, StateRole, Symbol, Transition,
        },
        math,
        minimization::{moore, MarkedFrontier, RefinablePartition},
        text::{read_dfa, write_dfa, ParseError},
    };
}

/// Type aliases for the collections that are used throughout the crate.
pub mod math;

/// Defines deterministic finite automata, their transitions and how to build them.
pub mod automaton;
pub use automaton::Dfa;

/// Static indices from states to their adjacent transitions.
pub mod adjacency;

/// Contains the partition refinement machinery and the minimization algorithms.
pub mod minimization;

/// Reading and writing automata in a simple textual format.
pub mod text;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// The automaton from the introduction of the Wikipedia article on DFA minimization,
    /// states `2`, `3` and `4` are equivalent and so are `0` and `1`.
    pub fn wiki_dfa() -> Dfa {
        Dfa::builder()
            .with_transitions([
                (0, 0, 1),
                (0, 1, 2),
                (1, 0, 0),
                (1, 1, 3),
                (2, 0, 4),
                (2, 1, 5),
                (3, 0, 4),
                (3, 1, 5),
                (4, 0, 4),
                (4, 1, 5),
                (5, 0, 5),
                (5, 1, 5),
            ])
            .with_accepting([2, 3, 4])
            .into_dfa(0)
            .unwrap()
    }

    #[test]
    fn minimize_wiki_dfa() {
        let dfa = wiki_dfa();
        let minimized = dfa.minimize();
        // state 5 is a rejecting sink and therefore removed as well
        assert_eq!(minimized.state_count(), 2);
        assert_eq!(minimized.accepting_states().count(), 1);
        assert!(!minimized.is_accepting(minimized.initial()));

        let (ours, theirs) = (dfa.runner(), minimized.runner());
        for word in [&[][..], &[0], &[1], &[0, 1], &[0, 0, 1], &[1, 0], &[1, 1], &[0, 1, 0]] {
            assert_eq!(ours.accepts(word.iter().copied()), theirs.accepts(word.iter().copied()));
        }
    }
}
