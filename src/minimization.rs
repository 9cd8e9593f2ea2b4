mod partition;
pub use partition::{MarkedFrontier, RefinablePartition};

mod valmari;

/// A straightforward minimizer that repeatedly refines states by the classes of their
/// successors, used as a reference for [`Dfa::minimize`].
pub mod moore;

use crate::prelude::*;

impl Dfa {
    /// Returns the unique minimal automaton that accepts the same language as `self`. This
    /// is done using Valmari's partition refinement algorithm, which runs in
    /// `O(n + m log m)` for `n` states and `m` transitions.
    ///
    /// States that cannot be reached from the initial state and states from which no
    /// accepting state can be reached are removed together with their transitions, so the
    /// result is in general a partial automaton. If the accepted language is empty, the
    /// result consists of a single rejecting state without any transitions.
    ///
    /// # Example
    /// ```
    /// use automata_minimize::prelude::*;
    ///
    /// // states 1 and 2 behave identically
    /// let dfa = Dfa::builder()
    ///     .with_transitions([(0, 0, 1), (0, 1, 2), (1, 0, 3), (2, 0, 3), (3, 0, 3)])
    ///     .with_accepting([3])
    ///     .into_dfa(0)
    ///     .unwrap();
    /// let minimized = dfa.minimize();
    /// assert_eq!(minimized.state_count(), 3);
    /// assert!(minimized.accepts([1, 0]));
    /// ```
    pub fn minimize(&self) -> Dfa {
        self.minimize_with_quotient().0
    }

    /// Works like [`Dfa::minimize`], but additionally returns for every state of `self`
    /// the state of the minimized automaton that it was merged into. States that were
    /// removed because they are unreachable or cannot reach an accepting state map to
    /// `None`.
    pub fn minimize_with_quotient(&self) -> (Dfa, Vec<Option<StateId>>) {
        valmari::minimize(self)
    }
}

/// The automaton with a single rejecting state and no transitions, along with a quotient
/// that maps only the initial state of `dfa` to it. This is the result of minimizing an
/// automaton whose language is empty.
fn empty_language(dfa: &Dfa) -> (Dfa, Vec<Option<StateId>>) {
    let mut quotient = vec![None; dfa.state_count()];
    quotient[dfa.initial()] = Some(0);
    (
        Dfa::from_raw_parts(1, 0, vec![], bit_set::BitSet::new()),
        quotient,
    )
}
