use crate::prelude::*;

/// Reads words in a [`Dfa`] through an index of outgoing transitions that is built once
/// upon creation, so every step only looks at the transitions of the current state.
/// Obtained through [`Dfa::runner`].
///
/// ```
/// use automata_minimize::prelude::*;
///
/// let dfa = Dfa::builder()
///     .with_transitions([(0, 0, 1), (1, 0, 0)])
///     .with_accepting([0])
///     .into_dfa(0)
///     .unwrap();
/// let runner = dfa.runner();
/// assert!(runner.accepts([0, 0]));
/// assert!(!runner.accepts([0]));
/// ```
#[derive(Debug, Clone)]
pub struct Runner<'a> {
    dfa: &'a Dfa,
    outgoing: AdjacentTransitions,
}

impl<'a> Runner<'a> {
    pub(super) fn new(dfa: &'a Dfa) -> Self {
        Self {
            dfa,
            outgoing: AdjacentTransitions::new(dfa.state_count(), dfa.transitions(), |t| t.from),
        }
    }

    /// The automaton that words are read in.
    pub fn dfa(&self) -> &'a Dfa {
        self.dfa
    }

    /// Returns the state reached from `state` on `symbol`. Agrees with [`Dfa::successor`],
    /// in particular the transition that was added first wins.
    pub fn successor(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        // positions are ascending, so the first match is the oldest transition
        self.outgoing
            .adjacent_to(state)
            .map(|t| &self.dfa.transitions()[t])
            .find(|t| t.on_input == symbol)
            .map(|t| t.to)
    }

    /// Reads `word` from the initial state, see [`Dfa::run`].
    pub fn run<W>(&self, word: W) -> Option<StateId>
    where
        W: IntoIterator<Item = Symbol>,
    {
        word.into_iter()
            .try_fold(self.dfa.initial(), |state, symbol| {
                self.successor(state, symbol)
            })
    }

    /// Returns true if `word` is accepted, see [`Dfa::accepts`].
    pub fn accepts<W>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = Symbol>,
    {
        self.run(word).is_some_and(|q| self.dfa.is_accepting(q))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn runner_agrees_with_dfa() {
        let dfa = Dfa::builder()
            .with_transitions([(0, 1, 1), (0, 0, 0), (1, 1, 0), (1, 0, 1), (0, 1, 0)])
            .with_accepting([1])
            .into_dfa(0)
            .unwrap();
        let runner = dfa.runner();
        assert!(std::ptr::eq(runner.dfa(), &dfa));

        for state in 0..2 {
            for symbol in 0..3 {
                assert_eq!(runner.successor(state, symbol), dfa.successor(state, symbol));
            }
        }
        // (0, 1, 1) was added before (0, 1, 0)
        assert_eq!(runner.successor(0, 1), Some(1));

        for word in [vec![], vec![1], vec![1, 0, 0], vec![0, 1, 1], vec![2]] {
            assert_eq!(runner.run(word.iter().copied()), dfa.run(word.iter().copied()));
            assert_eq!(
                runner.accepts(word.iter().copied()),
                dfa.accepts(word.iter().copied())
            );
        }
        assert_eq!(runner.run([1, 0, 0]), Some(1));
        assert_eq!(runner.run([2]), None);
    }
}
