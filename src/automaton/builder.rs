use crate::prelude::*;

/// Helper struct for the construction of a [`Dfa`]. It collects transitions and accepting
/// states and only validates them once [`DfaBuilder::into_dfa`] is called.
///
/// # Example
///
/// We want to create a DFA with two states 0 and 1 over the symbols `0` and `1`, which
/// accepts precisely the words with an even number of `1`s.
/// ```
/// use automata_minimize::prelude::*;
///
/// let dfa = Dfa::builder()
///     .with_transitions([(0, 0, 0), (0, 1, 1), (1, 0, 1), (1, 1, 0)])
///     .with_accepting([0])
///     .into_dfa(0) // 0 is the initial state
///     .unwrap();
/// assert_eq!(dfa.state_count(), 2);
/// assert!(dfa.accepts([1, 0, 1]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DfaBuilder {
    state_count: Option<usize>,
    transitions: Vec<Transition>,
    accepting: Vec<StateId>,
}

impl DfaBuilder {
    /// Fixes the number of states. Without this, the number of states is one more than the
    /// largest state that is mentioned anywhere.
    pub fn with_state_count(mut self, state_count: usize) -> Self {
        self.state_count = Some(state_count);
        self
    }

    /// Adds the given transitions, which are given as `(from, on_input, to)` triples.
    pub fn with_transitions<I>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (StateId, Symbol, StateId)>,
    {
        self.transitions
            .extend(transitions.into_iter().map(Transition::from));
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I: IntoIterator<Item = StateId>>(mut self, states: I) -> Self {
        self.accepting.extend(states);
        self
    }

    /// Creates the automaton with `initial` as its initial state.
    pub fn into_dfa(self, initial: StateId) -> Result<Dfa, AutomatonError> {
        let state_count = self.state_count.unwrap_or_else(|| {
            self.transitions
                .iter()
                .flat_map(|t| [t.from, t.to])
                .chain(self.accepting.iter().copied())
                .chain(std::iter::once(initial))
                .max()
                .map_or(0, |max| max + 1)
        });

        let mut dfa = Dfa::new(state_count, initial)?;
        for Transition { from, on_input, to } in self.transitions {
            dfa.add_transition(from, on_input, to)?;
        }
        for state in self.accepting {
            dfa.add_accepting(state)?;
        }
        Ok(dfa)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn infers_state_count() {
        let dfa = Dfa::builder()
            .with_transitions([(0, 0, 1)])
            .with_accepting([3])
            .into_dfa(0)
            .unwrap();
        assert_eq!(dfa.state_count(), 4);
        assert_eq!(dfa.accepting_states().collect::<Vec<_>>(), vec![3]);

        let single = Dfa::builder().into_dfa(0).unwrap();
        assert_eq!(single.state_count(), 1);
    }

    #[test]
    fn explicit_state_count_is_checked() {
        let result = Dfa::builder()
            .with_state_count(2)
            .with_transitions([(0, 5, 1), (1, 5, 2)])
            .into_dfa(0);
        assert_eq!(
            result,
            Err(AutomatonError::InvalidState {
                state: 2,
                state_count: 2,
                role: StateRole::Target
            })
        );

        assert!(Dfa::builder().with_state_count(0).into_dfa(0).is_err());
    }
}
