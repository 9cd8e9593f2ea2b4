use crate::prelude::*;

/// Static index that groups the positions of transitions by one of their endpoints. Which
/// endpoint is used is decided by a selector function given upon construction, so the same
/// structure serves for outgoing (select [`Transition::from`]) as well as for incoming
/// (select [`Transition::to`]) transitions.
///
/// The index only stores positions into the slice of transitions it was built from. It
/// does not borrow that slice, and the positions become meaningless once it is modified.
#[derive(Debug, Clone)]
pub struct AdjacentTransitions {
    adjacent: Vec<usize>,
    offset: Vec<usize>,
}

impl AdjacentTransitions {
    /// Builds the index through a counting sort in `O(transitions.len() + state_count)`.
    ///
    /// # Panics
    /// If `selector` returns a state that is not smaller than `state_count`.
    pub fn new<F>(state_count: usize, transitions: &[Transition], selector: F) -> Self
    where
        F: Fn(&Transition) -> StateId,
    {
        let mut offset = vec![0; state_count + 1];
        for transition in transitions {
            offset[selector(transition)] += 1;
        }

        for state in 0..state_count {
            offset[state + 1] += offset[state];
        }

        // placing back to front leaves every offset pointing at the start of its range
        // and keeps the transitions of one state in ascending order
        let mut adjacent = vec![0; transitions.len()];
        for (position, transition) in transitions.iter().enumerate().rev() {
            let state = selector(transition);
            offset[state] -= 1;
            adjacent[offset[state]] = position;
        }

        Self { adjacent, offset }
    }

    /// Returns the positions of all transitions whose selected endpoint is `state`, in
    /// ascending order.
    pub fn adjacent_to(&self, state: StateId) -> impl Iterator<Item = usize> + '_ {
        self.adjacent[self.offset[state]..self.offset[state + 1]]
            .iter()
            .copied()
    }

    /// The number of states this index was built for.
    pub fn state_count(&self) -> usize {
        self.offset.len() - 1
    }

    /// The number of indexed transitions.
    pub fn len(&self) -> usize {
        self.adjacent.len()
    }

    /// Returns true if no transitions were indexed.
    pub fn is_empty(&self) -> bool {
        self.adjacent.is_empty()
    }
}
