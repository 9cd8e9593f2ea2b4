use bit_set::BitSet;
use tracing::{debug, debug_span, trace};

use crate::prelude::*;

/// The direction in which reachability is propagated along transitions.
#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn source(self, transition: &Transition) -> StateId {
        match self {
            Direction::Forward => transition.from,
            Direction::Backward => transition.to,
        }
    }

    fn target(self, transition: &Transition) -> StateId {
        match self {
            Direction::Forward => transition.to,
            Direction::Backward => transition.from,
        }
    }
}

/// Minimizes `dfa` with Valmari's algorithm, see [`Dfa::minimize_with_quotient`].
pub(super) fn minimize(dfa: &Dfa) -> (Dfa, Vec<Option<StateId>>) {
    let _span = debug_span!(
        "minimize",
        states = dfa.state_count(),
        transitions = dfa.transitions().len()
    )
    .entered();

    let state_count = dfa.state_count();
    let mut transitions = dfa.transitions().to_vec();
    let mut blocks = RefinablePartition::new(state_count);

    blocks.mark(dfa.initial());
    discard_unreachable(&mut blocks, &mut transitions, Direction::Forward);

    for state in dfa.accepting_states() {
        blocks.mark(state);
    }
    if !blocks.has_pending_marks() {
        debug!("no accepting state is reachable, the language is empty");
        return super::empty_language(dfa);
    }
    discard_unreachable(&mut blocks, &mut transitions, Direction::Backward);

    for state in dfa.accepting_states() {
        blocks.mark(state);
    }
    blocks.split_sets();
    debug!(
        "separated accepting from rejecting states, {} blocks",
        blocks.set_count()
    );

    let mut cords = RefinablePartition::new(transitions.len());
    cords.partition_by(|t| transitions[t].on_input);
    debug!("grouped transitions into {} cords", cords.set_count());

    let incoming = AdjacentTransitions::new(state_count, &transitions, |t| t.to);
    // block 0 is never used for splitting cords, one of the parts can always be skipped
    let mut block = 1;
    let mut cord = 0;
    while cord < cords.set_count() {
        for &t in cords.set(cord) {
            blocks.mark(transitions[t].from);
        }
        let created = blocks.split_sets();
        if created > 0 {
            trace!("cord {cord} split off {created} blocks");
        }
        cord += 1;

        while block < blocks.set_count() {
            for &state in blocks.set(block) {
                for t in incoming.adjacent_to(state) {
                    cords.mark(t);
                }
            }
            let created = cords.split_sets();
            if created > 0 {
                trace!("block {block} split off {created} cords");
            }
            block += 1;
        }
    }
    debug!(
        "refinement stable with {} blocks and {} cords",
        blocks.set_count(),
        cords.set_count()
    );

    let block_of = |state: StateId| {
        blocks
            .set_of(state)
            .expect("every remaining transition connects remaining states")
    };

    let mut accepting = BitSet::with_capacity(blocks.set_count());
    for set in 0..blocks.set_count() {
        // all states of a block agree on whether they are accepting
        if dfa.is_accepting(blocks.some_element_of(set)) {
            accepting.insert(set);
        }
    }

    // a cord may contain transitions that leave different blocks, so instead of picking one
    // transition per cord we keep the transitions that leave the representative of a block
    let minimized_transitions = transitions
        .iter()
        .filter(|t| blocks.some_element_of(block_of(t.from)) == t.from)
        .map(|t| Transition::new(block_of(t.from), t.on_input, block_of(t.to)))
        .collect();

    let initial = blocks
        .set_of(dfa.initial())
        .expect("the initial state reaches an accepting state");
    let minimized = Dfa::from_raw_parts(
        blocks.set_count(),
        initial,
        minimized_transitions,
        accepting,
    );
    let quotient = (0..state_count).map(|q| blocks.set_of(q)).collect();

    debug!(
        "minimized automaton has {} states and {} transitions",
        minimized.state_count(),
        minimized.transitions().len()
    );
    (minimized, quotient)
}

/// Propagates the marks in the single set of `blocks` along `transitions` in the given
/// `direction` until every state that can be reached from a marked state is marked. Then
/// all unmarked states are discarded, as well as the transitions whose source in the
/// given direction has been discarded.
fn discard_unreachable(
    blocks: &mut RefinablePartition,
    transitions: &mut Vec<Transition>,
    direction: Direction,
) {
    let adjacent = AdjacentTransitions::new(blocks.len(), transitions, |t| direction.source(t));

    let mut frontier = blocks.marked_mut(0);
    while let Some(state) = frontier.next() {
        for t in adjacent.adjacent_to(state) {
            frontier.mark(direction.target(&transitions[t]));
        }
    }

    let discarded = blocks.discard_unmarked();
    let before = transitions.len();
    transitions.retain(|t| blocks.set_of(direction.source(t)).is_some());
    debug!(
        "{direction:?} pass discarded {discarded} states and {} transitions",
        before - transitions.len()
    );
}
