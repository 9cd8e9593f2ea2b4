use bit_set::BitSet;
use itertools::Itertools;
use tracing::{debug, trace};

use crate::{math::Map, prelude::*};

/// Minimizes `dfa` with Moore's algorithm. Starting from the split into accepting and
/// rejecting states, every round assigns each state a signature consisting of its
/// current class and the classes its transitions lead to, and states with equal
/// signatures form the classes of the next round. This stops once a round creates no new
/// class, which takes at most `n` rounds of `O(m log m)` each.
///
/// Unreachable and dead states are removed beforehand, so the result is isomorphic to the
/// one produced by [`Dfa::minimize`], including the case of an empty language.
pub fn minimize(dfa: &Dfa) -> Dfa {
    let live = live_states(dfa);
    if !live.contains(dfa.initial()) {
        debug!("initial state is dead, the language is empty");
        return super::empty_language(dfa).0;
    }

    let transitions = dfa.transitions();
    let outgoing = AdjacentTransitions::new(dfa.state_count(), transitions, |t| t.from);
    let live_successors = |q: StateId| live_transitions_from(&outgoing, transitions, &live, q);
    let states = live.iter().collect_vec();

    let mut class = vec![0; dfa.state_count()];
    for &q in &states {
        class[q] = usize::from(dfa.is_accepting(q));
    }
    let mut class_count = states.iter().map(|&q| class[q]).unique().count();

    let mut round = 0;
    loop {
        let mut ids: Map<(usize, Vec<(Symbol, usize)>), usize> = Map::default();
        let mut refined = vec![0; dfa.state_count()];
        for &q in &states {
            let signature = live_successors(q)
                .map(|t| (t.on_input, class[t.to]))
                .sorted()
                .collect_vec();
            let next = ids.len();
            refined[q] = *ids.entry((class[q], signature)).or_insert(next);
        }
        class = refined;
        round += 1;

        trace!("round {round} produced {} classes", ids.len());
        if ids.len() == class_count {
            break;
        }
        class_count = ids.len();
    }

    let mut representative = vec![None; class_count];
    for &q in &states {
        representative[class[q]].get_or_insert(q);
    }

    let mut accepting = BitSet::with_capacity(class_count);
    let mut minimized_transitions = vec![];
    for (id, q) in representative.into_iter().flatten().enumerate() {
        if dfa.is_accepting(q) {
            accepting.insert(id);
        }
        minimized_transitions.extend(
            live_successors(q)
                .map(|t| Transition::new(id, t.on_input, class[t.to]))
                .sorted()
                .dedup(),
        );
    }

    debug!("moore minimization took {round} rounds for {class_count} classes");
    Dfa::from_raw_parts(
        class_count,
        class[dfa.initial()],
        minimized_transitions,
        accepting,
    )
}

fn live_transitions_from<'a>(
    outgoing: &'a AdjacentTransitions,
    transitions: &'a [Transition],
    live: &'a BitSet,
    state: StateId,
) -> impl Iterator<Item = &'a Transition> + 'a {
    outgoing
        .adjacent_to(state)
        .map(move |t| &transitions[t])
        .filter(move |t| live.contains(t.to))
}

/// Computes the states that are reachable from the initial state and from which an
/// accepting state can be reached.
fn live_states(dfa: &Dfa) -> BitSet {
    let transitions = dfa.transitions();
    let outgoing = AdjacentTransitions::new(dfa.state_count(), transitions, |t| t.from);
    let incoming = AdjacentTransitions::new(dfa.state_count(), transitions, |t| t.to);

    let mut reachable = BitSet::with_capacity(dfa.state_count());
    reachable.insert(dfa.initial());
    let mut stack = vec![dfa.initial()];
    while let Some(q) = stack.pop() {
        for t in outgoing.adjacent_to(q) {
            if reachable.insert(transitions[t].to) {
                stack.push(transitions[t].to);
            }
        }
    }

    let mut live = BitSet::with_capacity(dfa.state_count());
    let mut stack = dfa
        .accepting_states()
        .filter(|&q| reachable.contains(q))
        .collect_vec();
    live.extend(stack.iter().copied());
    while let Some(q) = stack.pop() {
        for t in incoming.adjacent_to(q) {
            let p = transitions[t].from;
            if reachable.contains(p) && live.insert(p) {
                stack.push(p);
            }
        }
    }
    live
}
