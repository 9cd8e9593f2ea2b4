use bit_set::BitSet;

use crate::prelude::*;

/// Generates a complete random [`Dfa`] with `states` states over the symbols `0..symbols`.
/// For every state and every symbol a target state is drawn uniformly, and each state is
/// accepting with probability `accepting_probability`. The initial state is `0`, so
/// depending on the drawn transitions there may be unreachable states.
///
/// The generator of [`fastrand`] is used, which can be seeded through [`fastrand::seed`]
/// to obtain reproducible automata.
///
/// # Panics
/// If `states` is zero.
pub fn generate_random_dfa(states: usize, symbols: Symbol, accepting_probability: f64) -> Dfa {
    generate_random_partial_dfa(states, symbols, 1.0, accepting_probability)
}

/// Works as [`generate_random_dfa`], but each transition is only present with probability
/// `edge_probability`, so the resulting automaton is in general partial.
///
/// # Panics
/// If `states` is zero.
pub fn generate_random_partial_dfa(
    states: usize,
    symbols: Symbol,
    edge_probability: f64,
    accepting_probability: f64,
) -> Dfa {
    assert!(states > 0, "an automaton needs at least one state");

    let mut transitions = vec![];
    for from in 0..states {
        for on_input in 0..symbols {
            if fastrand::f64() < edge_probability {
                transitions.push(Transition::new(from, on_input, fastrand::usize(..states)));
            }
        }
    }

    let mut accepting = BitSet::with_capacity(states);
    for state in 0..states {
        if fastrand::f64() < accepting_probability {
            accepting.insert(state);
        }
    }

    Dfa::from_raw_parts(states, 0, transitions, accepting)
}

/// Generates a random word over the symbols `0..symbols`, whose length is drawn
/// uniformly from the range `min_len..=max_len`.
///
/// # Panics
/// If `min_len > max_len`, or if a non-empty word is requested over no symbols.
pub fn generate_random_word(symbols: Symbol, min_len: usize, max_len: usize) -> Vec<Symbol> {
    assert!(min_len <= max_len);
    assert!(symbols > 0 || max_len == 0, "cannot draw symbols from an empty alphabet");

    let length = fastrand::usize(min_len..=max_len);
    (0..length).map(|_| fastrand::u32(..symbols)).collect()
}

/// Generates `number` random words as in [`generate_random_word`]. The words are drawn
/// independently, so there may be duplicates.
pub fn generate_random_words(
    symbols: Symbol,
    min_len: usize,
    max_len: usize,
    number: usize,
) -> Vec<Vec<Symbol>> {
    (0..number)
        .map(|_| generate_random_word(symbols, min_len, max_len))
        .collect()
}
