//! The format consists of whitespace separated numbers. It starts with a header
//! `states transitions initial accepting`, which is followed by one `from symbol to` line
//! per transition and then one line per accepting state.
//!
//! ```text
//! 3 3 0 1
//! 0 0 1
//! 1 0 2
//! 2 1 0
//! 2
//! ```
use std::{
    io::{Read, Write},
    str::FromStr,
};

use thiserror::Error;
use tracing::trace;

use crate::prelude::*;

/// Errors that can occur while reading an automaton.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Reading from the underlying source failed.
    #[error("could not read automaton: {0}")]
    Io(#[from] std::io::Error),
    /// The input ended before the automaton was complete.
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),
    /// A token is not a valid number.
    #[error("line {line}: expected {expected}, found {token:?}")]
    InvalidNumber {
        /// The line on which the token occurs, starting at 1.
        line: usize,
        /// The offending token.
        token: String,
        /// What the token should have been.
        expected: &'static str,
    },
    /// There is input left after the automaton.
    #[error("line {line}: unexpected trailing input {token:?}")]
    TrailingInput {
        /// The line on which the token occurs, starting at 1.
        line: usize,
        /// The first token after the automaton.
        token: String,
    },
    /// The numbers are well-formed, but do not describe a valid automaton.
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
}

struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            inner: Box::new(
                input
                    .lines()
                    .enumerate()
                    .flat_map(|(i, line)| line.split_whitespace().map(move |token| (i + 1, token))),
            ),
        }
    }

    fn next_number<T: FromStr>(&mut self, expected: &'static str) -> Result<T, ParseError> {
        let (line, token) = self
            .inner
            .next()
            .ok_or(ParseError::UnexpectedEnd(expected))?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            line,
            token: token.to_string(),
            expected,
        })
    }

    fn finish(mut self) -> Result<(), ParseError> {
        match self.inner.next() {
            None => Ok(()),
            Some((line, token)) => Err(ParseError::TrailingInput {
                line,
                token: token.to_string(),
            }),
        }
    }
}

/// The largest number of states that [`read_dfa`] accepts. Minimizing allocates a few
/// words per state, so headers beyond this are rejected before anything is built.
pub const MAX_STATE_COUNT: usize = 1 << 24;

fn parse_dfa(input: &str) -> Result<Dfa, ParseError> {
    let mut tokens = Tokens::new(input);

    let state_count: usize = tokens.next_number("the number of states")?;
    let transition_count: usize = tokens.next_number("the number of transitions")?;
    let initial: StateId = tokens.next_number("the initial state")?;
    let accepting_count: usize = tokens.next_number("the number of accepting states")?;
    trace!("reading automaton with {state_count} states and {transition_count} transitions");
    if state_count > MAX_STATE_COUNT {
        return Err(AutomatonError::InvalidArgument(format!(
            "{state_count} states exceed the supported maximum of {MAX_STATE_COUNT}"
        ))
        .into());
    }

    let mut dfa = Dfa::new(state_count, initial)?;
    for _ in 0..transition_count {
        let from = tokens.next_number("the source state of a transition")?;
        let on_input = tokens.next_number("the symbol of a transition")?;
        let to = tokens.next_number("the target state of a transition")?;
        dfa.add_transition(from, on_input, to)?;
    }
    for _ in 0..accepting_count {
        dfa.add_accepting(tokens.next_number("an accepting state")?)?;
    }

    tokens.finish()?;
    Ok(dfa)
}

/// Reads an automaton in the text format from `reader`. Headers that declare more than
/// [`MAX_STATE_COUNT`] states are rejected.
pub fn read_dfa<R: Read>(mut reader: R) -> Result<Dfa, ParseError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_dfa(&input)
}

/// Writes `dfa` in the text format to `writer`. Accepting states are written in
/// ascending order.
pub fn write_dfa<W: Write>(dfa: &Dfa, mut writer: W) -> std::io::Result<()> {
    writer.write_all(dfa.to_text().as_bytes())
}

impl Dfa {
    /// Writes the text representation of `self` into `w`.
    pub fn write_text<W: std::fmt::Write>(&self, w: &mut W) -> std::fmt::Result {
        writeln!(
            w,
            "{} {} {} {}",
            self.state_count(),
            self.transitions().len(),
            self.initial(),
            self.accepting_states().count()
        )?;
        for t in self.transitions() {
            writeln!(w, "{} {} {}", t.from, t.on_input, t.to)?;
        }
        for state in self.accepting_states() {
            writeln!(w, "{state}")?;
        }
        Ok(())
    }

    /// Returns the text representation of `self`.
    pub fn to_text(&self) -> String {
        let mut w = String::new();
        self.write_text(&mut w)
            .expect("writing to a string does not fail");
        w
    }
}

impl FromStr for Dfa {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dfa(s)
    }
}

#[cfg(test)]
mod tests {
    use super::MAX_STATE_COUNT;
    use crate::prelude::*;

    const MERGEABLE: &str = "4 8 0 1
0 0 1
0 1 2
1 0 3
1 1 3
2 0 3
2 1 3
3 0 3
3 1 3
3
";

    #[test]
    fn read_and_minimize() {
        let dfa = read_dfa(MERGEABLE.as_bytes()).unwrap();
        assert_eq!(dfa.state_count(), 4);
        assert_eq!(dfa.transitions().len(), 8);
        assert_eq!(dfa.accepting_states().collect::<Vec<_>>(), vec![3]);

        let minimized = dfa.minimize();
        let text = minimized.to_text();
        assert!(text.starts_with("3 6 "));
        let reread: Dfa = text.parse().unwrap();
        assert_eq!(reread.transitions(), minimized.transitions());
        assert!(reread.is_isomorphic_to(&minimized));
    }

    #[test]
    fn write_text() {
        let dfa = Dfa::builder()
            .with_transitions([(0, 7, 1)])
            .with_accepting([1, 0])
            .into_dfa(0)
            .unwrap();
        let mut out = vec![];
        write_dfa(&dfa, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2 1 0 2\n0 7 1\n0\n1\n");
    }

    #[test]
    fn blank_lines_and_spacing_are_ignored() {
        let dfa: Dfa = "\n2  1 1 1\n\n 1 0   0\n0\n".parse().unwrap();
        assert_eq!(dfa.initial(), 1);
        assert_eq!(dfa.transitions(), &[Transition::new(1, 0, 0)]);
    }

    #[test]
    fn large_but_sparse_automaton() {
        let last = MAX_STATE_COUNT - 1;
        let dfa: Dfa = format!("{MAX_STATE_COUNT} 1 0 1\n0 0 {last}\n{last}\n")
            .parse()
            .unwrap();
        assert_eq!(dfa.state_count(), MAX_STATE_COUNT);
        assert_eq!(dfa.successor(0, 0), Some(last));
        assert!(dfa.is_accepting(last));
        assert!(matches!(
            format!("{} 0 0 0", MAX_STATE_COUNT + 1).parse::<Dfa>(),
            Err(ParseError::Automaton(AutomatonError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            "2 1 0".parse::<Dfa>(),
            Err(ParseError::UnexpectedEnd("the number of accepting states"))
        ));
        assert!(matches!(
            "2 1 0 0\n0 x 1".parse::<Dfa>(),
            Err(ParseError::InvalidNumber { line: 2, ref token, .. }) if token == "x"
        ));
        assert!(matches!(
            "2 1 0 0\n0 -1 1".parse::<Dfa>(),
            Err(ParseError::InvalidNumber { line: 2, .. })
        ));
        assert!(matches!(
            "2 0 0 1\n1\n5".parse::<Dfa>(),
            Err(ParseError::TrailingInput { line: 3, .. })
        ));
        assert!(matches!(
            "2 1 0 0\n0 0 2".parse::<Dfa>(),
            Err(ParseError::Automaton(AutomatonError::InvalidState {
                state: 2,
                role: StateRole::Target,
                ..
            }))
        ));
        assert!(matches!(
            "4000000000000000000 0 0 0".parse::<Dfa>(),
            Err(ParseError::Automaton(AutomatonError::InvalidArgument(_)))
        ));
        assert!(matches!(
            "0 0 0 0".parse::<Dfa>(),
            Err(ParseError::Automaton(AutomatonError::InvalidArgument(_)))
        ));
    }
}
