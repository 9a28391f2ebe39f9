//! Reading and writing automata in a plain-text description format. An automaton with `n`
//! states over the symbols `1..=k` is described by a single line of comma-separated integers
//! ```text
//! n, k, t(1,1), ..., t(1,k), t(2,1), ..., t(n,k), a_1, ..., a_m
//! ```
//! where `t(q,a)` is the successor of state `q` on symbol `a` and `a_1, ..., a_m` are the
//! accepting states. The initial state is always `1`.

use std::{path::Path, str::FromStr};

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, trace};

use crate::prelude::*;

/// Abstracts the types of errors that can occur when reading an automaton description.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("automaton description is empty")]
    Empty,
    #[error("encountered malformed number `{token}` at position {position}")]
    InvalidNumber { position: usize, token: String },
    #[error("description ends after {found} values, but {expected} are required")]
    Truncated { expected: usize, found: usize },
    #[error("could not read automaton description: {0}")]
    Io(#[from] std::io::Error),
    #[error("description does not define a valid automaton: {0}")]
    Automaton(#[from] AutomatonError),
}

/// Parses an automaton from its textual description. Only the first non-empty line is
/// considered, everything after it is ignored.
///
/// # Example
/// ```
/// use automata_pso::prelude::*;
/// let dfa = parse::parse_dfa("2, 2, 2, 1, 2, 1, 2").unwrap();
/// assert_eq!(dfa.size(), 2);
/// assert_eq!(dfa.accepts([2, 1]), Ok(true));
/// ```
pub fn parse_dfa(input: &str) -> Result<Dfa, ParseError> {
    let line = input
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or(ParseError::Empty)?;
    trace!("parsing automaton description \"{line}\"");

    let values = line
        .split(',')
        .enumerate()
        .map(|(position, token)| {
            token
                .trim()
                .parse::<u32>()
                .map_err(|_| ParseError::InvalidNumber {
                    position,
                    token: token.trim().to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() < 2 {
        return Err(ParseError::Truncated {
            expected: 2,
            found: values.len(),
        });
    }
    let size = values[0] as usize;
    let symbols = values[1] as usize;
    let table_end = 2 + size * symbols;
    if values.len() < table_end {
        return Err(ParseError::Truncated {
            expected: table_end,
            found: values.len(),
        });
    }

    let dfa = Dfa::from_table(
        Alphabet::of_size(symbols),
        size,
        values[2..table_end].to_vec(),
        1,
        values[table_end..].iter().copied(),
    )?;
    debug!(
        "read automaton with {} states over {} symbols",
        dfa.size(),
        symbols
    );
    Ok(dfa)
}

/// Reads the file at `path` and parses its content with [`parse_dfa`].
pub fn load_dfa<P: AsRef<Path>>(path: P) -> Result<Dfa, ParseError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    debug!("loading automaton from {}", path.as_ref().display());
    parse_dfa(&content)
}

/// Produces the textual description of `dfa`, which [`parse_dfa`] turns back into the same
/// automaton as long as the initial state is `1` and the alphabet is `1..=k`.
pub fn to_description(dfa: &Dfa) -> String {
    std::iter::once(dfa.size() as u32)
        .chain(std::iter::once(dfa.alphabet().size() as u32))
        .chain(dfa.table().iter().copied())
        .chain(dfa.accepting_states())
        .join(", ")
}

impl FromStr for Dfa {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dfa(s)
    }
}
