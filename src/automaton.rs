use bit_set::BitSet;
use itertools::Itertools;
use thiserror::Error;

use crate::prelude::*;

mod builder;
pub use builder::DfaBuilder;

mod stepper;
pub use stepper::{Outcome, Stepper};

/// Identifies a state of an automaton. States of an automaton with `n` states are the
/// integers `1..=n`.
pub type StateId = u32;

/// Errors that arise when an automaton is queried with or built from a state or symbol that
/// it does not know.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AutomatonError {
    /// The referenced state lies outside of `1..=size`.
    #[error("state {state} does not exist, the automaton has states 1..={size}")]
    UnknownState {
        /// The offending state.
        state: StateId,
        /// Number of states of the automaton.
        size: usize,
    },
    /// The referenced symbol is not part of the alphabet.
    #[error("symbol {0} is not part of the input alphabet")]
    UnknownSymbol(Symbol),
    /// The transition function is not total.
    #[error("no transition defined from state {state} on symbol {symbol}")]
    MissingTransition {
        /// Source of the missing transition.
        state: StateId,
        /// Symbol of the missing transition.
        symbol: Symbol,
    },
    /// The transition table has more entries than states times symbols.
    #[error("expected {expected} transitions but found {found}")]
    ExcessTransitions {
        /// Number of states times number of symbols.
        expected: usize,
        /// Number of given transitions.
        found: usize,
    },
    /// An automaton needs at least one state.
    #[error("an automaton must have at least one state")]
    EmptyStateSet,
}

/// A deterministic finite automaton over an integer [`Alphabet`]. It consists of the states
/// `1..=size`, a total transition function, a designated initial state and a set of accepting
/// states. A [`Dfa`] is immutable once constructed, every constructor validates that each pair
/// of state and symbol has exactly one transition and that its target is a state.
///
/// The transition function is stored as a flat table in row-major order, i.e. the row of a
/// state lists its successors in the order of the alphabet.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Dfa {
    alphabet: Alphabet,
    size: usize,
    transitions: Vec<StateId>,
    initial: StateId,
    accepting: BitSet,
}

impl Dfa {
    /// Creates a [`DfaBuilder`] for the given alphabet.
    pub fn builder(alphabet: Alphabet) -> DfaBuilder {
        DfaBuilder::new(alphabet)
    }

    /// Builds a [`Dfa`] from a flat transition table. The `table` has to contain `size * |alphabet|`
    /// entries, where the entry at position `(q - 1) * |alphabet| + i` is the successor of state `q`
    /// on the `i`-th symbol of the alphabet.
    pub fn from_table<I>(
        alphabet: Alphabet,
        size: usize,
        table: Vec<StateId>,
        initial: StateId,
        accepting: I,
    ) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = StateId>,
    {
        if size == 0 {
            return Err(AutomatonError::EmptyStateSet);
        }
        let width = alphabet.size();
        if table.len() < size * width {
            let position = table.len();
            return Err(AutomatonError::MissingTransition {
                state: (position / width) as StateId + 1,
                symbol: alphabet[position % width],
            });
        }
        if table.len() > size * width {
            return Err(AutomatonError::ExcessTransitions {
                expected: size * width,
                found: table.len(),
            });
        }
        let check = |state: StateId| {
            if (1..=size as StateId).contains(&state) {
                Ok(state)
            } else {
                Err(AutomatonError::UnknownState { state, size })
            }
        };
        for &target in &table {
            check(target)?;
        }
        check(initial)?;
        let accepting = accepting
            .into_iter()
            .map(|q| check(q).map(|q| q as usize))
            .collect::<Result<BitSet, _>>()?;

        Ok(Self {
            alphabet,
            size,
            transitions: table,
            initial,
            accepting,
        })
    }

    /// Returns a reference to the input alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns an iterator over all states in ascending order.
    pub fn states(&self) -> impl Iterator<Item = StateId> {
        1..=self.size as StateId
    }

    /// Returns true if `state` is a state of `self`.
    pub fn contains_state(&self, state: StateId) -> bool {
        state >= 1 && state as usize <= self.size
    }

    /// Returns the initial state.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    fn cell(&self, state: StateId, symbol: Symbol) -> Result<usize, AutomatonError> {
        if !self.contains_state(state) {
            return Err(AutomatonError::UnknownState {
                state,
                size: self.size,
            });
        }
        let column = self
            .alphabet
            .index_of(symbol)
            .ok_or(AutomatonError::UnknownSymbol(symbol))?;
        Ok((state as usize - 1) * self.alphabet.size() + column)
    }

    /// Returns the successor of `state` on `symbol`. Fails if either of them is unknown to
    /// the automaton.
    pub fn transition(&self, state: StateId, symbol: Symbol) -> Result<StateId, AutomatonError> {
        self.cell(state, symbol).map(|cell| self.transitions[cell])
    }

    /// Returns true if and only if `state` is accepting.
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(state as usize)
    }

    /// Returns the indices of all states that are accepting, in ascending order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.accepting.iter().map(|q| q as StateId)
    }

    /// Returns a [`Stepper`] positioned in the initial state.
    pub fn stepper(&self) -> Stepper<'_> {
        Stepper::new(self)
    }

    /// Runs `word` from the initial state and returns whether the reached state is accepting.
    pub fn accepts<W: AsRef<[Symbol]>>(&self, word: W) -> Result<bool, AutomatonError> {
        self.stepper().run(word).map(|outcome| outcome.accepted)
    }

    /// Computes the complement of `self` by swapping accepting and non-accepting states.
    pub fn complement(&self) -> Self {
        let accepting = self
            .states()
            .filter(|q| !self.is_accepting(*q))
            .map(|q| q as usize)
            .collect();
        Self {
            accepting,
            ..self.clone()
        }
    }

    /// Returns the flat transition table, see [`Dfa::from_table`] for its layout.
    pub fn table(&self) -> &[StateId] {
        &self.transitions
    }

    /// Renders the transition table with one row per state and one column per symbol.
    /// The initial state is marked with an arrow, accepting states with a `+`.
    pub fn build_transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string())
                .chain(self.alphabet.universe().map(|s| s.to_string()))
                .chain(std::iter::once("Accepting".to_string())),
        );
        for q in self.states() {
            let mut row = vec![format!(
                "{}q{q}",
                if q == self.initial { "→ " } else { "" }
            )];
            let offset = (q as usize - 1) * self.alphabet.size();
            for target in &self.transitions[offset..offset + self.alphabet.size()] {
                row.push(format!("q{target}"));
            }
            row.push(self.is_accepting(q).show());
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl Show for Dfa {
    fn show(&self) -> String {
        format!(
            "DFA [states=1..={}, inputs={}, initial={}, accepting={{{}}}]",
            self.size,
            self.alphabet.show(),
            self.initial,
            self.accepting_states().join(", ")
        )
    }
}

impl std::fmt::Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.show())?;
        write!(f, "{}", self.build_transition_table())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::prelude::*;

    /// Accepts exactly the words whose last symbol is `1`.
    pub fn last_symbol_dfa() -> Dfa {
        Dfa::builder(Alphabet::of_size(2))
            .with_acceptance([false, true])
            .with_transitions([(1, 1, 2), (1, 2, 1), (2, 1, 2), (2, 2, 1)])
            .into_dfa(1)
            .unwrap()
    }

    /// Accepts the words with an even number of `2`s.
    pub fn even_twos_dfa() -> Dfa {
        Dfa::from_table(Alphabet::of_size(2), 2, vec![1, 2, 2, 1], 1, [1]).unwrap()
    }

    #[test]
    fn transitions_are_validated() {
        let dfa = last_symbol_dfa();
        assert_eq!(dfa.transition(1, 1), Ok(2));
        assert_eq!(dfa.transition(2, 2), Ok(1));
        assert_eq!(
            dfa.transition(3, 1),
            Err(AutomatonError::UnknownState { state: 3, size: 2 })
        );
        assert_eq!(
            dfa.transition(0, 1),
            Err(AutomatonError::UnknownState { state: 0, size: 2 })
        );
        assert_eq!(dfa.transition(1, 3), Err(AutomatonError::UnknownSymbol(3)));
    }

    #[test]
    fn from_table_rejects_malformed_tables() {
        let alphabet = Alphabet::of_size(2);
        assert_eq!(
            Dfa::from_table(alphabet.clone(), 2, vec![1, 2, 2], 1, []),
            Err(AutomatonError::MissingTransition {
                state: 2,
                symbol: 2
            })
        );
        assert_eq!(
            Dfa::from_table(alphabet.clone(), 2, vec![1, 2, 3, 1], 1, []),
            Err(AutomatonError::UnknownState { state: 3, size: 2 })
        );
        assert_eq!(
            Dfa::from_table(alphabet.clone(), 2, vec![1, 2, 2, 1], 1, [5]),
            Err(AutomatonError::UnknownState { state: 5, size: 2 })
        );
        assert_eq!(
            Dfa::from_table(alphabet, 0, vec![], 1, []),
            Err(AutomatonError::EmptyStateSet)
        );
    }

    #[test]
    fn acceptance_and_complement() {
        let dfa = even_twos_dfa();
        assert!(dfa.is_accepting(1));
        assert!(!dfa.is_accepting(2));
        assert!(!dfa.is_accepting(9));
        assert_eq!(dfa.accepts([2, 1, 2]), Ok(true));
        assert_eq!(dfa.accepts([2, 1]), Ok(false));

        let complement = dfa.complement();
        assert_eq!(complement.accepting_states().collect::<Vec<_>>(), vec![2]);
        assert_eq!(complement.accepts([2, 1]), Ok(true));
        assert_eq!(complement.table(), dfa.table());
    }

    #[test]
    fn rendering() {
        let dfa = last_symbol_dfa();
        let table = dfa.build_transition_table();
        assert!(table.contains("→ q1"));
        assert_eq!(
            dfa.show(),
            "DFA [states=1..=2, inputs={1, 2}, initial=1, accepting={2}]"
        );
    }
}
