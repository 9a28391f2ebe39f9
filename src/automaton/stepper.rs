use crate::prelude::*;

/// The result of running a [`Stepper`]: the reached state together with its acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outcome {
    /// The state that was reached.
    pub state: StateId,
    /// Whether the reached state is accepting.
    pub accepted: bool,
}

/// Simulates a [`Dfa`] symbol by symbol. The stepper holds a cursor on the current state, which
/// starts out as the initial state of the automaton. Apart from moving the cursor, running a
/// stepper has no side effects.
#[derive(Debug, Clone)]
pub struct Stepper<'a> {
    dfa: &'a Dfa,
    current: StateId,
}

impl<'a> Stepper<'a> {
    /// Creates a stepper for `dfa` that is positioned in the initial state.
    pub fn new(dfa: &'a Dfa) -> Self {
        Self {
            dfa,
            current: dfa.initial(),
        }
    }

    /// Returns the state the cursor currently points to.
    pub fn current(&self) -> StateId {
        self.current
    }

    /// Moves the cursor back to the initial state.
    pub fn reset(&mut self) {
        self.current = self.dfa.initial();
    }

    fn outcome(&self) -> Outcome {
        Outcome {
            state: self.current,
            accepted: self.dfa.is_accepting(self.current),
        }
    }

    /// Applies a single transition and returns the reached state with its acceptance. Fails,
    /// without moving the cursor, if `symbol` is not part of the alphabet.
    pub fn step(&mut self, symbol: Symbol) -> Result<Outcome, AutomatonError> {
        self.current = self.dfa.transition(self.current, symbol)?;
        Ok(self.outcome())
    }

    /// Resets the cursor and then applies every symbol of `word` in order. For the empty word
    /// this yields the initial state with its acceptance.
    pub fn run<W: AsRef<[Symbol]>>(&mut self, word: W) -> Result<Outcome, AutomatonError> {
        self.reset();
        for &symbol in word.as_ref() {
            self.current = self.dfa.transition(self.current, symbol)?;
        }
        Ok(self.outcome())
    }
}
