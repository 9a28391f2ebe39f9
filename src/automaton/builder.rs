use crate::prelude::*;

/// Helper struct for building a [`Dfa`] state by state and transition by transition.
/// The states are introduced through their acceptance, the `i`-th entry of
/// [`DfaBuilder::with_acceptance`] determines whether state `i + 1` is accepting.
///
/// # Example
/// ```
/// use automata_pso::prelude::*;
/// let dfa = Dfa::builder(Alphabet::of_size(2))
///     .with_acceptance([false, true])
///     .with_transitions([(1, 1, 2), (1, 2, 1), (2, 1, 2), (2, 2, 1)])
///     .into_dfa(1)
///     .unwrap();
/// assert_eq!(dfa.accepts([2, 1]), Ok(true));
/// assert_eq!(dfa.accepts([1, 2]), Ok(false));
/// ```
#[derive(Clone, Debug)]
pub struct DfaBuilder {
    alphabet: Alphabet,
    acceptance: Vec<bool>,
    transitions: Vec<(StateId, Symbol, StateId)>,
}

impl DfaBuilder {
    /// Creates a builder without states or transitions.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            acceptance: vec![],
            transitions: vec![],
        }
    }

    /// Appends states whose acceptance is given by the iterator.
    pub fn with_acceptance<I: IntoIterator<Item = bool>>(mut self, acceptance: I) -> Self {
        self.acceptance.extend(acceptance);
        self
    }

    /// Adds transitions given as triples `(source, symbol, target)`. A later transition for the
    /// same pair of source and symbol replaces an earlier one.
    pub fn with_transitions<I>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (StateId, Symbol, StateId)>,
    {
        self.transitions.extend(transitions);
        self
    }

    /// Consumes the builder and produces a [`Dfa`] with the given `initial` state. Fails if some
    /// transition mentions an unknown state or symbol, or if the transition function is not total.
    pub fn into_dfa(self, initial: StateId) -> Result<Dfa, AutomatonError> {
        let size = self.acceptance.len();
        if size == 0 {
            return Err(AutomatonError::EmptyStateSet);
        }
        let width = self.alphabet.size();
        let mut table: Vec<Option<StateId>> = vec![None; size * width];
        for (source, symbol, target) in self.transitions {
            if source == 0 || source as usize > size {
                return Err(AutomatonError::UnknownState {
                    state: source,
                    size,
                });
            }
            let column = self
                .alphabet
                .index_of(symbol)
                .ok_or(AutomatonError::UnknownSymbol(symbol))?;
            table[(source as usize - 1) * width + column] = Some(target);
        }
        let table = table
            .into_iter()
            .enumerate()
            .map(|(position, target)| {
                target.ok_or(AutomatonError::MissingTransition {
                    state: (position / width) as StateId + 1,
                    symbol: self.alphabet[position % width],
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let accepting = self
            .acceptance
            .iter()
            .enumerate()
            .filter(|(_, accepting)| **accepting)
            .map(|(i, _)| i as StateId + 1)
            .collect::<Vec<_>>();

        Dfa::from_table(self.alphabet, size, table, initial, accepting)
    }
}
