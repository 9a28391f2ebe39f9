use itertools::Itertools;

use crate::Show;

/// A symbol of the input alphabet. Symbols are positive integers, by convention the alphabet
/// of an automaton with `k` inputs consists of the symbols `1..=k`.
pub type Symbol = u32;

/// Represents a finite alphabet of integer [`Symbol`]s. The symbols are kept sorted and free of
/// duplicates, which fixes the order in which the columns of a transition table are laid out.
///
/// # Example
/// ```
/// use automata_pso::prelude::*;
/// let alphabet = Alphabet::of_size(3);
/// assert_eq!(alphabet.universe().collect::<Vec<_>>(), vec![1, 2, 3]);
/// assert_eq!(alphabet.index_of(2), Some(1));
/// assert!(!alphabet.contains(4));
/// ```
#[derive(Clone, Hash, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub struct Alphabet(Vec<Symbol>);

impl Alphabet {
    /// Creates a new [`Alphabet`] from an iterator over the symbols. Duplicates are removed.
    pub fn new<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        Self(symbols.into_iter().unique().sorted().collect())
    }

    /// Creates the alphabet `{1, ..., size}`.
    pub fn of_size(size: usize) -> Self {
        Self((1..=size as Symbol).collect())
    }

    /// Returns an iterator over all symbols in ascending order.
    pub fn universe(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.iter().copied()
    }

    /// Returns the position of `symbol` in the ordered alphabet, if it is present.
    pub fn index_of(&self, symbol: Symbol) -> Option<usize> {
        self.0.binary_search(&symbol).ok()
    }

    /// Returns true if the given symbol is present in the alphabet.
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.index_of(symbol).is_some()
    }

    /// Returns the number of symbols in the alphabet.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Index<usize> for Alphabet {
    type Output = Symbol;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl FromIterator<Symbol> for Alphabet {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl Show for Alphabet {
    fn show(&self) -> String {
        format!("{{{}}}", self.0.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::Alphabet;

    #[test]
    fn alphabet_is_sorted_and_deduplicated() {
        let alphabet = Alphabet::new([3, 1, 3, 2]);
        assert_eq!(alphabet.size(), 3);
        assert_eq!(alphabet[0], 1);
        assert_eq!(alphabet.index_of(3), Some(2));
        assert_eq!(alphabet.index_of(7), None);
    }

    #[test]
    fn alphabet_of_size_starts_at_one() {
        let alphabet = Alphabet::of_size(2);
        assert!(alphabet.contains(1));
        assert!(alphabet.contains(2));
        assert!(!alphabet.contains(0));
        assert!(Alphabet::of_size(0).is_empty());
    }
}
