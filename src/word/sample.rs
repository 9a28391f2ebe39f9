use itertools::Itertools;
use tracing::warn;

use crate::prelude::*;

/// A labeled collection of finite words, split into the words that are accepted and the ones
/// that are rejected. Both partitions have set semantics and no word may be in both of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordSample {
    accepted: math::Set<Word>,
    rejected: math::Set<Word>,
}

impl WordSample {
    /// Creates a new empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sample from the given iterators of accepted and rejected words. Duplicates and
    /// conflicting words are dropped as described in [`WordSample::insert`].
    pub fn from_words<I, J, W, V>(accepted: I, rejected: J) -> Self
    where
        I: IntoIterator<Item = W>,
        J: IntoIterator<Item = V>,
        W: Into<Word>,
        V: Into<Word>,
    {
        let mut sample = Self::new();
        for word in accepted {
            sample.insert_accepted(word.into());
        }
        for word in rejected {
            sample.insert_rejected(word.into());
        }
        sample
    }

    /// Inserts `word` with the given classification. Returns `true` if the word was added.
    ///
    /// A word that is already present in the same partition, or that is present in the other
    /// partition, is not added. Such a violation is not an error, it is reported as a warning
    /// and the sample stays unchanged.
    pub fn insert(&mut self, word: Word, accepted: bool) -> bool {
        let (target, other) = if accepted {
            (&mut self.accepted, &self.rejected)
        } else {
            (&mut self.rejected, &self.accepted)
        };
        if target.contains(&word) {
            warn!(
                "duplicate word {} dropped, it is already {}",
                word.show(),
                classification_name(accepted)
            );
            return false;
        }
        if other.contains(&word) {
            warn!(
                "word {} dropped, it is already {} and cannot also be {}",
                word.show(),
                classification_name(!accepted),
                classification_name(accepted)
            );
            return false;
        }
        target.insert(word)
    }

    /// Adds a word to the accepted partition, see [`WordSample::insert`].
    pub fn insert_accepted(&mut self, word: Word) -> bool {
        self.insert(word, true)
    }

    /// Adds a word to the rejected partition, see [`WordSample::insert`].
    pub fn insert_rejected(&mut self, word: Word) -> bool {
        self.insert(word, false)
    }

    /// Gives an iterator over all accepted words.
    pub fn accepted(&self) -> impl Iterator<Item = &'_ Word> + '_ {
        self.accepted.iter()
    }

    /// Gives an iterator over all rejected words.
    pub fn rejected(&self) -> impl Iterator<Item = &'_ Word> + '_ {
        self.rejected.iter()
    }

    /// Returns an iterator over all pairs (w, c) of words w with their classification c.
    pub fn entries(&self) -> impl Iterator<Item = (&'_ Word, bool)> + '_ {
        self.accepted
            .iter()
            .map(|w| (w, true))
            .chain(self.rejected.iter().map(|w| (w, false)))
    }

    /// Returns the classification of `word`, or `None` if it is not part of the sample.
    pub fn classify(&self, word: &[Symbol]) -> Option<bool> {
        if self.accepted.contains(word) {
            Some(true)
        } else if self.rejected.contains(word) {
            Some(false)
        } else {
            None
        }
    }

    /// Checks whether a word is contained in the sample.
    pub fn contains(&self, word: &[Symbol]) -> bool {
        self.classify(word).is_some()
    }

    pub fn count_accepted(&self) -> usize {
        self.accepted.len()
    }

    pub fn count_rejected(&self) -> usize {
        self.rejected.len()
    }

    /// The combined number of accepted and rejected words.
    pub fn len(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum length of any word in the sample. Gives back `0` if no word exists in the sample.
    pub fn max_word_len(&self) -> usize {
        self.entries().map(|(w, _)| w.len()).max().unwrap_or(0)
    }

    /// Lists both partitions, words are sorted by length and then lexicographically.
    pub fn show_words(&self) -> String {
        let listing = |words: &math::Set<Word>| {
            words
                .iter()
                .sorted_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
                .map(|w| w.show())
                .join(", ")
        };
        format!(
            "{}\naccepted:\n{}\nrejected:\n{}",
            self.show(),
            listing(&self.accepted),
            listing(&self.rejected)
        )
    }
}

fn classification_name(accepted: bool) -> &'static str {
    if accepted {
        "accepted"
    } else {
        "rejected"
    }
}

impl Show for WordSample {
    fn show(&self) -> String {
        format!(
            "WordSample ({} words, {} accepted, {} rejected)",
            self.len(),
            self.count_accepted(),
            self.count_rejected()
        )
    }
}

impl std::fmt::Display for WordSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}
