use rand::Rng;
use tracing::{debug, trace};

use crate::{prelude::*, random::generate_random_word};

/// Builds labeled [`WordSample`]s by classifying words against a reference [`Dfa`].
#[derive(Debug, Clone)]
pub struct SampleGenerator<'a> {
    reference: &'a Dfa,
}

impl<'a> SampleGenerator<'a> {
    /// Creates a generator that classifies words with the given reference automaton.
    pub fn new(reference: &'a Dfa) -> Self {
        Self { reference }
    }

    /// Returns the reference automaton.
    pub fn reference(&self) -> &'a Dfa {
        self.reference
    }

    /// Generates the sample of all non-empty words of length at most `max_len`, see
    /// [`SampleGenerator::exhaustive_capped`].
    pub fn exhaustive(&self, max_len: usize) -> WordSample {
        self.exhaustive_capped(max_len, None)
    }

    /// Enumerates all non-empty words up to length `max_len` breadth first and classifies each of
    /// them with the reference automaton. The words of length `n + 1` are obtained by extending
    /// each word of length `n` with every symbol of the alphabet, in alphabet order.
    ///
    /// If a `cap` is given, generation stops as soon as the sample holds `cap` words. Without a
    /// cap, the sample contains exactly `k + k^2 + ... + k^max_len` words for an alphabet of
    /// size `k`.
    pub fn exhaustive_capped(&self, max_len: usize, cap: Option<usize>) -> WordSample {
        let mut sample = WordSample::new();
        let alphabet = self.reference.alphabet();
        let mut frontier: Vec<Word> = vec![vec![]];

        'layers: for length in 1..=max_len {
            let mut next = Vec::with_capacity(frontier.len() * alphabet.size());
            for prefix in &frontier {
                for symbol in alphabet.universe() {
                    if cap.is_some_and(|cap| sample.len() >= cap) {
                        debug!("sample reached its cap of {} words", sample.len());
                        break 'layers;
                    }
                    let mut word = prefix.clone();
                    word.push(symbol);
                    let accepted = self.classify(&word);
                    sample.insert(word.clone(), accepted);
                    next.push(word);
                }
            }
            trace!("generated {} words of length {length}", next.len());
            frontier = next;
            if cap.is_some_and(|cap| sample.len() >= cap) {
                break;
            }
        }
        sample
    }

    /// Draws `count` distinct words with lengths uniformly chosen from `min_len..=max_len` and
    /// classifies them with the reference automaton. Stops early if fewer than `count` distinct
    /// words exist in that range.
    pub fn random<R: Rng + ?Sized>(
        &self,
        count: usize,
        min_len: usize,
        max_len: usize,
        rng: &mut R,
    ) -> WordSample {
        assert!(min_len <= max_len);
        let alphabet = self.reference.alphabet();
        let mut sample = WordSample::new();
        if alphabet.is_empty() {
            return sample;
        }
        let available = (min_len..=max_len)
            .map(|len| (alphabet.size() as f64).powi(len as i32))
            .sum::<f64>();
        let target = count.min(available as usize);

        while sample.len() < target {
            let word = generate_random_word(alphabet, min_len, max_len, rng);
            if sample.contains(&word) {
                continue;
            }
            let accepted = self.classify(&word);
            sample.insert(word, accepted);
        }
        sample
    }

    fn classify(&self, word: &[Symbol]) -> bool {
        // words are built from the reference alphabet, so every run succeeds
        self.reference.accepts(word).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::automaton::tests::{even_twos_dfa, last_symbol_dfa};
    use crate::prelude::*;

    #[test]
    fn last_symbol_sample() {
        let dfa = last_symbol_dfa();
        let sample = SampleGenerator::new(&dfa).exhaustive(3);
        assert_eq!(sample.len(), 2 + 4 + 8);
        assert_eq!(sample.classify(&[1]), Some(true));
        assert_eq!(sample.classify(&[2]), Some(false));
        assert_eq!(sample.classify(&[1, 2]), Some(false));
        assert_eq!(sample.classify(&[2, 1]), Some(true));
        assert_eq!(sample.classify(&[1, 1, 2]), Some(false));
        assert_eq!(sample.classify(&[1, 1, 2, 1]), None);
        assert_eq!(sample.classify(&[]), None);
    }

    #[test]
    fn exhaustive_sample_sizes() {
        let dfa = even_twos_dfa();
        for max_len in 0..=6 {
            let sample = SampleGenerator::new(&dfa).exhaustive(max_len);
            let expected: usize = (1..=max_len).map(|l| 2usize.pow(l as u32)).sum();
            assert_eq!(sample.len(), expected);
            for (word, accepted) in sample.entries() {
                assert_eq!(dfa.accepts(word), Ok(accepted));
            }
        }
    }

    #[test]
    fn three_symbol_alphabet() {
        let dfa = Dfa::from_table(Alphabet::of_size(3), 1, vec![1, 1, 1], 1, [1]).unwrap();
        let sample = SampleGenerator::new(&dfa).exhaustive(3);
        assert_eq!(sample.len(), 3 + 9 + 27);
        assert_eq!(sample.count_rejected(), 0);
    }

    #[test]
    fn capped_sample() {
        let dfa = last_symbol_dfa();
        let generator = SampleGenerator::new(&dfa);
        assert_eq!(generator.exhaustive_capped(10, Some(5)).len(), 5);
        assert_eq!(generator.exhaustive_capped(10, Some(1)).len(), 1);
        assert_eq!(generator.exhaustive_capped(2, Some(100)).len(), 6);
        let capped = generator.exhaustive_capped(10, Some(6));
        assert_eq!(capped, generator.exhaustive(2));
    }

    #[test]
    fn random_sample() {
        let dfa = even_twos_dfa();
        let mut rng = StdRng::seed_from_u64(7);
        let sample = SampleGenerator::new(&dfa).random(20, 2, 6, &mut rng);
        assert_eq!(sample.len(), 20);
        for (word, accepted) in sample.entries() {
            assert!((2..=6).contains(&word.len()));
            assert_eq!(dfa.accepts(word), Ok(accepted));
        }
        // only 2 + 4 words of length 1 and 2 exist
        let small = SampleGenerator::new(&dfa).random(50, 1, 2, &mut rng);
        assert_eq!(small.len(), 6);
    }
}
