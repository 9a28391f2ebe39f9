use super::{PsoError, Solution};
use crate::prelude::*;

/// Measures how well candidate automata classify a fixed [`WordSample`].
///
/// The fitness of an automaton is the fraction of words in the sample that it classifies
/// wrongly: an accepted word it rejects or a rejected word it accepts. Fitness is minimized,
/// `0` means that the whole sample is classified correctly. An empty sample yields `0`.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    sample: &'a WordSample,
}

impl<'a> Evaluator<'a> {
    pub fn new(sample: &'a WordSample) -> Self {
        Self { sample }
    }

    pub fn sample(&self) -> &'a WordSample {
        self.sample
    }

    /// Decodes `solution`, computes its fitness, records it in the solution and returns it.
    pub fn evaluate(&self, solution: &mut Solution) -> Result<f64, PsoError> {
        let fitness = self.fitness(&solution.decode())?;
        solution.set_evaluation(fitness);
        Ok(fitness)
    }

    /// Like [`Evaluator::evaluate`], but returns the misclassified words instead of the
    /// fitness, accepted words first.
    pub fn evaluate_verbose(&self, solution: &mut Solution) -> Result<Vec<Word>, PsoError> {
        let misclassified = self.misclassified(&solution.decode())?;
        solution.set_evaluation(self.ratio(misclassified.len()));
        Ok(misclassified)
    }

    /// Computes the fitness of `dfa` on the sample.
    pub fn fitness(&self, dfa: &Dfa) -> Result<f64, AutomatonError> {
        let mut stepper = dfa.stepper();
        let mut errors = 0;
        for (word, accepted) in self.sample.entries() {
            if stepper.run(word)?.accepted != accepted {
                errors += 1;
            }
        }
        Ok(self.ratio(errors))
    }

    /// Collects the words of the sample that `dfa` classifies wrongly.
    pub fn misclassified(&self, dfa: &Dfa) -> Result<Vec<Word>, AutomatonError> {
        let mut stepper = dfa.stepper();
        let mut misclassified = Vec::new();
        for (word, accepted) in self.sample.entries() {
            if stepper.run(word)?.accepted != accepted {
                misclassified.push(word.clone());
            }
        }
        Ok(misclassified)
    }

    fn ratio(&self, errors: usize) -> f64 {
        if self.sample.is_empty() {
            0.0
        } else {
            errors as f64 / self.sample.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Evaluator;
    use crate::automaton::tests::{even_twos_dfa, last_symbol_dfa};
    use crate::prelude::*;

    #[test]
    fn exact_automaton_has_zero_fitness() {
        let dfa = last_symbol_dfa();
        let sample = SampleGenerator::new(&dfa).exhaustive(3);
        let evaluator = Evaluator::new(&sample);
        let mut solution = Solution::encode(&dfa);
        assert_eq!(evaluator.evaluate(&mut solution), Ok(0.0));
        assert_eq!(solution.evaluation(), Ok(0.0));
        assert!(evaluator.evaluate_verbose(&mut solution).unwrap().is_empty());
    }

    #[test]
    fn complement_has_fitness_one() {
        let dfa = last_symbol_dfa();
        let sample = SampleGenerator::new(&dfa).exhaustive(3);
        let evaluator = Evaluator::new(&sample);
        let mut solution = Solution::encode(&dfa.complement());
        assert_eq!(evaluator.evaluate(&mut solution), Ok(1.0));
        assert_eq!(evaluator.evaluate_verbose(&mut solution).unwrap().len(), 14);
    }

    #[test]
    fn fraction_of_misclassified_words() {
        let sample = WordSample::from_words([vec![1], vec![2, 2]], [vec![2], vec![1, 2]]);
        let evaluator = Evaluator::new(&sample);
        // accepts every word that ends with symbol 1
        assert_eq!(evaluator.fitness(&last_symbol_dfa()), Ok(0.25));
        let words = evaluator.misclassified(&last_symbol_dfa()).unwrap();
        assert_eq!(words, vec![vec![2, 2]]);
        // accepts every word with an even number of 2s
        assert_eq!(evaluator.fitness(&even_twos_dfa()), Ok(0.0));
        assert_eq!(evaluator.fitness(&even_twos_dfa().complement()), Ok(1.0));
    }

    #[test]
    fn empty_sample_has_zero_fitness() {
        let sample = WordSample::new();
        let evaluator = Evaluator::new(&sample);
        let mut solution = Solution::with_size(3, Alphabet::of_size(2));
        assert_eq!(evaluator.evaluate(&mut solution), Ok(0.0));
    }

    #[test]
    fn foreign_symbols_are_reported() {
        let sample = WordSample::from_words([vec![3]], Vec::<Word>::new());
        let evaluator = Evaluator::new(&sample);
        let mut solution = Solution::with_size(1, Alphabet::of_size(2));
        assert_eq!(
            evaluator.evaluate(&mut solution),
            Err(PsoError::Automaton(AutomatonError::UnknownSymbol(3)))
        );
    }
}
