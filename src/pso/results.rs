use itertools::Itertools;
use tracing::trace;

use super::{PsoError, Solution};
use crate::prelude::*;

/// Default number of solutions that [`Results`] keeps.
pub const RESULTS_CAPACITY: usize = 5;

/// The best distinct solutions found during a search, ordered from best to worst.
///
/// At any time the kept solutions are sorted by non-decreasing fitness. A solution is only
/// ranked above a kept one if its fitness is strictly smaller, so among solutions of equal
/// fitness the one found first stays in front.
#[derive(Debug, Clone)]
pub struct Results {
    capacity: usize,
    solutions: Vec<Solution>,
}

impl Default for Results {
    fn default() -> Self {
        Self::new(RESULTS_CAPACITY)
    }
}

impl Results {
    /// Creates an empty collection that keeps up to `capacity` solutions.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            solutions: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Ranks an evaluated `solution` among the kept ones. It is placed in front of the first
    /// kept solution with a strictly larger fitness, or at the end if there is room. Lower
    /// ranked solutions shift back, and the last one is dropped if the capacity is exceeded.
    /// Returns the position the solution was placed at, or `None` if it did not make it.
    pub fn insert(&mut self, solution: Solution) -> Result<Option<usize>, PsoError> {
        let fitness = solution.evaluation()?;
        let mut position = self.solutions.len();
        for (i, kept) in self.solutions.iter().enumerate() {
            if fitness < kept.evaluation()? {
                position = i;
                break;
            }
        }
        if position >= self.capacity {
            trace!("solution with fitness {fitness} did not enter the results");
            return Ok(None);
        }
        self.solutions.insert(position, solution);
        self.solutions.truncate(self.capacity);
        trace!("solution with fitness {fitness} entered the results at place {position}");
        Ok(Some(position))
    }

    /// The best solution found, if any.
    pub fn best(&self) -> Option<&Solution> {
        self.solutions.first()
    }

    /// Iterates over the kept solutions from best to worst.
    pub fn iter(&self) -> impl Iterator<Item = &Solution> + '_ {
        self.solutions.iter()
    }

    /// Decodes every kept solution, from best to worst.
    pub fn decoded(&self) -> Vec<Dfa> {
        self.solutions.iter().map(Solution::decode).collect()
    }

    /// Renders an overview with one row per kept solution.
    pub fn build_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(["Rank", "Fitness", "States", "Accepting"]);
        for (rank, solution) in self.solutions.iter().enumerate() {
            let fitness = solution
                .evaluation()
                .map(|f| f.show())
                .unwrap_or_else(|_| "?".to_string());
            builder.push_record([
                if rank == 0 {
                    "best".to_string()
                } else {
                    rank.to_string()
                },
                fitness,
                solution.size().to_string(),
                format!("{{{}}}", solution.accepting_states().join(", ")),
            ]);
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl<'a> IntoIterator for &'a Results {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}

impl std::fmt::Display for Results {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.build_table())
    }
}

#[cfg(test)]
mod tests {
    use super::Results;
    use crate::prelude::*;

    fn evaluated(size: usize, fitness: f64) -> Solution {
        let mut solution = Solution::with_size(size, Alphabet::of_size(1));
        solution.set_evaluation(fitness);
        solution
    }

    fn fitnesses(results: &Results) -> Vec<f64> {
        results.iter().map(|s| s.evaluation().unwrap()).collect()
    }

    #[test]
    fn keeps_the_best_in_order() {
        let mut results = Results::default();
        for fitness in [0.5, 0.4, 0.6, 0.1, 0.3, 0.2, 0.9] {
            results.insert(evaluated(1, fitness)).unwrap();
            assert!(fitnesses(&results).windows(2).all(|w| w[0] <= w[1]));
        }
        assert_eq!(results.len(), 5);
        assert_eq!(fitnesses(&results), vec![0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(results.best().unwrap().evaluation(), Ok(0.1));
    }

    #[test]
    fn ties_keep_the_earlier_solution_first() {
        let mut results = Results::new(3);
        assert_eq!(results.insert(evaluated(1, 0.5)), Ok(Some(0)));
        assert_eq!(results.insert(evaluated(2, 0.5)), Ok(Some(1)));
        assert_eq!(results.insert(evaluated(3, 0.5)), Ok(Some(2)));
        assert_eq!(results.insert(evaluated(4, 0.5)), Ok(None));
        assert_eq!(results.insert(evaluated(5, 0.2)), Ok(Some(0)));
        let sizes: Vec<_> = results.iter().map(Solution::size).collect();
        assert_eq!(sizes, vec![5, 1, 2]);
    }

    #[test]
    fn unevaluated_solutions_are_rejected() {
        let mut results = Results::default();
        let solution = Solution::with_size(1, Alphabet::of_size(1));
        assert_eq!(results.insert(solution), Err(PsoError::Unevaluated));
        assert!(results.is_empty());
        assert!(results.best().is_none());
    }

    #[test]
    fn table_lists_every_solution() {
        let mut results = Results::default();
        results.insert(evaluated(2, 0.25)).unwrap();
        results.insert(evaluated(1, 0.125)).unwrap();
        let table = results.to_string();
        assert!(table.contains("best"));
        assert!(table.contains("0.12500"));
        assert!(table.contains("0.25000"));
        assert_eq!(results.decoded().len(), 2);
    }
}
