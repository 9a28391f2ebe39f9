use std::time::Instant;

use owo_colors::OwoColorize;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, trace};

use super::{Evaluator, Particle, PsoError, PsoParams, Results, SearchListener, Solution};
use crate::{
    math::{self, Statistics},
    prelude::*,
    show::show_duration,
};

/// The reason a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A solution classifies the whole sample correctly.
    Perfect,
    /// The time budget was exceeded.
    TimeBudget,
    /// The maximal number of generations was performed.
    IterationLimit,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Perfect => write!(f, "found a perfect solution"),
            Termination::TimeBudget => write!(f, "time budget exceeded"),
            Termination::IterationLimit => write!(f, "iteration limit reached"),
        }
    }
}

/// Drives a particle swarm optimization that looks for an automaton consistent with a
/// [`WordSample`].
///
/// Particles are grouped into cohorts by their number of states. Each particle is pulled
/// towards its own best position and towards the best position of its cohort, as particles of
/// different sizes live in different spaces. Independently of the cohorts, the swarm keeps
/// the best solution overall, and every improvement of it enters the [`Results`].
///
/// All randomness is drawn from a single generator of type `R`. It is seeded from
/// [`PsoParams::seed`] if one is given, so that seeded searches are reproducible.
///
/// # Example
/// ```
/// use automata_pso::prelude::*;
///
/// let target: Dfa = "2, 2, 2, 1, 2, 1, 2".parse().unwrap();
/// let sample = SampleGenerator::new(&target).exhaustive(4);
/// let params = PsoParams::default().with_max_iterations(10).with_seed(1);
/// let mut swarm = Swarm::new(params);
/// let results = swarm.search(target.alphabet(), &sample).unwrap();
/// assert!(results.best().is_some());
/// ```
pub struct Swarm<L = (), R = StdRng> {
    params: PsoParams,
    listener: L,
    rng: R,
    particles: Vec<Particle>,
    best: Option<Solution>,
    cohort_best: math::Map<usize, Solution>,
    iterations: usize,
    termination: Option<Termination>,
}

impl Swarm<(), StdRng> {
    /// Creates a swarm without listener. The generator is seeded with [`PsoParams::seed`], or
    /// from entropy if no seed is given.
    pub fn new(params: PsoParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            params,
            listener: (),
            rng,
            particles: Vec::new(),
            best: None,
            cohort_best: math::Map::default(),
            iterations: 0,
            termination: None,
        }
    }
}

impl<L, R> Swarm<L, R> {
    /// Replaces the listener that is notified about the progress of the search.
    pub fn with_listener<M: SearchListener>(self, listener: M) -> Swarm<M, R> {
        Swarm {
            params: self.params,
            listener,
            rng: self.rng,
            particles: self.particles,
            best: self.best,
            cohort_best: self.cohort_best,
            iterations: self.iterations,
            termination: self.termination,
        }
    }

    /// Replaces the random number generator.
    pub fn with_rng<S: Rng>(self, rng: S) -> Swarm<L, S> {
        Swarm {
            params: self.params,
            listener: self.listener,
            rng,
            particles: self.particles,
            best: self.best,
            cohort_best: self.cohort_best,
            iterations: self.iterations,
            termination: self.termination,
        }
    }

    pub fn params(&self) -> &PsoParams {
        &self.params
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    /// The particles of the last search.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The best solution of the last search.
    pub fn best(&self) -> Option<&Solution> {
        self.best.as_ref()
    }

    /// The best solution of the cohort with `size` states in the last search.
    pub fn cohort_best(&self, size: usize) -> Option<&Solution> {
        self.cohort_best.get(&size)
    }

    /// Number of generations performed by the last search.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Why the last search stopped, `None` if no search has completed.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }
}

impl<L: SearchListener, R: Rng> Swarm<L, R> {
    /// Searches for an automaton over `alphabet` that classifies `sample` correctly.
    ///
    /// After the particles are initialized and evaluated, the swarm repeatedly updates all
    /// velocities, moves all particles and evaluates them again. Before each generation the
    /// search stops if the best fitness is `0`, if the time budget is exceeded or if the
    /// maximal number of generations has been performed. Every `progress_interval`
    /// generations the listener receives the statistics of the population.
    ///
    /// The returned [`Results`] hold the best solutions in order of their fitness. Errors only
    /// occur if the sample contains symbols outside of `alphabet`.
    pub fn search(
        &mut self,
        alphabet: &Alphabet,
        sample: &WordSample,
    ) -> Result<Results, PsoError> {
        self.listener.search_started();
        let start = Instant::now();
        info!("starting search with {}", self.params);

        let mut results = Results::new(self.params.results_capacity);
        let evaluator = Evaluator::new(sample);
        self.best = None;
        self.cohort_best.clear();
        self.iterations = 0;
        self.termination = None;

        self.init_particles(alphabet);
        self.evaluate_particles(&evaluator, &mut results)?;
        self.log_statistics()?;

        let termination = loop {
            let best = self.best_fitness()?;
            if best == Some(0.0) {
                break Termination::Perfect;
            }
            if start.elapsed() > self.params.time_budget {
                break Termination::TimeBudget;
            }
            if self.iterations >= self.params.max_iterations {
                break Termination::IterationLimit;
            }

            let report = self.params.progress_interval > 0
                && self.iterations % self.params.progress_interval == 0;
            if report {
                if let (Some(statistics), Some(best)) = (self.statistics()?, best) {
                    self.listener.progress(self.iterations, &statistics, best);
                }
            }

            self.update_velocities();
            self.move_particles();
            self.evaluate_particles(&evaluator, &mut results)?;
            if report {
                self.log_statistics()?;
            }
            self.iterations += 1;
        };

        info!(
            "{} after {} generations, took {}",
            termination.to_string().bold(),
            self.iterations,
            show_duration(start.elapsed())
        );
        self.termination = Some(termination);
        self.listener.search_finished(&results, sample);
        Ok(results)
    }

    fn init_particles(&mut self, alphabet: &Alphabet) {
        self.particles.clear();
        for _ in 0..self.params.particles_count {
            let mut solution =
                Solution::random(self.params.max_states, alphabet.clone(), &mut self.rng);
            solution.randomise_continuous(&mut self.rng);
            self.particles.push(Particle::with_limits(
                solution,
                self.params.limits,
                &mut self.rng,
            ));
        }
        debug!(
            "initialized {} particles in {} cohorts",
            self.particles.len(),
            self.particles.iter().map(Particle::size).collect::<math::Set<_>>().len()
        );
    }

    fn update_velocities(&mut self) {
        for particle in &mut self.particles {
            let cohort_best = self.cohort_best.get(&particle.size());
            particle.update_velocity(&self.params, cohort_best, &mut self.rng);
            trace!("velocity updated to {:?}", particle.velocity());
        }
    }

    fn move_particles(&mut self) {
        self.particles.iter_mut().for_each(Particle::perform_movement);
    }

    /// Evaluates every particle in order. Each improvement of the best fitness is recorded
    /// immediately, so a later particle of the same generation has to beat it.
    fn evaluate_particles(
        &mut self,
        evaluator: &Evaluator<'_>,
        results: &mut Results,
    ) -> Result<(), PsoError> {
        let mut best = self.best_fitness()?.unwrap_or(f64::MAX);
        for particle in &mut self.particles {
            let fitness = particle.evaluate(evaluator)?;
            if fitness < best {
                info!("found new best {}", fitness.green());
                best = fitness;
                self.best = Some(particle.solution().clone());
                results.insert(particle.solution().clone())?;
                self.listener.improved(fitness);
            }

            let replace = match self.cohort_best.get(&particle.size()) {
                Some(cohort_best) => fitness < cohort_best.evaluation()?,
                None => true,
            };
            if replace {
                self.cohort_best
                    .insert(particle.size(), particle.solution().clone());
            }
        }
        Ok(())
    }

    fn best_fitness(&self) -> Result<Option<f64>, PsoError> {
        self.best.as_ref().map(Solution::evaluation).transpose()
    }

    fn statistics(&self) -> Result<Option<Statistics>, PsoError> {
        let fitnesses = self
            .particles
            .iter()
            .map(|p| p.solution().evaluation())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Statistics::of(fitnesses))
    }

    fn log_statistics(&self) -> Result<(), PsoError> {
        if let (Some(statistics), Some(best)) = (self.statistics()?, self.best_fitness()?) {
            info!("{statistics}, best so far {best:.5}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Swarm, Termination};
    use crate::automaton::tests::{even_twos_dfa, last_symbol_dfa};
    use crate::math::Statistics;
    use crate::prelude::*;

    #[derive(Default)]
    struct Recorder {
        started: usize,
        progress: Vec<usize>,
        improvements: Vec<f64>,
        finished: Option<usize>,
    }

    impl SearchListener for Recorder {
        fn search_started(&mut self) {
            self.started += 1;
        }

        fn progress(&mut self, iteration: usize, _statistics: &Statistics, _best: f64) {
            self.progress.push(iteration);
        }

        fn improved(&mut self, fitness: f64) {
            self.improvements.push(fitness);
        }

        fn search_finished(&mut self, results: &Results, _sample: &WordSample) {
            self.finished = Some(results.len());
        }
    }

    fn params() -> PsoParams {
        PsoParams::default()
            .with_particles_count(20)
            .with_time_budget(Duration::from_secs(60))
            .with_seed(42)
    }

    #[test_log::test]
    fn zero_iterations_still_evaluate_the_initial_swarm() {
        let dfa = last_symbol_dfa();
        let sample = SampleGenerator::new(&dfa).exhaustive(4);
        let mut swarm = Swarm::new(params().with_max_iterations(0)).with_listener(Recorder::default());
        let results = swarm.search(dfa.alphabet(), &sample).unwrap();

        assert!(!results.is_empty());
        assert_eq!(swarm.iterations(), 0);
        assert!(swarm.particles().iter().all(|p| p.solution().is_evaluated()));
        let best = results.best().unwrap().evaluation().unwrap();
        assert_eq!(swarm.best().unwrap().evaluation(), Ok(best));
        let termination = swarm.termination().unwrap();
        assert!(termination == Termination::IterationLimit || termination == Termination::Perfect);

        let recorder = swarm.listener();
        assert_eq!(recorder.started, 1);
        assert!(recorder.progress.is_empty());
        assert_eq!(recorder.finished, Some(results.len()));
        assert_eq!(recorder.improvements.last(), Some(&best));
        assert!(recorder.improvements.windows(2).all(|w| w[1] < w[0]));
    }

    #[test_log::test]
    fn results_are_sorted_and_cohorts_consistent() {
        let dfa = even_twos_dfa();
        let sample = SampleGenerator::new(&dfa).exhaustive(5);
        let mut swarm = Swarm::new(params().with_max_iterations(120));
        let results = swarm.search(dfa.alphabet(), &sample).unwrap();

        let fitnesses: Vec<_> = results.iter().map(|s| s.evaluation().unwrap()).collect();
        assert!(fitnesses.len() <= 5);
        assert!(fitnesses.windows(2).all(|w| w[0] <= w[1]));
        assert!(fitnesses.iter().all(|f| (0.0..=1.0).contains(f)));

        for particle in swarm.particles() {
            let cohort = swarm.cohort_best(particle.size()).unwrap();
            assert_eq!(cohort.size(), particle.size());
            assert!(cohort.evaluation().unwrap() <= particle.best().evaluation().unwrap());
        }
        let best = swarm.best().unwrap().evaluation().unwrap();
        assert_eq!(fitnesses[0], best);
    }

    #[test_log::test]
    fn progress_is_reported_every_interval() {
        let dfa = last_symbol_dfa();
        let sample = SampleGenerator::new(&dfa).exhaustive(6);
        let mut recorder = Recorder::default();
        let mut swarm = Swarm::new(
            params()
                .with_particles_count(3)
                .with_max_states(6)
                .with_max_iterations(7)
                .with_progress_interval(3),
        )
        .with_listener(&mut recorder);
        swarm.search(dfa.alphabet(), &sample).unwrap();
        let iterations = swarm.iterations();
        let termination = swarm.termination();
        drop(swarm);

        let expected: Vec<_> = (0..iterations).filter(|i| i % 3 == 0).collect();
        assert_eq!(recorder.progress, expected);
        if termination == Some(Termination::IterationLimit) {
            assert_eq!(expected, vec![0, 3, 6]);
        }
    }

    #[test_log::test]
    fn learns_the_last_symbol_language() {
        let dfa = last_symbol_dfa();
        let sample = SampleGenerator::new(&dfa).exhaustive(5);
        let mut swarm = Swarm::new(
            params()
                .with_particles_count(50)
                .with_max_states(3)
                .with_max_iterations(2000),
        );
        let results = swarm.search(dfa.alphabet(), &sample).unwrap();
        let best = results.best().unwrap();
        assert!(best.evaluation().unwrap() < 0.25);
        if swarm.termination() == Some(Termination::Perfect) {
            let learned = best.decode();
            for (word, accepted) in sample.entries() {
                assert_eq!(learned.accepts(word), Ok(accepted));
            }
        }
    }

    #[test_log::test]
    fn exhausted_time_budget_stops_before_the_first_generation() {
        let dfa = even_twos_dfa();
        let sample = SampleGenerator::new(&dfa).exhaustive(5);
        let mut swarm = Swarm::new(params().with_time_budget(Duration::ZERO));
        let results = swarm.search(dfa.alphabet(), &sample).unwrap();

        assert_eq!(swarm.termination(), Some(Termination::TimeBudget));
        assert_eq!(swarm.iterations(), 0);
        assert!(!results.is_empty());
        assert!(swarm.particles().iter().all(|p| p.solution().is_evaluated()));
    }

    #[test_log::test]
    fn perfect_solution_ends_the_search_early() {
        let accept_all = Dfa::from_table(Alphabet::of_size(2), 1, vec![1, 1], 1, [1]).unwrap();
        let sample = SampleGenerator::new(&accept_all).exhaustive(3);
        let mut swarm = Swarm::new(
            params()
                .with_max_states(1)
                .with_max_iterations(1000),
        );
        let results = swarm.search(accept_all.alphabet(), &sample).unwrap();

        assert_eq!(swarm.termination(), Some(Termination::Perfect));
        assert!(swarm.iterations() < 1000);
        let best = results.best().unwrap();
        assert_eq!(best.evaluation(), Ok(0.0));
        assert_eq!(best.decode().accepting_states().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn seeded_searches_are_reproducible() {
        let dfa = even_twos_dfa();
        let sample = SampleGenerator::new(&dfa).exhaustive(4);
        let run = || {
            let mut swarm = Swarm::new(params().with_max_iterations(30));
            let results = swarm.search(dfa.alphabet(), &sample).unwrap();
            results
                .iter()
                .map(|s| (s.size(), s.evaluation().unwrap()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn foreign_symbols_abort_the_search() {
        let sample = WordSample::from_words([vec![1, 3]], Vec::<Word>::new());
        let mut swarm = Swarm::new(params().with_max_iterations(5));
        assert_eq!(
            swarm
                .search(&Alphabet::of_size(2), &sample)
                .map(|r| r.len()),
            Err(PsoError::Automaton(AutomatonError::UnknownSymbol(3)))
        );
    }
}
