use itertools::Itertools;
use tracing::info;

use super::Results;
use crate::{math::Statistics, prelude::*};

/// Observer of a [`Swarm`](super::Swarm) search. Every method has an empty default
/// implementation, so implementors only override the events they care about.
pub trait SearchListener {
    /// Called once before the swarm is initialized.
    fn search_started(&mut self) {}

    /// Called at the beginning of every `progress_interval`-th generation with the fitness
    /// statistics of the population and the best fitness found so far.
    fn progress(&mut self, _iteration: usize, _statistics: &Statistics, _best: f64) {}

    /// Called whenever a solution improves on the best fitness found so far.
    fn improved(&mut self, _fitness: f64) {}

    /// Called once after the search loop terminated.
    fn search_finished(&mut self, _results: &Results, _sample: &WordSample) {}
}

impl SearchListener for () {}

impl<L: SearchListener + ?Sized> SearchListener for &mut L {
    fn search_started(&mut self) {
        (**self).search_started()
    }

    fn progress(&mut self, iteration: usize, statistics: &Statistics, best: f64) {
        (**self).progress(iteration, statistics, best)
    }

    fn improved(&mut self, fitness: f64) {
        (**self).improved(fitness)
    }

    fn search_finished(&mut self, results: &Results, sample: &WordSample) {
        (**self).search_finished(results, sample)
    }
}

impl<L: SearchListener + ?Sized> SearchListener for Box<L> {
    fn search_started(&mut self) {
        (**self).search_started()
    }

    fn progress(&mut self, iteration: usize, statistics: &Statistics, best: f64) {
        (**self).progress(iteration, statistics, best)
    }

    fn improved(&mut self, fitness: f64) {
        (**self).improved(fitness)
    }

    fn search_finished(&mut self, results: &Results, sample: &WordSample) {
        (**self).search_finished(results, sample)
    }
}

/// Forwards every event to a list of listeners, in the order they were added.
#[derive(Default)]
pub struct Fanout<'a>(Vec<Box<dyn SearchListener + 'a>>);

impl<'a> Fanout<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener and returns `self`.
    pub fn with<L: SearchListener + 'a>(mut self, listener: L) -> Self {
        self.push(listener);
        self
    }

    pub fn push<L: SearchListener + 'a>(&mut self, listener: L) {
        self.0.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl SearchListener for Fanout<'_> {
    fn search_started(&mut self) {
        self.0.iter_mut().for_each(|l| l.search_started())
    }

    fn progress(&mut self, iteration: usize, statistics: &Statistics, best: f64) {
        self.0
            .iter_mut()
            .for_each(|l| l.progress(iteration, statistics, best))
    }

    fn improved(&mut self, fitness: f64) {
        self.0.iter_mut().for_each(|l| l.improved(fitness))
    }

    fn search_finished(&mut self, results: &Results, sample: &WordSample) {
        self.0
            .iter_mut()
            .for_each(|l| l.search_finished(results, sample))
    }
}

/// Reports the search through `tracing`. Progress and improvements are logged at info level,
/// and when the search finishes the words misclassified by the best automaton are listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl SearchListener for TracingListener {
    fn search_started(&mut self) {
        info!("search started");
    }

    fn progress(&mut self, iteration: usize, statistics: &Statistics, best: f64) {
        info!("iteration {iteration}: {statistics}, best so far {best:.5}");
    }

    fn improved(&mut self, fitness: f64) {
        info!("improved best fitness to {fitness:.5}");
    }

    fn search_finished(&mut self, results: &Results, sample: &WordSample) {
        let Some(best) = results.best() else {
            info!("search finished without any solution");
            return;
        };
        info!("search finished\n{results}");
        match super::Evaluator::new(sample).misclassified(&best.decode()) {
            Ok(words) if words.is_empty() => info!("best automaton classifies the whole sample"),
            Ok(words) => info!(
                "best automaton misclassifies {} words: {}",
                words.len(),
                words.iter().map(|w| w.show()).join(", ")
            ),
            Err(e) => info!("could not check the best automaton: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        started: usize,
        improved: Vec<f64>,
    }

    impl SearchListener for Counter {
        fn search_started(&mut self) {
            self.started += 1;
        }

        fn improved(&mut self, fitness: f64) {
            self.improved.push(fitness);
        }
    }

    #[test]
    fn fanout_forwards_in_order() {
        let mut first = Counter::default();
        let mut second = Counter::default();
        {
            let mut fanout = Fanout::new().with(&mut first).with(&mut second);
            assert_eq!(fanout.len(), 2);
            fanout.search_started();
            fanout.improved(0.5);
            fanout.improved(0.25);
            fanout.search_finished(&Results::default(), &WordSample::new());
        }
        assert_eq!(first.started, 1);
        assert_eq!(second.improved, vec![0.5, 0.25]);
    }

    #[test_log::test]
    fn tracing_listener_handles_empty_results() {
        let mut listener = TracingListener;
        listener.search_started();
        listener.search_finished(&Results::default(), &WordSample::new());
    }
}
