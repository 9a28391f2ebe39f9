//! Learning deterministic finite automata with particle swarm optimization (PSO).
//!
//! A candidate automaton is encoded as a [`Solution`], a point in a continuous space: every
//! pair of state and symbol holds a real number that rounds to the successor state, and every
//! state holds an acceptance score in `[0, 1]` that marks it as accepting from `0.5` on. A
//! [`Particle`] moves such a point through the space according to its [`Velocity`], which is
//! pulled towards the best point the particle has seen so far and towards the best point of
//! its cohort, i.e. of all particles whose encoding has the same number of states.
//!
//! The [`Swarm`] drives the search. It evaluates every particle against a labeled
//! [`WordSample`](crate::word::WordSample) with an [`Evaluator`], tracks the best encodings in
//! [`Results`] and reports its progress to a [`SearchListener`]. The search ends once an encoding
//! classifies the whole sample correctly, the time budget is exceeded or the maximal number
//! of iterations has been performed.
use thiserror::Error;

use crate::automaton::AutomatonError;

mod params;
pub use params::{PsoParams, VelocityLimits};

mod solution;
pub use solution::Solution;

mod velocity;
pub use velocity::Velocity;

mod particle;
pub use particle::Particle;

mod evaluator;
pub use evaluator::Evaluator;

mod results;
pub use results::{Results, RESULTS_CAPACITY};

mod listener;
pub use listener::{Fanout, SearchListener, TracingListener};

mod swarm;
pub use swarm::{Swarm, Termination};

/// Errors that can occur while searching for an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PsoError {
    /// The fitness of a [`Solution`] was read before it was evaluated, or after it was
    /// modified.
    #[error("solution has not been evaluated since its last modification")]
    Unevaluated,
    /// A state or symbol outside of the automaton was referenced.
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
}
