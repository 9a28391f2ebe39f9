//! Library for learning deterministic finite automata from labeled examples with particle
//! swarm optimization.
//!
//! A [`Dfa`](automaton::Dfa) over an integer [`Alphabet`] is given either programmatically,
//! through a [`DfaBuilder`](automaton::DfaBuilder), or by its one-line textual description
//! (see [`parse`]). From such a reference automaton, the [`SampleGenerator`](word::SampleGenerator)
//! builds a [`WordSample`](word::WordSample), which partitions words into accepted and rejected
//! ones.
//!
//! The [`pso`] module then searches for an automaton that is consistent with the sample. Each
//! candidate automaton is encoded as a point in a continuous space, and a [`Swarm`](pso::Swarm)
//! of particles moves through that space, attracted by the best points found so far. The
//! fitness of a candidate is the fraction of words in the sample that it classifies wrongly,
//! so the search succeeds once it finds a candidate of fitness `0`.
//!
//! ```
//! use automata_pso::prelude::*;
//!
//! // accepts exactly the words that end with symbol 1
//! let target: Dfa = "2, 2, 2, 1, 2, 1, 2".parse().unwrap();
//! let sample = SampleGenerator::new(&target).exhaustive(4);
//! assert_eq!(sample.len(), 2 + 4 + 8 + 16);
//!
//! let params = PsoParams::default().with_max_iterations(20).with_seed(7);
//! let results = Swarm::new(params).search(target.alphabet(), &sample).unwrap();
//! let best = results.best().unwrap();
//! assert!(best.evaluation().unwrap() <= 0.5);
//! ```
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_pso::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{Alphabet, Symbol},
        automaton::{AutomatonError, Dfa, DfaBuilder, Outcome, StateId, Stepper},
        math, parse,
        pso::{
            Evaluator, Particle, PsoError, PsoParams, Results, SearchListener, Solution, Swarm,
            Termination, TracingListener, Velocity, VelocityLimits,
        },
        word::{SampleGenerator, Word, WordSample},
        Show,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Module that contains definitions for dealing with alphabets.
pub mod alphabet;
pub use alphabet::Alphabet;

/// Deterministic finite automata, how to build them and how to run words on them.
pub mod automaton;

/// Module that contains definitions for dealing with words and labeled samples of words.
pub mod word;

pub mod parse;

/// Implements the generation of random automata and words.
pub mod random;

pub mod pso;

mod show;
pub use show::{show_duration, Show};
