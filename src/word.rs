use crate::alphabet::Symbol;

mod sample;
pub use sample::WordSample;

mod generator;
pub use generator::SampleGenerator;

/// A finite word is simply a sequence of symbols.
pub type Word = Vec<Symbol>;
