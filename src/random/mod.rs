use rand::Rng;
use tracing::trace;

use crate::prelude::*;

/// Generate a random [`Dfa`] with `size` states over the alphabet `1..=symbols` by drawing
/// every transition target uniformly among all states and marking each state as accepting
/// with probability `1/2`. The initial state is `1`. Note that depending on the drawn
/// transitions, some states may be unreachable.
pub fn generate_random_dfa<R: Rng + ?Sized>(symbols: usize, size: usize, rng: &mut R) -> Dfa {
    assert!(size > 0, "an automaton must have at least one state");
    let table = (0..size * symbols)
        .map(|_| rng.gen_range(1..=size as StateId))
        .collect();
    let accepting = (1..=size as StateId)
        .filter(|_| rng.gen_bool(0.5))
        .collect::<Vec<_>>();
    trace!("drew random automaton with {size} states and accepting states {accepting:?}");
    Dfa::from_table(Alphabet::of_size(symbols), size, table, 1, accepting)
        .expect("all drawn targets are states")
}

/// Generate a random `Word` over the `alphabet`.
/// The length of the word is drawn uniformly from the range `min_len..=max_len`.
pub fn generate_random_word<R: Rng + ?Sized>(
    alphabet: &Alphabet,
    min_len: usize,
    max_len: usize,
    rng: &mut R,
) -> Word {
    let length = rng.gen_range(min_len..=max_len);
    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.size())])
        .collect()
}
