use itertools::Itertools;
use rand::Rng;

use super::PsoError;
use crate::{math, prelude::*};

/// States whose acceptance score reaches this value are accepting.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.5;

/// Distance by which the transition cells may exceed the range `1..=n` of states. Every
/// value in `[1 - MARGIN, n + MARGIN]` rounds to a state.
const MARGIN: f64 = 0.4999;

/// A candidate automaton encoded as a point in a continuous space.
///
/// For an encoding with `n` states over an alphabet with `k` symbols, the point consists of
/// `n * k` transition cells, stored row by row as in [`Dfa::from_table`], and of `n` acceptance
/// cells. The transition cell of state `q` and symbol `a` lies in `[1 - 0.4999, n + 0.4999]` and
/// rounds to the successor of `q` on `a`. The acceptance cell of `q` lies in `[0, 1]` and `q`
/// accepts if it is at least [`ACCEPTANCE_THRESHOLD`]. Every setter clamps its value to these
/// bounds, so the encoding always [decodes](Solution::decode) to a valid [`Dfa`] with initial
/// state `1`.
///
/// A solution carries the fitness it was last evaluated with. Any modification discards the
/// fitness, reading it afterwards yields [`PsoError::Unevaluated`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    alphabet: Alphabet,
    size: usize,
    transitions: Vec<f64>,
    acceptance: Vec<f64>,
    evaluation: Option<f64>,
}

impl Solution {
    /// Creates a solution whose number of states is drawn at random: a uniform value in
    /// `[0, max_states)` is raised to at least `0.5` and rounded, which yields a count in
    /// `1..=max_states`. The cells are left at their lower bounds, use
    /// [`Solution::randomise`] or [`Solution::randomise_continuous`] to scatter them.
    pub fn random<R: Rng + ?Sized>(max_states: usize, alphabet: Alphabet, rng: &mut R) -> Self {
        let drawn = (rng.gen::<f64>() * max_states as f64).max(0.5);
        Self::with_size(drawn.round() as usize, alphabet)
    }

    /// Creates an unevaluated solution with `size` states, all of its transition cells at the
    /// lower bound and all acceptance cells at `0`. Such a solution decodes to the automaton
    /// that loops in state `1` and accepts nothing.
    ///
    /// # Panics
    /// Panics if `size` is `0`.
    pub fn with_size(size: usize, alphabet: Alphabet) -> Self {
        assert!(size > 0, "a solution must have at least one state");
        let lower = 1.0 - MARGIN;
        Self {
            transitions: vec![lower; size * alphabet.size()],
            acceptance: vec![0.0; size],
            alphabet,
            size,
            evaluation: None,
        }
    }

    /// Encodes `dfa` such that every cell sits exactly on the integer it decodes to. As
    /// decoded automata always start in state `1`, the states `1` and `dfa.initial()` swap
    /// their names, the decoded automaton is thus isomorphic to `dfa`.
    pub fn encode(dfa: &Dfa) -> Self {
        let initial = dfa.initial();
        let rename = |q: StateId| match q {
            q if q == initial => 1,
            1 => initial,
            q => q,
        };
        let mut solution = Self::with_size(dfa.size(), dfa.alphabet().clone());
        let width = dfa.alphabet().size();
        for (index, &target) in dfa.table().iter().enumerate() {
            let source = rename((index / width) as StateId + 1);
            let cell = (source as usize - 1) * width + index % width;
            solution.transitions[cell] = rename(target) as f64;
        }
        for q in dfa.accepting_states() {
            solution.acceptance[rename(q) as usize - 1] = 1.0;
        }
        solution
    }

    /// Number of states of the encoded automaton.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Iterates over the states `1..=n` in ascending order.
    pub fn states(&self) -> impl Iterator<Item = StateId> {
        1..=self.size as StateId
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the closed interval that all transition cells are kept in.
    pub fn transition_bounds(&self) -> (f64, f64) {
        (1.0 - MARGIN, self.size as f64 + MARGIN)
    }

    fn cell(&self, state: StateId, symbol: Symbol) -> Result<usize, AutomatonError> {
        if !(1..=self.size as StateId).contains(&state) {
            return Err(AutomatonError::UnknownState {
                state,
                size: self.size,
            });
        }
        let column = self
            .alphabet
            .index_of(symbol)
            .ok_or(AutomatonError::UnknownSymbol(symbol))?;
        Ok((state as usize - 1) * self.alphabet.size() + column)
    }

    fn row(&self, state: StateId) -> Result<usize, AutomatonError> {
        if (1..=self.size as StateId).contains(&state) {
            Ok(state as usize - 1)
        } else {
            Err(AutomatonError::UnknownState {
                state,
                size: self.size,
            })
        }
    }

    /// Returns the continuous value of the transition from `state` on `symbol`.
    pub fn next_value(&self, state: StateId, symbol: Symbol) -> Result<f64, AutomatonError> {
        Ok(self.transitions[self.cell(state, symbol)?])
    }

    /// Returns the state that the transition from `state` on `symbol` decodes to, see
    /// [`Solution::decode`].
    pub fn next_state(&self, state: StateId, symbol: Symbol) -> Result<StateId, AutomatonError> {
        Ok(self.snap(self.next_value(state, symbol)?))
    }

    /// Returns the acceptance score of `state`.
    pub fn acceptance(&self, state: StateId) -> Result<f64, AutomatonError> {
        Ok(self.acceptance[self.row(state)?])
    }

    /// Sets the transition from `state` on `symbol` to `value`, clamped to the
    /// [transition bounds](Solution::transition_bounds).
    pub fn set_transition(
        &mut self,
        state: StateId,
        symbol: Symbol,
        value: f64,
    ) -> Result<(), AutomatonError> {
        let cell = self.cell(state, symbol)?;
        self.set_transition_cell(cell, value);
        Ok(())
    }

    /// Sets the acceptance score of `state` to `value`, clamped to `[0, 1]`.
    pub fn set_acceptance(&mut self, state: StateId, value: f64) -> Result<(), AutomatonError> {
        let row = self.row(state)?;
        self.set_acceptance_cell(row, value);
        Ok(())
    }

    /// Iterates over the states whose acceptance score is at least [`ACCEPTANCE_THRESHOLD`].
    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states()
            .filter(|q| self.acceptance[*q as usize - 1] >= ACCEPTANCE_THRESHOLD)
    }

    /// Scatters the solution such that every transition cell holds a uniformly drawn state,
    /// i.e. an integer, and every acceptance cell a uniform value in `[0, 1)`.
    pub fn randomise<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in 0..self.transitions.len() {
            let target = rng.gen_range(1..=self.size);
            self.set_transition_cell(cell, target as f64);
        }
        self.randomise_acceptance(rng);
    }

    /// Scatters the solution such that every transition cell holds a uniformly drawn state
    /// shifted by a uniform offset in `[-0.5, 0.5)`, and every acceptance cell a uniform value
    /// in `[0, 1)`.
    pub fn randomise_continuous<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in 0..self.transitions.len() {
            let target = rng.gen_range(1..=self.size) as f64 - 0.5 + rng.gen::<f64>();
            self.set_transition_cell(cell, target);
        }
        self.randomise_acceptance(rng);
    }

    fn randomise_acceptance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for row in 0..self.acceptance.len() {
            self.set_acceptance_cell(row, rng.gen());
        }
    }

    /// Decodes the discrete automaton. Every transition value is rounded to the nearest
    /// integer, which is taken as successor if it is a state. Otherwise the state closest to
    /// it is used, where ties are resolved in favour of the smaller state. The initial state is
    /// `1` and the accepting states are given by [`Solution::accepting_states`].
    pub fn decode(&self) -> Dfa {
        let table = self.transitions.iter().map(|v| self.snap(*v)).collect();
        Dfa::from_table(
            self.alphabet.clone(),
            self.size,
            table,
            1,
            self.accepting_states(),
        )
        .expect("decoded transitions always target states")
    }

    /// Rounds `value` to the nearest state.
    fn snap(&self, value: f64) -> StateId {
        let rounded = value.round();
        if rounded >= 1.0 && rounded <= self.size as f64 {
            return rounded as StateId;
        }
        let mut closest = 1;
        let mut difference = f64::INFINITY;
        for q in self.states() {
            let current = (rounded - q as f64).abs();
            if current < difference {
                closest = q;
                difference = current;
            }
        }
        closest
    }

    /// Returns the fitness of the last evaluation, which is only available if the solution
    /// has not been modified since.
    pub fn evaluation(&self) -> Result<f64, PsoError> {
        self.evaluation.ok_or(PsoError::Unevaluated)
    }

    /// Records the fitness of the solution.
    pub fn set_evaluation(&mut self, evaluation: f64) {
        self.evaluation = Some(evaluation);
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluation.is_some()
    }

    pub(crate) fn transition_cells(&self) -> &[f64] {
        &self.transitions
    }

    pub(crate) fn acceptance_cells(&self) -> &[f64] {
        &self.acceptance
    }

    pub(crate) fn set_transition_cell(&mut self, cell: usize, value: f64) {
        let (min, max) = self.transition_bounds();
        self.transitions[cell] = math::clamp(value, min, max);
        self.evaluation = None;
    }

    pub(crate) fn set_acceptance_cell(&mut self, row: usize, value: f64) {
        self.acceptance[row] = math::clamp(value, 0.0, 1.0);
        self.evaluation = None;
    }

    /// Renders the continuous cells with one row per state and one column per symbol,
    /// followed by the acceptance score.
    pub fn build_cell_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string())
                .chain(self.alphabet.universe().map(|s| s.to_string()))
                .chain(std::iter::once("Acceptance".to_string())),
        );
        let width = self.alphabet.size();
        for (row, cells) in self.transitions.chunks(width.max(1)).enumerate() {
            builder.push_record(
                std::iter::once(format!("q{}", row + 1))
                    .chain(cells.iter().map(|v| v.show()))
                    .chain(std::iter::once(self.acceptance[row].show())),
            );
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl Show for Solution {
    fn show(&self) -> String {
        match self.evaluation {
            Some(evaluation) => format!("Evaluation: {evaluation}"),
            None => "Evaluation: none".to_string(),
        }
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} with {} states, accepting {{{}}}",
            self.show(),
            self.size,
            self.accepting_states().join(", ")
        )?;
        write!(f, "{}", self.build_cell_table())
    }
}
