use rand::Rng;
use tracing::{trace, warn};

use super::{Evaluator, PsoError, PsoParams, Solution, Velocity, VelocityLimits};

/// Fraction of the transition velocity that is applied in one movement.
const TRANSITION_STEP: f64 = 0.25;
/// Fraction of the acceptance velocity that is applied in one movement.
const ACCEPTANCE_STEP: f64 = 0.75;

/// A member of the swarm. It holds its current position, the best position it has visited
/// and the velocity it moves with.
#[derive(Debug, Clone)]
pub struct Particle {
    current: Solution,
    best: Solution,
    velocity: Velocity,
}

impl Particle {
    /// Places a particle at `solution` with a random velocity bounded by the default
    /// [`VelocityLimits`].
    pub fn new<R: Rng + ?Sized>(solution: Solution, rng: &mut R) -> Self {
        Self::with_limits(solution, VelocityLimits::default(), rng)
    }

    /// Places a particle at `solution` with a random velocity bounded by `limits`.
    pub fn with_limits<R: Rng + ?Sized>(
        solution: Solution,
        limits: VelocityLimits,
        rng: &mut R,
    ) -> Self {
        let velocity = Velocity::random(&solution, limits, rng);
        Self {
            best: solution.clone(),
            current: solution,
            velocity,
        }
    }

    /// The current position.
    pub fn solution(&self) -> &Solution {
        &self.current
    }

    /// The best position the particle has been evaluated at.
    pub fn best(&self) -> &Solution {
        &self.best
    }

    pub fn velocity(&self) -> &Velocity {
        &self.velocity
    }

    /// Number of states of the current position, which determines the cohort of the particle.
    pub fn size(&self) -> usize {
        self.current.size()
    }

    /// Pulls the velocity towards the personal best and towards `cohort_best`, see
    /// [`Velocity::update`]. If the cohort has no best solution yet, the velocity is left
    /// unchanged and `false` is returned.
    pub fn update_velocity<R: Rng + ?Sized>(
        &mut self,
        params: &PsoParams,
        cohort_best: Option<&Solution>,
        rng: &mut R,
    ) -> bool {
        let Some(cohort_best) = cohort_best else {
            warn!("no best solution known for {} states", self.size());
            return false;
        };
        trace!("velocity before update {:?}", self.velocity);
        self.velocity
            .update(params, &self.current, &self.best, cohort_best, rng);
        true
    }

    /// Moves the particle by a quarter of its transition velocity and three quarters of its
    /// acceptance velocity. The resulting position is clamped to the bounds of a
    /// [`Solution`] and is not evaluated.
    pub fn perform_movement(&mut self) {
        let mut next = self.current.clone();
        for (cell, (value, speed)) in self
            .current
            .transition_cells()
            .iter()
            .zip(self.velocity.transitions())
            .enumerate()
        {
            next.set_transition_cell(cell, value + TRANSITION_STEP * speed);
        }
        for (row, (value, speed)) in self
            .current
            .acceptance_cells()
            .iter()
            .zip(self.velocity.acceptance())
            .enumerate()
        {
            next.set_acceptance_cell(row, value + ACCEPTANCE_STEP * speed);
        }
        self.current = next;
    }

    /// Evaluates the current position and adopts it as personal best if it is strictly
    /// better, or if the personal best has never been evaluated. Returns the fitness of the
    /// current position.
    pub fn evaluate(&mut self, evaluator: &Evaluator<'_>) -> Result<f64, PsoError> {
        let fitness = evaluator.evaluate(&mut self.current)?;
        let improved = match self.best.evaluation() {
            Ok(best) => fitness < best,
            Err(PsoError::Unevaluated) => true,
            Err(e) => return Err(e),
        };
        if improved {
            self.best = self.current.clone();
        }
        Ok(fitness)
    }
}
