use rand::Rng;

use super::{PsoParams, Solution, VelocityLimits};
use crate::math;

/// The velocity of a [`Particle`](super::Particle), shaped like the [`Solution`] it moves.
///
/// Transition components are kept within `±limits.transition` whenever they are written.
/// Acceptance components are only bounded by `limits.acceptance` when they are recomputed in
/// [`Velocity::update`], their initial values are not clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct Velocity {
    transitions: Vec<f64>,
    acceptance: Vec<f64>,
    limits: VelocityLimits,
}

impl Velocity {
    /// A velocity that does not move `solution` at all.
    pub fn zero(solution: &Solution, limits: VelocityLimits) -> Self {
        Self {
            transitions: vec![0.0; solution.transition_cells().len()],
            acceptance: vec![0.0; solution.acceptance_cells().len()],
            limits,
        }
    }

    /// Draws a velocity for `solution`. Each transition component has a magnitude uniform in
    /// `[0, limits.initial_transition)`, each acceptance component one uniform in
    /// `[0, limits.initial_acceptance)`, and every sign is chosen by a fair coin.
    pub fn random<R: Rng + ?Sized>(
        solution: &Solution,
        limits: VelocityLimits,
        rng: &mut R,
    ) -> Self {
        let mut velocity = Self::zero(solution, limits);
        for cell in 0..velocity.transitions.len() {
            let value = signed(rng.gen::<f64>() * limits.initial_transition, rng);
            velocity.set_transition_cell(cell, value);
        }
        for value in velocity.acceptance.iter_mut() {
            *value = signed(rng.gen::<f64>() * limits.initial_acceptance, rng);
        }
        velocity
    }

    pub fn transitions(&self) -> &[f64] {
        &self.transitions
    }

    pub fn acceptance(&self) -> &[f64] {
        &self.acceptance
    }

    pub fn limits(&self) -> VelocityLimits {
        self.limits
    }

    fn set_transition_cell(&mut self, cell: usize, value: f64) {
        self.transitions[cell] = math::clamp_symmetric(value, self.limits.transition);
    }

    /// Recomputes every component `v` of the velocity as
    /// ```text
    /// r1 * w_v * v + r2 * w_p * (personal - current) + r3 * w_g * (global - current)
    /// ```
    /// where `w_v`, `w_p` and `w_g` are the weights of `params`, the values `current`,
    /// `personal` and `global` are the matching cells of the three solutions and `r1`, `r2`,
    /// `r3` are drawn uniformly from `[0, 1)` anew for every component.
    ///
    /// All three solutions must have the shape of the solution this velocity was created for.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        params: &PsoParams,
        current: &Solution,
        personal_best: &Solution,
        global_best: &Solution,
        rng: &mut R,
    ) {
        debug_assert_eq!(current.transition_cells().len(), self.transitions.len());
        debug_assert_eq!(personal_best.size(), current.size());
        debug_assert_eq!(global_best.size(), current.size());

        let mut pull = |velocity: f64, current: f64, personal: f64, global: f64| {
            rng.gen::<f64>() * params.velocity_weight * velocity
                + rng.gen::<f64>() * params.personal_weight * (personal - current)
                + rng.gen::<f64>() * params.global_weight * (global - current)
        };

        for cell in 0..self.transitions.len() {
            let value = pull(
                self.transitions[cell],
                current.transition_cells()[cell],
                personal_best.transition_cells()[cell],
                global_best.transition_cells()[cell],
            );
            self.set_transition_cell(cell, value);
        }
        let bound = self.limits.acceptance;
        for (row, value) in self.acceptance.iter_mut().enumerate() {
            let next = pull(
                *value,
                current.acceptance_cells()[row],
                personal_best.acceptance_cells()[row],
                global_best.acceptance_cells()[row],
            );
            *value = math::clamp_symmetric(next, bound);
        }
    }
}

fn signed<R: Rng + ?Sized>(magnitude: f64, rng: &mut R) -> f64 {
    if rng.gen_bool(0.5) {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::Velocity;
    use crate::prelude::*;

    fn solution(size: usize) -> Solution {
        Solution::with_size(size, Alphabet::of_size(2))
    }

    #[test]
    fn initial_velocity_bounds() {
        let mut rng = StdRng::seed_from_u64(21);
        let limits = VelocityLimits::default();
        let velocity = Velocity::random(&solution(5), limits, &mut rng);
        assert_eq!(velocity.transitions().len(), 10);
        assert_eq!(velocity.acceptance().len(), 5);
        assert!(velocity.transitions().iter().all(|v| v.abs() < 1.0));
        assert!(velocity.acceptance().iter().all(|v| v.abs() < 0.2));
    }

    #[test]
    fn initial_acceptance_velocity_is_not_clamped() {
        let mut rng = StdRng::seed_from_u64(22);
        let limits = VelocityLimits {
            initial_transition: 10.0,
            initial_acceptance: 10.0,
            ..Default::default()
        };
        let velocity = Velocity::random(&solution(20), limits, &mut rng);
        assert!(velocity.transitions().iter().all(|v| v.abs() <= 2.0));
        assert!(velocity.acceptance().iter().any(|v| v.abs() > 2.0));
    }

    #[test]
    fn update_clamps_components() {
        let mut rng = StdRng::seed_from_u64(23);
        let params = PsoParams::default().with_weights(0.0, 10.0, 10.0);
        let current = solution(3);
        let mut far = solution(3);
        for q in far.states().collect::<Vec<_>>() {
            far.set_transition(q, 1, 3.0).unwrap();
            far.set_transition(q, 2, 3.0).unwrap();
            far.set_acceptance(q, 1.0).unwrap();
        }

        let mut velocity = Velocity::zero(&current, VelocityLimits::default());
        for _ in 0..10 {
            velocity.update(&params, &current, &far, &far, &mut rng);
            assert!(velocity.transitions().iter().all(|v| (0.0..=2.0).contains(v)));
            assert!(velocity.acceptance().iter().all(|v| (0.0..=0.4).contains(v)));
        }
    }

    #[test]
    fn update_without_inertia_stops_at_the_optimum() {
        let mut rng = StdRng::seed_from_u64(24);
        let params = PsoParams::default().with_weights(0.0, 10.0, 2.0);
        let current = solution(2);
        let mut velocity = Velocity::random(&current, VelocityLimits::default(), &mut rng);
        velocity.update(&params, &current, &current, &current, &mut rng);
        assert!(velocity.transitions().iter().all(|v| *v == 0.0));
        assert!(velocity.acceptance().iter().all(|v| *v == 0.0));
    }
}
