use std::time::Duration;

/// Bounds on the velocity of a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityLimits {
    /// Maximal magnitude of the initial, randomly drawn transition velocities.
    pub initial_transition: f64,
    /// Maximal magnitude of the initial, randomly drawn acceptance velocities.
    pub initial_acceptance: f64,
    /// Storage bound of the transition velocities, every written value is clamped to it.
    pub transition: f64,
    /// Bound on the acceptance velocities, enforced when the velocity is updated.
    pub acceptance: f64,
}

impl Default for VelocityLimits {
    fn default() -> Self {
        Self {
            initial_transition: 1.0,
            initial_acceptance: 0.2,
            transition: 2.0,
            acceptance: 0.4,
        }
    }
}

/// Parameters of the particle swarm optimization.
///
/// The weights default to values far from the ones usually found in the literature (which are
/// around `4.1`, `2.8` and `1.3`), pulling particles strongly towards their own best position.
#[derive(Debug, Clone, PartialEq)]
pub struct PsoParams {
    /// Maximal number of generations.
    pub max_iterations: usize,
    /// Number of particles in the swarm.
    pub particles_count: usize,
    /// Inertia, the weight of the previous velocity.
    pub velocity_weight: f64,
    /// Weight of the pull towards the best position of the particle itself.
    pub personal_weight: f64,
    /// Weight of the pull towards the best position of the cohort.
    pub global_weight: f64,
    /// Wall clock time after which the search stops.
    pub time_budget: Duration,
    /// Upper bound on the number of states of a randomly initialized encoding.
    pub max_states: usize,
    /// Velocity bounds of every particle.
    pub limits: VelocityLimits,
    /// Number of best encodings kept in the [`Results`](super::Results).
    pub results_capacity: usize,
    /// Number of generations between two progress reports.
    pub progress_interval: usize,
    /// Seed of the random number generator, drawn from entropy if absent.
    pub seed: Option<u64>,
}

impl Default for PsoParams {
    fn default() -> Self {
        Self {
            max_iterations: 40000,
            particles_count: 50,
            velocity_weight: 2.0,
            personal_weight: 10.0,
            global_weight: 2.0,
            time_budget: Duration::from_secs(3 * 60),
            max_states: 20,
            limits: VelocityLimits::default(),
            results_capacity: super::RESULTS_CAPACITY,
            progress_interval: 50,
            seed: None,
        }
    }
}

impl PsoParams {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_particles_count(mut self, particles_count: usize) -> Self {
        self.particles_count = particles_count;
        self
    }

    /// Sets the velocity, personal and global weights at once.
    pub fn with_weights(mut self, velocity: f64, personal: f64, global: f64) -> Self {
        self.velocity_weight = velocity;
        self.personal_weight = personal;
        self.global_weight = global;
        self
    }

    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }

    pub fn with_limits(mut self, limits: VelocityLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_results_capacity(mut self, capacity: usize) -> Self {
        self.results_capacity = capacity;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl std::fmt::Display for PsoParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PsoParams [max_iterations={}, particles_count={}, velocity_weight={}, personal_weight={}, global_weight={}, time_budget={}]",
            self.max_iterations,
            self.particles_count,
            self.velocity_weight,
            self.personal_weight,
            self.global_weight,
            crate::show::show_duration(self.time_budget)
        )
    }
}
