/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Aggregated fitness values of a population: the mean, the best (smallest) and the worst
/// (largest) value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    /// Arithmetic mean of all values.
    pub mean: f64,
    /// Smallest value, fitness is minimized so this is the best one.
    pub best: f64,
    /// Largest value.
    pub worst: f64,
}

impl Statistics {
    /// Computes the statistics of the given values. Returns `None` if the iterator is empty.
    pub fn of<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let (count, sum, best, worst) = values.into_iter().fold(
            (0usize, 0.0, f64::MAX, f64::MIN),
            |(count, sum, best, worst), x| (count + 1, sum + x, best.min(x), worst.max(x)),
        );
        if count == 0 {
            return None;
        }
        Some(Self {
            mean: sum / count as f64,
            best,
            worst,
        })
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "average {:.5}, min {:.5}, max {:.5}",
            self.mean, self.best, self.worst
        )
    }
}

/// Restricts `value` to the closed interval `[min, max]`. Unlike [`f64::clamp`] this does not
/// panic if the bounds are swapped, the lower bound simply wins.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Restricts `value` to `[-magnitude, magnitude]`.
pub fn clamp_symmetric(value: f64, magnitude: f64) -> f64 {
    if value.abs() > magnitude {
        magnitude.copysign(value)
    } else {
        value
    }
}

/// Whether `l` and `r` differ by less than `delta` relative to their combined magnitude.
pub fn almost_equal(l: f64, r: f64, delta: f64) -> bool {
    l == r || ((l - r).abs() / (l.abs() + r.abs())) < delta
}
