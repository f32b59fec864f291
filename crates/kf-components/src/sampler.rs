//! Sampling strategies for the transitional friction regime.
//!
//! Between the laminar and turbulent limits the friction factor is uncertain.
//! The network passes an explicit sampler into every friction evaluation so
//! callers choose between reproducible draws, fresh entropy, or no noise.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Standard deviation of transitional draws, as a fraction of the mean.
pub const TRANSITION_REL_STD_DEV: f64 = 0.2;

/// Turns the interpolated transitional mean into the friction factor used.
pub trait TransitionSampler {
    fn sample(&mut self, mean: f64) -> f64;
}

/// Deterministic sampler that always returns the mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSampler;

impl TransitionSampler for MeanSampler {
    fn sample(&mut self, mean: f64) -> f64 {
        mean
    }
}

/// Normal draws with standard deviation proportional to the mean.
#[derive(Debug, Clone)]
pub struct NormalSampler {
    rng: StdRng,
    rel_std_dev: f64,
}

impl NormalSampler {
    /// Reproducible sampler: the same seed yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            rel_std_dev: TRANSITION_REL_STD_DEV,
        }
    }

    /// Sampler seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            rel_std_dev: TRANSITION_REL_STD_DEV,
        }
    }

    pub fn with_rel_std_dev(mut self, rel_std_dev: f64) -> Self {
        self.rel_std_dev = rel_std_dev;
        self
    }
}

impl Default for NormalSampler {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl TransitionSampler for NormalSampler {
    fn sample(&mut self, mean: f64) -> f64 {
        let sd = (self.rel_std_dev * mean).abs();
        match Normal::new(mean, sd) {
            Ok(dist) => dist.sample(&mut self.rng),
            // Non-finite parameters: fall back to the mean.
            Err(_) => mean,
        }
    }
}
