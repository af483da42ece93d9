//! Random sampler implementation.

use parking_lot::Mutex;

use crate::distribution::Distribution;
use crate::error::Result;
use crate::rng_util;
use crate::sampler::IndependentSampler;
use crate::study::Study;
use crate::trial::FrozenTrial;

/// A simple random sampler that samples uniformly from distributions.
///
/// This sampler ignores the trial history and samples uniformly at random,
/// respecting step grids. It is the default independent sampler and the
/// startup phase of [`TpeSampler`](crate::sampler::tpe::TpeSampler).
///
/// # Examples
///
/// ```
/// use suggestion::sampler::random::RandomSampler;
///
/// // Create with default RNG
/// let sampler = RandomSampler::new();
///
/// // Create with a fixed seed for reproducibility
/// let sampler = RandomSampler::with_seed(42);
/// ```
pub struct RandomSampler {
    rng: Mutex<fastrand::Rng>,
}

impl RandomSampler {
    /// Creates a new random sampler with a default random seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Creates a new random sampler with a fixed seed for reproducibility.
    ///
    /// Using the same seed will produce the same sequence of sampled values.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    /// Creates a random sampler from an optional seed.
    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }

    /// Sample directly from a distribution, outside of any study.
    ///
    /// # Errors
    ///
    /// Returns the distribution's validation error if its domain is empty.
    pub fn sample_distribution(&self, distribution: &Distribution) -> Result<f64> {
        rng_util::sample_uniform(&mut self.rng.lock(), distribution)
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl IndependentSampler for RandomSampler {
    fn sample(
        &self,
        _study: &Study,
        _trial: &FrozenTrial,
        _name: &str,
        distribution: &Distribution,
    ) -> Result<f64> {
        self.sample_distribution(distribution)
    }
}

#[cfg(test)]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_random_sampler_float() {
        let sampler = RandomSampler::with_seed(42);
        let dist = Distribution::continuous(0.0, 1.0);

        for _ in 0..100 {
            let v = sampler.sample_distribution(&dist).unwrap();
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_random_sampler_float_step() {
        let sampler = RandomSampler::with_seed(42);
        let dist = Distribution::stepped_continuous(0.0, 1.0, 0.25);

        for _ in 0..100 {
            let v = sampler.sample_distribution(&dist).unwrap();
            assert!((0.0..=1.0).contains(&v));
            // Check it's on the step grid
            let k = (v / 0.25).round();
            assert!((v - k * 0.25).abs() < 1e-10);
        }
    }

    #[test]
    fn test_random_sampler_int() {
        let sampler = RandomSampler::with_seed(42);
        let dist = Distribution::int(0, 10);

        for _ in 0..100 {
            let v = sampler.sample_distribution(&dist).unwrap();
            assert!((0.0..=10.0).contains(&v));
            assert!(v.fract().abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_random_sampler_int_step() {
        let sampler = RandomSampler::with_seed(42);
        let dist = Distribution::stepped_int(0, 10, 2);

        for _ in 0..100 {
            let v = sampler.sample_distribution(&dist).unwrap() as i64;
            // Check it's on the step grid: 0, 2, 4, 6, 8, 10
            assert!((0..=10).contains(&v));
            assert!(v % 2 == 0);
        }
    }

    #[test]
    fn test_random_sampler_categorical() {
        let sampler = RandomSampler::with_seed(42);
        let dist = Distribution::categorical(["a", "b", "c", "d", "e"]);

        let mut seen = [false; 5];
        for _ in 0..200 {
            let v = sampler.sample_distribution(&dist).unwrap();
            assert!(dist.contains_internal(v));
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every choice should appear");
    }

    #[test]
    fn test_random_sampler_reproducibility() {
        let sampler1 = RandomSampler::with_seed(42);
        let sampler2 = RandomSampler::with_seed(42);
        let dist = Distribution::continuous(0.0, 1.0);

        for _ in 0..10 {
            let v1 = sampler1.sample_distribution(&dist).unwrap();
            let v2 = sampler2.sample_distribution(&dist).unwrap();
            assert!((v1 - v2).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_random_sampler_rejects_empty_domain() {
        let sampler = RandomSampler::with_seed(1);
        let result = sampler.sample_distribution(&Distribution::categorical(Vec::<String>::new()));
        assert!(matches!(result, Err(Error::EmptyChoices)));
    }
}
