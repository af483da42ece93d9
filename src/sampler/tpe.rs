//! Tree-Parzen Estimator (TPE) sampler implementation.
//!
//! TPE is a Bayesian optimization algorithm that models the objective function
//! using two probability distributions: one for promising (good) parameter values
//! and one for unpromising (bad) parameter values.

use parking_lot::Mutex;

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::kde::KernelDensityEstimator;
use crate::rng_util;
use crate::sampler::IndependentSampler;
use crate::study::Study;
use crate::trial::FrozenTrial;

/// A Tree-Parzen Estimator (TPE) sampler for Bayesian optimization.
///
/// TPE works by splitting the completed trials that carry the requested
/// parameter into two groups: good trials (the best `gamma` fraction, in the
/// study's direction) and bad trials (the rest). It fits a kernel density
/// estimator to each group and picks, among `n_ei_candidates` draws from
/// l(x), the one maximizing l(x)/g(x).
///
/// While fewer than `n_startup_trials` completed observations exist for a
/// parameter, TPE samples uniformly at random.
///
/// # Examples
///
/// ```
/// use suggestion::sampler::tpe::TpeSampler;
///
/// // Create with default settings
/// let sampler = TpeSampler::new();
///
/// // Create with custom settings using the builder
/// let sampler = TpeSampler::builder()
///     .gamma(0.15)
///     .n_startup_trials(20)
///     .n_ei_candidates(32)
///     .seed(42)
///     .build()
///     .unwrap();
/// ```
pub struct TpeSampler {
    /// Fraction of trials to consider as "good" (gamma quantile).
    gamma: f64,
    /// Number of observations before TPE kicks in (uses random sampling before this).
    n_startup_trials: usize,
    /// Number of candidate samples to evaluate when selecting the next point.
    n_ei_candidates: usize,
    /// Thread-safe RNG for sampling.
    rng: Mutex<fastrand::Rng>,
}

impl TpeSampler {
    /// Creates a new TPE sampler with default settings.
    ///
    /// Default settings:
    /// - gamma: 0.25 (top 25% of trials are considered "good")
    /// - `n_startup_trials`: 10 (random sampling for first 10 observations)
    /// - `n_ei_candidates`: 24 (evaluate 24 candidates per sample)
    #[must_use]
    pub fn new() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            n_startup_trials: DEFAULT_N_STARTUP_TRIALS,
            n_ei_candidates: DEFAULT_N_EI_CANDIDATES,
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Creates a builder for configuring a TPE sampler.
    #[must_use]
    pub fn builder() -> TpeSamplerBuilder {
        TpeSamplerBuilder::new()
    }

    /// Splits observations into good and bad groups based on the gamma quantile.
    ///
    /// `observations` holds `(normalized objective, internal value)` pairs where
    /// smaller objectives are better. Requires at least two observations.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn split(&self, mut observations: Vec<(f64, f64)>) -> (Vec<f64>, Vec<f64>) {
        observations.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(core::cmp::Ordering::Equal));

        // At least one observation in each group
        let n = observations.len();
        let n_good = ((n as f64 * self.gamma).ceil() as usize).max(1).min(n - 1);

        let good = observations[..n_good].iter().map(|&(_, x)| x).collect();
        let bad = observations[n_good..].iter().map(|&(_, x)| x).collect();
        (good, bad)
    }

    /// Samples using TPE on a continuous interval.
    fn sample_tpe_float(
        &self,
        low: f64,
        high: f64,
        good_values: Vec<f64>,
        bad_values: Vec<f64>,
        rng: &mut fastrand::Rng,
    ) -> f64 {
        if high <= low {
            return low;
        }

        // Kernels never get narrower than 1% of the range.
        let min_bandwidth = (high - low) / 100.0;
        let (Ok(l_kde), Ok(g_kde)) = (
            KernelDensityEstimator::with_min_bandwidth(good_values, min_bandwidth),
            KernelDensityEstimator::with_min_bandwidth(bad_values, min_bandwidth),
        ) else {
            return rng_util::f64_range(rng, low, high);
        };

        let mut best_candidate = low;
        let mut best_ratio = f64::NEG_INFINITY;

        for _ in 0..self.n_ei_candidates {
            let candidate = l_kde.sample(rng).clamp(low, high);

            let l_density = l_kde.pdf(candidate);
            let g_density = g_kde.pdf(candidate);

            // Compute l(x)/g(x) ratio, handling zero density
            let ratio = if g_density < f64::EPSILON {
                if l_density > f64::EPSILON {
                    f64::INFINITY
                } else {
                    0.0
                }
            } else {
                l_density / g_density
            };

            if ratio > best_ratio {
                best_ratio = ratio;
                best_candidate = candidate;
            }
        }

        best_candidate
    }

    /// Samples a category index weighted by smoothed l(x)/g(x).
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn sample_tpe_categorical(
        n_choices: usize,
        good_indices: &[f64],
        bad_indices: &[f64],
        rng: &mut fastrand::Rng,
    ) -> usize {
        let mut good_counts = vec![0usize; n_choices];
        let mut bad_counts = vec![0usize; n_choices];

        for &idx in good_indices {
            if let Some(c) = good_counts.get_mut(idx as usize) {
                *c += 1;
            }
        }
        for &idx in bad_indices {
            if let Some(c) = bad_counts.get_mut(idx as usize) {
                *c += 1;
            }
        }

        // Laplace smoothing to avoid zero probabilities
        let good_total = good_indices.len() as f64 + n_choices as f64;
        let bad_total = bad_indices.len() as f64 + n_choices as f64;

        let weights: Vec<f64> = (0..n_choices)
            .map(|i| {
                let l_prob = (good_counts[i] as f64 + 1.0) / good_total;
                let g_prob = (bad_counts[i] as f64 + 1.0) / bad_total;
                l_prob / g_prob
            })
            .collect();

        let threshold = rng.f64() * weights.iter().sum::<f64>();
        let mut cumulative = 0.0;
        for (i, &w) in weights.iter().enumerate() {
            cumulative += w;
            if cumulative >= threshold {
                return i;
            }
        }

        n_choices - 1
    }
}

const DEFAULT_GAMMA: f64 = 0.25;
const DEFAULT_N_STARTUP_TRIALS: usize = 10;
const DEFAULT_N_EI_CANDIDATES: usize = 24;

impl Default for TpeSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`TpeSampler`].
///
/// # Examples
///
/// ```
/// use suggestion::sampler::tpe::TpeSamplerBuilder;
///
/// let sampler = TpeSamplerBuilder::new()
///     .gamma(0.15)
///     .n_startup_trials(20)
///     .seed(42)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TpeSamplerBuilder {
    gamma: f64,
    n_startup_trials: usize,
    n_ei_candidates: usize,
    seed: Option<u64>,
}

impl TpeSamplerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            n_startup_trials: DEFAULT_N_STARTUP_TRIALS,
            n_ei_candidates: DEFAULT_N_EI_CANDIDATES,
            seed: None,
        }
    }

    /// Sets the gamma quantile for splitting trials into good/bad groups.
    ///
    /// Must be in (0.0, 1.0); checked by [`build`](Self::build).
    #[must_use]
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the number of observations before TPE sampling begins.
    #[must_use]
    pub fn n_startup_trials(mut self, n: usize) -> Self {
        self.n_startup_trials = n;
        self
    }

    /// Sets the number of candidates evaluated per sample.
    #[must_use]
    pub fn n_ei_candidates(mut self, n: usize) -> Self {
        self.n_ei_candidates = n;
        self
    }

    /// Sets a seed for reproducible sampling.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets an optional seed; `None` keeps OS-provided entropy.
    #[must_use]
    pub fn seed_opt(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the configured [`TpeSampler`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidGamma` if gamma is not in (0.0, 1.0) and
    /// `Error::InvalidSetting` if `n_ei_candidates` is zero.
    pub fn build(self) -> Result<TpeSampler> {
        if !(self.gamma > 0.0 && self.gamma < 1.0) {
            return Err(Error::InvalidGamma(self.gamma));
        }
        if self.n_ei_candidates == 0 {
            return Err(Error::InvalidSetting {
                name: "n_ei_candidates".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        let rng = self
            .seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

        Ok(TpeSampler {
            gamma: self.gamma,
            n_startup_trials: self.n_startup_trials,
            n_ei_candidates: self.n_ei_candidates,
            rng: Mutex::new(rng),
        })
    }
}

impl Default for TpeSamplerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndependentSampler for TpeSampler {
    #[allow(clippy::cast_precision_loss)]
    fn sample(
        &self,
        study: &Study,
        _trial: &FrozenTrial,
        name: &str,
        distribution: &Distribution,
    ) -> Result<f64> {
        distribution.validate()?;
        let mut rng = self.rng.lock();

        let direction = study.direction();
        let observations: Vec<(f64, f64)> = study
            .completed_trials()
            .filter_map(|t| {
                t.internal_param(name)
                    .filter(|&x| distribution.contains_internal(x))
                    .map(|x| (direction.normalize(t.value), x))
            })
            .collect();

        // Fall back to random sampling during startup phase
        if observations.len() < self.n_startup_trials.max(2) {
            return rng_util::sample_uniform(&mut rng, distribution);
        }

        let (good, bad) = self.split(observations);

        let value = match distribution {
            Distribution::Continuous(d) => {
                self.sample_tpe_float(d.low, d.high, good, bad, &mut rng)
            }
            Distribution::SteppedContinuous(d) => {
                let raw = self.sample_tpe_float(d.low, d.high, good, bad, &mut rng);
                match d.step {
                    Some(step) => rng_util::snap_float(raw, d.low, d.high, step),
                    None => raw,
                }
            }
            Distribution::Int(d) | Distribution::SteppedInt(d) => {
                let raw =
                    self.sample_tpe_float(d.low as f64, d.high as f64, good, bad, &mut rng);
                rng_util::snap_int(raw, d.low, d.high, d.step.unwrap_or(1)) as f64
            }
            Distribution::Categorical(d) => {
                Self::sample_tpe_categorical(d.choices.len(), &good, &bad, &mut rng) as f64
            }
        };
        Ok(value)
    }
}
