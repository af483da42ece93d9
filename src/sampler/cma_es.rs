//! CMA-ES (Covariance Matrix Adaptation Evolution Strategy) sampler.
//!
//! CMA-ES maintains a multivariate Gaussian distribution over the numeric
//! parameters and adapts its mean, covariance matrix, and step-size based
//! on trial rankings.
//!
//! The sampler is relative: it proposes a joint assignment for every float
//! and integer parameter. Categorical parameters are not part of the CMA-ES
//! vector and are left to the study's independent sampler.
//!
//! Because every suggestion request carries the full trial history, the
//! sampler keeps no per-study state. Each call replays the completed trials
//! in registry order, one generation of `population_size` trials at a time,
//! and draws a single candidate from the resulting distribution.
//!
//! # Examples
//!
//! ```
//! use suggestion::sampler::cma_es::CmaEsSampler;
//!
//! let sampler = CmaEsSampler::builder()
//!     .sigma0(0.5)
//!     .population_size(8)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! ```

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};
use parking_lot::Mutex;

use crate::distribution::{Distribution, SearchSpace};
use crate::error::{Error, Result};
use crate::rng_util;
use crate::sampler::RelativeSampler;
use crate::study::Study;
use crate::trial::FrozenTrial;

/// CMA-ES sampler for continuous optimization.
///
/// Best suited for float and integer parameters in moderate dimensions.
pub struct CmaEsSampler {
    /// User-provided initial sigma (None = auto).
    sigma0: Option<f64>,
    /// User-provided population size (None = auto).
    population_size: Option<usize>,
    rng: Mutex<fastrand::Rng>,
}

impl CmaEsSampler {
    /// Creates a new CMA-ES sampler with default settings and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sigma0: None,
            population_size: None,
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Creates a new CMA-ES sampler with a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            sigma0: None,
            population_size: None,
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    /// Creates a builder for configuring a CMA-ES sampler.
    #[must_use]
    pub fn builder() -> CmaEsSamplerBuilder {
        CmaEsSamplerBuilder::new()
    }
}

impl Default for CmaEsSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`CmaEsSampler`].
///
/// Defaults:
/// - `sigma0`: a quarter of the average parameter range
/// - `population_size`: `4 + floor(3 * ln(n))`
/// - `seed`: random
#[derive(Debug, Clone, Default)]
pub struct CmaEsSamplerBuilder {
    sigma0: Option<f64>,
    population_size: Option<usize>,
    seed: Option<u64>,
}

impl CmaEsSamplerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial step size (sigma). Must be positive.
    #[must_use]
    pub fn sigma0(mut self, sigma0: f64) -> Self {
        self.sigma0 = Some(sigma0);
        self
    }

    /// Sets the population size (lambda). Must be at least 2.
    #[must_use]
    pub fn population_size(mut self, population_size: usize) -> Self {
        self.population_size = Some(population_size);
        self
    }

    /// Sets the random seed for reproducibility.
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

    /// Builds the configured [`CmaEsSampler`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSetting` if `sigma0` is not a positive finite
    /// number or `population_size` is below 2.
    pub fn build(self) -> Result<CmaEsSampler> {
        if let Some(sigma) = self.sigma0
            && !(sigma.is_finite() && sigma > 0.0)
        {
            return Err(Error::InvalidSetting {
                name: "sigma".to_owned(),
                reason: format!("must be positive, got {sigma}"),
            });
        }
        if let Some(lambda) = self.population_size
            && lambda < 2
        {
            return Err(Error::InvalidSetting {
                name: "population_size".to_owned(),
                reason: format!("must be at least 2, got {lambda}"),
            });
        }

        let rng = self
            .seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        Ok(CmaEsSampler {
            sigma0: self.sigma0,
            population_size: self.population_size,
            rng: Mutex::new(rng),
        })
    }
}

/// One numeric dimension of the CMA-ES vector.
struct Dimension<'a> {
    name: &'a str,
    distribution: &'a Distribution,
    low: f64,
    high: f64,
}

/// The CMA-ES algorithm constants, derived from dimension count.
#[derive(Clone, Debug)]
struct CmaEsConstants {
    /// Dimension of the search space.
    n: usize,
    /// Population size (lambda).
    lambda: usize,
    /// Parent count (mu = lambda / 2).
    mu: usize,
    /// Recombination weights (length mu).
    weights: Vec<f64>,
    /// Variance effective selection mass.
    mu_eff: f64,
    c_sigma: f64,
    d_sigma: f64,
    c_c: f64,
    c_1: f64,
    c_mu: f64,
    /// Expected norm of N(0, I) in n dimensions.
    chi_n: f64,
}

impl CmaEsConstants {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn new(n: usize, user_lambda: Option<usize>) -> Self {
        let n_f = n as f64;

        let lambda = user_lambda
            .unwrap_or_else(|| 4 + (3.0 * n_f.ln()).max(0.0).floor() as usize)
            .max(2);
        let mu = lambda / 2;

        // Log-proportional recombination weights
        let log_half_lambda = f64::midpoint(lambda as f64, 1.0).ln();
        let raw_weights: Vec<f64> = (0..mu)
            .map(|i| log_half_lambda - ((i + 1) as f64).ln())
            .collect();
        let w_sum: f64 = raw_weights.iter().sum();
        let weights: Vec<f64> = raw_weights.iter().map(|w| w / w_sum).collect();

        let w_sq_sum: f64 = weights.iter().map(|w| w * w).sum();
        let mu_eff = 1.0 / w_sq_sum;

        let c_sigma = (mu_eff + 2.0) / (n_f + mu_eff + 5.0);
        let d_sigma = 1.0 + 2.0 * (((mu_eff - 1.0) / (n_f + 1.0)).sqrt() - 1.0).max(0.0) + c_sigma;
        let c_c = (4.0 + mu_eff / n_f) / (n_f + 4.0 + 2.0 * mu_eff / n_f);
        let c_1 = 2.0 / ((n_f + 1.3).powi(2) + mu_eff);
        let c_mu_raw = (2.0 * (mu_eff - 2.0 + 1.0 / mu_eff)) / ((n_f + 2.0).powi(2) + mu_eff);
        let c_mu = c_mu_raw.clamp(0.0, 1.0 - c_1);

        let chi_n = n_f.sqrt() * (1.0 - 1.0 / (4.0 * n_f) + 1.0 / (21.0 * n_f * n_f));

        Self {
            n,
            lambda,
            mu,
            weights,
            mu_eff,
            c_sigma,
            d_sigma,
            c_c,
            c_1,
            c_mu,
            chi_n,
        }
    }
}

/// The mutable CMA-ES distribution state.
struct CmaEsAlgorithm {
    mean: DVector<f64>,
    sigma: f64,
    /// Covariance matrix.
    c: DMatrix<f64>,
    p_sigma: DVector<f64>,
    p_c: DVector<f64>,
    /// Eigenvectors of C (columns of B).
    b: DMatrix<f64>,
    /// Sqrt of eigenvalues of C (diagonal of D).
    d: DVector<f64>,
    inv_sqrt_c: DMatrix<f64>,
    generation: usize,
    constants: CmaEsConstants,
}

impl CmaEsAlgorithm {
    #[allow(clippy::cast_precision_loss)]
    fn new(dimensions: &[Dimension<'_>], sigma0: Option<f64>, user_lambda: Option<usize>) -> Self {
        let n = dimensions.len();
        let constants = CmaEsConstants::new(n, user_lambda);

        // Start at the center of the box
        let mean = DVector::from_fn(n, |i, _| f64::midpoint(dimensions[i].low, dimensions[i].high));
        let total_range: f64 = dimensions.iter().map(|d| d.high - d.low).sum();
        let sigma = sigma0.unwrap_or_else(|| {
            let auto = (total_range / n as f64) / 4.0;
            if auto > 0.0 { auto } else { 1.0 }
        });

        Self {
            mean,
            sigma,
            c: DMatrix::identity(n, n),
            p_sigma: DVector::zeros(n),
            p_c: DVector::zeros(n),
            b: DMatrix::identity(n, n),
            d: DVector::from_element(n, 1.0),
            inv_sqrt_c: DMatrix::identity(n, n),
            generation: 0,
            constants,
        }
    }

    /// Sample a candidate inside the box, clipping after 100 rejected draws.
    fn sample_with_rejection(
        &self,
        rng: &mut fastrand::Rng,
        dimensions: &[Dimension<'_>],
    ) -> DVector<f64> {
        let n = self.constants.n;
        let draw = |rng: &mut fastrand::Rng| {
            let z = DVector::from_fn(n, |_, _| rng_util::standard_normal(rng));
            &self.mean + self.sigma * (&self.b * self.d.component_mul(&z))
        };

        for _ in 0..100 {
            let x = draw(rng);
            if is_within_bounds(&x, dimensions) {
                return x;
            }
        }

        let mut x = draw(rng);
        clip_to_bounds(&mut x, dimensions);
        x
    }

    /// Run one CMA-ES update from a generation ranked best first.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap
    )]
    fn update(&mut self, ranked: &[&DVector<f64>]) {
        let n = self.constants.n;
        let mu = self.constants.mu;
        let sigma = self.sigma;
        let k = &self.constants;

        let mut new_mean = DVector::zeros(n);
        for (w, &x) in k.weights.iter().zip(ranked.iter().take(mu)) {
            new_mean += *w * x;
        }
        let mean_diff = &new_mean - &self.mean;

        // Step-size path
        let whitened = &self.inv_sqrt_c * &mean_diff / sigma;
        self.p_sigma = (1.0 - k.c_sigma) * &self.p_sigma
            + (k.c_sigma * (2.0 - k.c_sigma) * k.mu_eff).sqrt() * &whitened;

        let p_sigma_norm = self.p_sigma.norm();
        let threshold = (1.0 - (1.0 - k.c_sigma).powi(2 * (self.generation as i32 + 1))).sqrt()
            * (1.4 + 2.0 / (n as f64 + 1.0))
            * k.chi_n;
        let h_sigma = if p_sigma_norm < threshold { 1.0 } else { 0.0 };

        // Covariance path
        self.p_c = (1.0 - k.c_c) * &self.p_c
            + h_sigma * (k.c_c * (2.0 - k.c_c) * k.mu_eff).sqrt() * &mean_diff / sigma;

        let delta_h = (1.0 - h_sigma) * k.c_c * (2.0 - k.c_c);
        let old_c_weight = 1.0 - k.c_1 - k.c_mu + k.c_1 * delta_h;
        let rank_one = k.c_1 * &self.p_c * self.p_c.transpose();

        let mut rank_mu = DMatrix::zeros(n, n);
        for (w, &x) in k.weights.iter().zip(ranked.iter().take(mu)) {
            let y = (x - &self.mean) / sigma;
            rank_mu += *w * &y * y.transpose();
        }

        self.c = old_c_weight * &self.c + rank_one + k.c_mu * rank_mu;

        self.sigma *= ((k.c_sigma / k.d_sigma) * (p_sigma_norm / k.chi_n - 1.0)).exp();
        self.sigma = self.sigma.clamp(1e-20, 1e10);

        self.mean = new_mean;
        self.generation += 1;
        self.update_eigen();
    }

    /// Refresh B, D and C^{-1/2} from the covariance matrix.
    fn update_eigen(&mut self) {
        let n = self.constants.n;

        self.c = (&self.c + self.c.transpose()) / 2.0;
        let eigen = self.c.clone().symmetric_eigen();

        self.d = DVector::from_fn(n, |i, _| eigen.eigenvalues[i].max(1e-20).sqrt());
        self.b = eigen.eigenvectors;

        let d_inv = DMatrix::from_diagonal(&self.d.map(|v| 1.0 / v));
        self.inv_sqrt_c = &self.b * d_inv * self.b.transpose();
    }
}

fn is_within_bounds(x: &DVector<f64>, dimensions: &[Dimension<'_>]) -> bool {
    dimensions
        .iter()
        .enumerate()
        .all(|(i, d)| x[i] >= d.low && x[i] <= d.high)
}

fn clip_to_bounds(x: &mut DVector<f64>, dimensions: &[Dimension<'_>]) {
    for (i, d) in dimensions.iter().enumerate() {
        x[i] = x[i].clamp(d.low, d.high);
    }
}

/// Snap a raw coordinate onto the parameter's domain.
#[allow(clippy::cast_precision_loss)]
fn snap(value: f64, distribution: &Distribution) -> f64 {
    match distribution {
        Distribution::SteppedContinuous(d) => match d.step {
            Some(step) => rng_util::snap_float(value, d.low, d.high, step),
            None => value.clamp(d.low, d.high),
        },
        Distribution::Int(d) | Distribution::SteppedInt(d) => {
            rng_util::snap_int(value, d.low, d.high, d.step.unwrap_or(1)) as f64
        }
        Distribution::Continuous(d) => value.clamp(d.low, d.high),
        Distribution::Categorical(_) => value,
    }
}

impl RelativeSampler for CmaEsSampler {
    fn sample_relative(
        &self,
        study: &Study,
        _trial: &FrozenTrial,
        search_space: &SearchSpace,
    ) -> Result<HashMap<String, f64>> {
        let mut dimensions = Vec::new();
        for (name, distribution) in search_space.iter() {
            if let Some((low, high)) = distribution.internal_bounds() {
                distribution.validate()?;
                dimensions.push(Dimension {
                    name,
                    distribution,
                    low,
                    high,
                });
            }
        }
        if dimensions.is_empty() {
            return Ok(HashMap::new());
        }

        let mut algo = CmaEsAlgorithm::new(&dimensions, self.sigma0, self.population_size);

        // Completed trials that cover every numeric dimension, in registry order
        let direction = study.direction();
        let observations: Vec<(DVector<f64>, f64)> = study
            .completed_trials()
            .filter_map(|t| {
                let coords = dimensions
                    .iter()
                    .map(|d| {
                        t.internal_param(d.name)
                            .filter(|&v| v >= d.low && v <= d.high)
                    })
                    .collect::<Option<Vec<f64>>>()?;
                Some((DVector::from_vec(coords), direction.normalize(t.value)))
            })
            .collect();

        for generation in observations.chunks_exact(algo.constants.lambda) {
            let mut ranked: Vec<&(DVector<f64>, f64)> = generation.iter().collect();
            ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(core::cmp::Ordering::Equal));
            let ranked_xs: Vec<&DVector<f64>> = ranked.iter().map(|(x, _)| x).collect();
            algo.update(&ranked_xs);
        }

        let x = algo.sample_with_rejection(&mut self.rng.lock(), &dimensions);
        Ok(dimensions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.to_owned(), snap(x[i], d.distribution)))
            .collect())
    }
}
