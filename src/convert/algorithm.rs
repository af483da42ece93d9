use std::sync::Arc;

use crate::api::AlgorithmSpec;
use crate::error::{Error, Result};
use crate::sampler::Samplers;
use crate::sampler::cma_es::CmaEsSampler;
use crate::sampler::random::RandomSampler;
use crate::sampler::tpe::TpeSampler;

/// Algorithm settings parsed from their `(name, value)` text form.
///
/// Unknown setting names are ignored. Known ones are parsed eagerly so a
/// malformed configuration fails before any sampling work begins.
#[derive(Clone, Debug, PartialEq)]
pub enum SamplerSettings {
    /// Uniform random search (any unrecognized algorithm name).
    Random {
        /// `random_state`.
        seed: Option<u64>,
    },
    /// Tree-Parzen Estimator (`"tpe"`).
    Tpe {
        /// `random_state`.
        seed: Option<u64>,
        /// `n_startup_trials`.
        n_startup_trials: Option<usize>,
        /// `n_ei_candidates`.
        n_ei_candidates: Option<usize>,
        /// `gamma`.
        gamma: Option<f64>,
    },
    /// CMA-ES (`"cmaes"`).
    CmaEs {
        /// `random_state`.
        seed: Option<u64>,
        /// `sigma`.
        sigma: Option<f64>,
        /// `population_size`.
        population_size: Option<usize>,
    },
}

impl SamplerSettings {
    /// Parse the settings of `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedNumericLiteral` when a recognized setting
    /// does not parse as its numeric type.
    pub fn parse(algorithm: &AlgorithmSpec) -> Result<Self> {
        let mut seed = None;
        let mut n_startup_trials = None;
        let mut n_ei_candidates = None;
        let mut gamma = None;
        let mut sigma = None;
        let mut population_size = None;

        let name = algorithm.algorithm_name.as_str();
        for setting in &algorithm.algorithm_setting {
            let value = setting.value.as_str();
            match (name, setting.name.as_str()) {
                (_, "random_state") => seed = Some(parse_seed(value)?),
                ("tpe", "n_startup_trials") => {
                    n_startup_trials = Some(parse_setting(name, "n_startup_trials", value)?);
                }
                ("tpe", "n_ei_candidates") => {
                    n_ei_candidates = Some(parse_setting(name, "n_ei_candidates", value)?);
                }
                ("tpe", "gamma") => gamma = Some(parse_setting(name, "gamma", value)?),
                ("cmaes", "sigma") => sigma = Some(parse_setting(name, "sigma", value)?),
                ("cmaes", "population_size") => {
                    population_size = Some(parse_setting(name, "population_size", value)?);
                }
                _ => {}
            }
        }

        Ok(match name {
            "tpe" => Self::Tpe {
                seed,
                n_startup_trials,
                n_ei_candidates,
                gamma,
            },
            "cmaes" => Self::CmaEs {
                seed,
                sigma,
                population_size,
            },
            _ => Self::Random { seed },
        })
    }

    /// The `random_state` seed, if one was given.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        match *self {
            Self::Random { seed } | Self::Tpe { seed, .. } | Self::CmaEs { seed, .. } => seed,
        }
    }

    /// Instantiate the sampler pairing for these settings.
    ///
    /// # Errors
    ///
    /// Returns the backend's validation error when a setting is out of range.
    pub fn build(&self) -> Result<Samplers> {
        Ok(match *self {
            Self::Random { seed } => Samplers {
                independent: Some(Arc::new(RandomSampler::from_seed(seed))),
                relative: None,
            },
            Self::Tpe {
                seed,
                n_startup_trials,
                n_ei_candidates,
                gamma,
            } => {
                let mut builder = TpeSampler::builder().seed_opt(seed);
                if let Some(n) = n_startup_trials {
                    builder = builder.n_startup_trials(n);
                }
                if let Some(n) = n_ei_candidates {
                    builder = builder.n_ei_candidates(n);
                }
                if let Some(g) = gamma {
                    builder = builder.gamma(g);
                }
                Samplers {
                    independent: Some(Arc::new(builder.build()?)),
                    relative: None,
                }
            }
            Self::CmaEs {
                seed,
                sigma,
                population_size,
            } => {
                let mut builder = CmaEsSampler::builder().seed_opt(seed);
                if let Some(s) = sigma {
                    builder = builder.sigma0(s);
                }
                if let Some(p) = population_size {
                    builder = builder.population_size(p);
                }
                Samplers {
                    independent: None,
                    relative: Some(Arc::new(builder.build()?)),
                }
            }
        })
    }

    /// Like [`build`](Self::build), with failures reported against `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns `Error::SamplerCreation` when a backend rejects its configuration.
    pub fn create(&self, algorithm: &str) -> Result<Samplers> {
        self.build().map_err(|e| Error::SamplerCreation {
            algorithm: algorithm.to_owned(),
            source: Box::new(e),
        })
    }
}

/// Resolve an algorithm spec into a configured sampler pairing.
///
/// `"cmaes"` yields a relative sampler only, `"tpe"` an independent TPE
/// sampler, and every other name (including `""` and `"random"`) an
/// independent random sampler.
///
/// # Errors
///
/// Returns `Error::MalformedNumericLiteral` for unparsable settings and
/// `Error::SamplerCreation` when a backend rejects its configuration.
pub fn create_samplers(algorithm: &AlgorithmSpec) -> Result<Samplers> {
    SamplerSettings::parse(algorithm)?.create(&algorithm.algorithm_name)
}

/// Seeds are signed 64-bit integers on the wire; negative ones wrap.
#[allow(clippy::cast_sign_loss)]
fn parse_seed(value: &str) -> Result<u64> {
    value
        .parse::<i64>()
        .map(|seed| seed as u64)
        .map_err(|e| Error::malformed_number("setting 'random_state'", value, e))
}

fn parse_setting<T>(algorithm: &str, name: &str, value: &str) -> Result<T>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| Error::malformed_number(format!("{algorithm} setting '{name}'"), value, e))
}
