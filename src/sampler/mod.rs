//! Sampler traits and algorithm backends.
//!
//! Two capabilities are distinguished:
//!
//! | Trait | Produces | Used as |
//! |-------|----------|---------|
//! | [`IndependentSampler`] | one parameter at a time | per-parameter fallback |
//! | [`RelativeSampler`] | a (possibly partial) joint assignment | first pass of every round |
//!
//! | Sampler | Capability | Algorithm |
//! |---------|------------|-----------|
//! | [`RandomSampler`](random::RandomSampler) | independent | uniform random |
//! | [`TpeSampler`](tpe::TpeSampler) | independent | Tree-Parzen Estimator |
//! | [`CmaEsSampler`](cma_es::CmaEsSampler) | relative | CMA-ES |

pub mod cma_es;
pub mod random;
pub mod tpe;

use std::collections::HashMap;
use std::sync::Arc;

use crate::distribution::{Distribution, SearchSpace};
use crate::error::Result;
use crate::study::Study;
use crate::trial::FrozenTrial;

/// Samples a single parameter value in internal representation.
///
/// Implementations must be `Send + Sync` so a configured study can be moved
/// onto a blocking worker thread.
pub trait IndependentSampler: Send + Sync {
    /// Sample the internal value of `name` for `trial`.
    ///
    /// # Errors
    ///
    /// Returns an error if `distribution` describes an empty domain or the
    /// algorithm cannot produce a value.
    fn sample(
        &self,
        study: &Study,
        trial: &FrozenTrial,
        name: &str,
        distribution: &Distribution,
    ) -> Result<f64>;
}

/// Samples several parameters jointly in internal representation.
pub trait RelativeSampler: Send + Sync {
    /// Sample values for `trial` over `search_space`.
    ///
    /// The returned map may cover only a subset of `search_space`; the
    /// remaining parameters are filled in by the independent sampler.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm cannot produce a candidate.
    fn sample_relative(
        &self,
        study: &Study,
        trial: &FrozenTrial,
        search_space: &SearchSpace,
    ) -> Result<HashMap<String, f64>>;
}

/// The sampler pairing produced for one algorithm configuration.
///
/// Either slot may be empty; a study built from a pairing without an
/// independent sampler falls back to uniform random sampling.
#[derive(Clone, Default)]
pub struct Samplers {
    /// Per-parameter sampler.
    pub independent: Option<Arc<dyn IndependentSampler>>,
    /// Joint sampler.
    pub relative: Option<Arc<dyn RelativeSampler>>,
}

impl core::fmt::Debug for Samplers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Samplers")
            .field("has_independent", &self.independent.is_some())
            .field("has_relative", &self.relative.is_some())
            .finish()
    }
}
