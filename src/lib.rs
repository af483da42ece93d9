#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Hyperparameter suggestion service. Given an experiment's search space,
//! objective and algorithm choice together with the full history of
//! evaluated trials, it proposes the next parameter assignments to try.
//!
//! Every request is self-contained: the search space, the study and its
//! trial registry are built from the request and dropped with the reply.
//!
//! # Getting Started
//!
//! ```
//! use suggestion::prelude::*;
//!
//! let mut space = SearchSpace::new();
//! space.insert("lr", Distribution::continuous(0.01, 0.1));
//! space.insert("optimizer", Distribution::categorical(["sgd", "adam"]));
//!
//! let mut study = Study::builder()
//!     .maximize()
//!     .search_space(space)
//!     .sampler(TpeSampler::builder().seed(1).build().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let batch = suggest(&mut study, 3, &CancelToken::new()).unwrap();
//! assert_eq!(batch.len(), 3);
//! for assignment in &batch {
//!     for (name, value) in assignment {
//!         println!("{name} = {value}");
//!     }
//! }
//! ```
//!
//! # Pipeline
//!
//! | Stage | Function | Produces |
//! |-------|----------|----------|
//! | Direction resolver | [`convert::to_direction`] | [`Direction`] |
//! | Sampler factory | [`convert::create_samplers`] | [`Samplers`](sampler::Samplers) |
//! | Search-space builder | [`convert::build_search_space`] | [`SearchSpace`] |
//! | History importer | [`convert::register_trials`] | registered [`FrozenTrial`]s |
//! | Suggestion loop | [`suggest()`] | one assignment per requested trial |
//!
//! [`SuggestionService`] runs the whole pipeline for a wire request.
//!
//! # Algorithms
//!
//! | Name | Sampler | Capability |
//! |------|---------|------------|
//! | `random` (and any unknown name) | [`RandomSampler`](sampler::random::RandomSampler) | independent |
//! | `tpe` | [`TpeSampler`](sampler::tpe::TpeSampler) | independent |
//! | `cmaes` | [`CmaEsSampler`](sampler::cma_es::CmaEsSampler) | relative (numeric parameters) |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) | off |
//! | `server` | `suggestion-server` binary, [`config`] and `server` modules (enables `tracing`) | on |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::error!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_error {
    ($($arg:tt)*) => { tracing::error!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_error {
    ($($arg:tt)*) => {};
}

pub mod api;
mod cancel;
mod codec;
#[cfg(feature = "server")]
pub mod config;
pub mod convert;
mod distribution;
mod error;
mod kde;
mod param;
mod rng_util;
pub mod sampler;
#[cfg(feature = "server")]
pub mod server;
mod service;
mod storage;
mod study;
mod suggest;
mod trial;
mod types;

pub use cancel::CancelToken;
pub use codec::{decode, encode, parse_external, to_internal_repr};
pub use distribution::{
    CategoricalDistribution, Distribution, FloatDistribution, IntDistribution, SearchSpace,
};
pub use error::{Error, Result};
pub use param::ParamValue;
pub use service::SuggestionService;
pub use storage::MemoryStorage;
pub use study::{Study, StudyBuilder};
pub use suggest::{Assignment, suggest};
pub use trial::FrozenTrial;
pub use types::{Direction, TrialState};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use suggestion::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cancel::CancelToken;
    pub use crate::distribution::{Distribution, SearchSpace};
    pub use crate::error::{Error, Result};
    pub use crate::param::ParamValue;
    pub use crate::sampler::cma_es::CmaEsSampler;
    pub use crate::sampler::random::RandomSampler;
    pub use crate::sampler::tpe::TpeSampler;
    pub use crate::sampler::{IndependentSampler, RelativeSampler, Samplers};
    pub use crate::service::SuggestionService;
    pub use crate::study::{Study, StudyBuilder};
    pub use crate::suggest::{Assignment, suggest};
    pub use crate::trial::FrozenTrial;
    pub use crate::types::{Direction, TrialState};
}
