//! Conversion from wire types into the optimizer's model.
//!
//! | Function | Input | Output |
//! |----------|-------|--------|
//! | [`to_direction`] | objective type | [`Direction`](crate::Direction) |
//! | [`create_samplers`] | algorithm spec | [`Samplers`](crate::sampler::Samplers) |
//! | [`build_search_space`] | parameter specs | [`SearchSpace`](crate::SearchSpace) |
//! | [`import_trials`] | trial history | [`FrozenTrial`](crate::FrozenTrial)s |

mod algorithm;
mod direction;
mod history;
mod search_space;

pub use algorithm::{SamplerSettings, create_samplers};
pub use direction::to_direction;
pub use history::{import_trials, register_trials, to_trial_state};
pub use search_space::build_search_space;
