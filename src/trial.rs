//! Frozen (immutable) trial records held by a study.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::distribution::SearchSpace;
use crate::param::ParamValue;
use crate::types::TrialState;

/// An internal snapshot of a trial's state, timing and parameter values.
///
/// Imported trials are built once and never mutated; the study's storage
/// owns its own copy. `value` is only meaningful when `state` is
/// [`TrialState::Complete`].
#[derive(Clone, Debug)]
pub struct FrozenTrial {
    /// Registry id, assigned by the study storage on registration.
    pub id: u64,
    /// Id of the study the trial belongs to.
    pub study_id: u64,
    /// Sequence number of the trial within its study.
    pub number: u64,
    /// Lifecycle state.
    pub state: TrialState,
    /// Objective value (zero unless the trial is complete).
    pub value: f64,
    /// When the trial started, if known.
    pub datetime_start: Option<DateTime<Utc>>,
    /// When the trial finished, if known.
    pub datetime_complete: Option<DateTime<Utc>>,
    /// Sampler-facing values, keyed by parameter name.
    pub internal_params: HashMap<String, f64>,
    /// Caller-facing values, keyed by parameter name.
    pub params: HashMap<String, ParamValue>,
    /// The search space the parameters were sampled under.
    pub distributions: Arc<SearchSpace>,
}

impl FrozenTrial {
    /// Creates a running trial with no parameters.
    #[must_use]
    pub fn running(id: u64, study_id: u64, distributions: Arc<SearchSpace>) -> Self {
        Self {
            id,
            study_id,
            number: id,
            state: TrialState::Running,
            value: 0.0,
            datetime_start: Some(Utc::now()),
            datetime_complete: None,
            internal_params: HashMap::new(),
            params: HashMap::new(),
            distributions,
        }
    }

    /// Returns the internal value of `name`, if the trial has one.
    #[must_use]
    pub fn internal_param(&self, name: &str) -> Option<f64> {
        self.internal_params.get(name).copied()
    }

    /// Returns `true` for complete trials with a usable objective value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == TrialState::Complete
    }
}
