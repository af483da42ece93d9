//! Request-scoped study: a search space, a sampler pairing and a trial registry.

use std::sync::Arc;

use crate::distribution::SearchSpace;
use crate::error::Result;
use crate::param::ParamValue;
use crate::sampler::{IndependentSampler, RelativeSampler};
use crate::storage::MemoryStorage;
use crate::trial::FrozenTrial;
use crate::types::Direction;

mod builder;

pub use builder::StudyBuilder;

/// A study holds everything the suggestion loop needs for one request.
///
/// Studies are built per request, populated with the imported history and
/// dropped once the reply is assembled. Trials are stored in an in-memory
/// arena whose ids autoincrement from zero.
///
/// # Examples
///
/// ```
/// use suggestion::{Direction, Distribution, SearchSpace, Study};
///
/// let mut space = SearchSpace::new();
/// space.insert("lr", Distribution::continuous(0.01, 0.05));
///
/// let study = Study::builder()
///     .direction(Direction::Maximize)
///     .search_space(space)
///     .build()
///     .unwrap();
/// assert_eq!(study.direction(), Direction::Maximize);
/// assert!(study.trials().is_empty());
/// ```
pub struct Study {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) direction: Direction,
    pub(crate) search_space: Arc<SearchSpace>,
    pub(crate) sampler: Arc<dyn IndependentSampler>,
    pub(crate) relative_sampler: Option<Arc<dyn RelativeSampler>>,
    pub(crate) storage: MemoryStorage,
}

impl Study {
    /// Create a builder for configuring a study.
    #[must_use]
    pub fn builder() -> StudyBuilder {
        StudyBuilder::new()
    }

    /// The study's id within its storage.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The study's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The optimization direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The search space every suggestion is drawn from.
    #[must_use]
    pub fn search_space(&self) -> &SearchSpace {
        &self.search_space
    }

    /// The per-parameter sampler.
    #[must_use]
    pub fn sampler(&self) -> &Arc<dyn IndependentSampler> {
        &self.sampler
    }

    /// The joint sampler, if the algorithm has one.
    #[must_use]
    pub fn relative_sampler(&self) -> Option<&Arc<dyn RelativeSampler>> {
        self.relative_sampler.as_ref()
    }

    /// All trials in registry order.
    #[must_use]
    pub fn trials(&self) -> &[FrozenTrial] {
        self.storage.trials()
    }

    /// Completed trials in registry order.
    pub fn completed_trials(&self) -> impl Iterator<Item = &FrozenTrial> {
        self.trials().iter().filter(|t| t.is_complete())
    }

    /// Look up a trial by id.
    #[must_use]
    pub fn trial(&self, id: u64) -> Option<&FrozenTrial> {
        self.storage.get_trial(id)
    }

    /// A fresh running trial bound to this study and its search space.
    ///
    /// The trial is not registered; pass it to [`clone_trial`](Self::clone_trial)
    /// once it has been filled in.
    #[must_use]
    pub fn new_frozen_trial(&self) -> FrozenTrial {
        FrozenTrial::running(0, self.id, Arc::clone(&self.search_space))
    }

    /// Register a copy of `trial` and return its id.
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` if the trial belongs to another study or
    /// has a parameter without a distribution.
    pub fn clone_trial(&mut self, trial: &FrozenTrial) -> Result<u64> {
        self.storage.clone_trial(self.id, trial)
    }

    /// Register a new running trial and return its id.
    pub fn create_new_trial(&mut self) -> u64 {
        let study_id = self.id;
        let space = Arc::clone(&self.search_space);
        self.storage
            .create_new_trial(|id| FrozenTrial::running(id, study_id, space))
    }

    /// Record a sampled value on a running trial.
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` if the trial is unknown or already finished.
    pub fn set_trial_param(
        &mut self,
        trial_id: u64,
        name: &str,
        internal: f64,
        external: ParamValue,
    ) -> Result<()> {
        self.storage
            .set_trial_param(trial_id, name, internal, external)
    }
}

impl core::fmt::Debug for Study {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Study")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("direction", &self.direction)
            .field("n_params", &self.search_space.len())
            .field("n_trials", &self.trials().len())
            .field("has_relative_sampler", &self.relative_sampler.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Distribution;
    use crate::error::Error;
    use crate::types::TrialState;

    fn study() -> Study {
        let mut space = SearchSpace::new();
        space.insert("x", Distribution::int(0, 10));
        Study::builder().name("demo").search_space(space).build().unwrap()
    }

    #[test]
    fn test_defaults() {
        let study = study();
        assert_eq!(study.id(), 0);
        assert_eq!(study.name(), "demo");
        assert_eq!(study.direction(), Direction::Minimize);
        assert!(study.relative_sampler().is_none());
    }

    #[test]
    fn test_completed_trials_filter_and_order() {
        let mut study = study();
        for (i, state) in [TrialState::Complete, TrialState::Fail, TrialState::Complete]
            .into_iter()
            .enumerate()
        {
            let mut trial = study.new_frozen_trial();
            trial.state = state;
            trial.value = f64::from(u8::try_from(i).unwrap());
            study.clone_trial(&trial).unwrap();
        }
        let values: Vec<f64> = study.completed_trials().map(|t| t.value).collect();
        assert_eq!(values, vec![0.0, 2.0]);
    }

    #[test]
    fn test_new_trials_follow_imported_ones() {
        let mut study = study();
        let mut done = study.new_frozen_trial();
        done.state = TrialState::Complete;
        study.clone_trial(&done).unwrap();

        let id = study.create_new_trial();
        assert_eq!(id, 1);
        study
            .set_trial_param(id, "x", 3.0, ParamValue::Int(3))
            .unwrap();
        assert_eq!(study.trial(id).unwrap().params["x"], ParamValue::Int(3));
        assert!(matches!(
            study.set_trial_param(0, "x", 3.0, ParamValue::Int(3)),
            Err(Error::Internal(_))
        ));
    }
}
