//! Request-scoped trial registry.
//!
//! Trials live in a plain `Vec` whose index is the trial id, so ids are
//! assigned by autoincrement and lookups are O(1). A storage belongs to a
//! single [`Study`](crate::Study) and is dropped with it; it is never shared
//! across requests, which is why no locking is involved.

use crate::error::{Error, Result};
use crate::param::ParamValue;
use crate::trial::FrozenTrial;
use crate::types::TrialState;

/// In-memory arena of [`FrozenTrial`] records.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    trials: Vec<FrozenTrial>,
}

impl MemoryStorage {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `trial` into the registry under a freshly assigned id.
    ///
    /// The stored copy gets `id == number == position`; everything else is
    /// taken over unchanged. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` if the trial belongs to another study or
    /// carries a parameter without a distribution.
    pub fn clone_trial(&mut self, study_id: u64, trial: &FrozenTrial) -> Result<u64> {
        if trial.study_id != study_id {
            return Err(Error::Internal("trial belongs to a different study"));
        }
        if trial
            .internal_params
            .keys()
            .any(|name| !trial.distributions.contains(name))
        {
            return Err(Error::Internal("trial parameter has no distribution"));
        }

        let id = self.next_trial_id();
        let mut stored = trial.clone();
        stored.id = id;
        stored.number = id;
        self.trials.push(stored);
        Ok(id)
    }

    /// Append a new running trial and return its id.
    pub fn create_new_trial(&mut self, make: impl FnOnce(u64) -> FrozenTrial) -> u64 {
        let id = self.next_trial_id();
        self.trials.push(make(id));
        id
    }

    /// Look up a trial by id.
    #[must_use]
    pub fn get_trial(&self, id: u64) -> Option<&FrozenTrial> {
        usize::try_from(id).ok().and_then(|i| self.trials.get(i))
    }

    /// Record a sampled parameter on a trial that is still running.
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` if the trial does not exist or has already
    /// finished.
    pub fn set_trial_param(
        &mut self,
        id: u64,
        name: &str,
        internal: f64,
        external: ParamValue,
    ) -> Result<()> {
        let trial = usize::try_from(id)
            .ok()
            .and_then(|i| self.trials.get_mut(i))
            .ok_or(Error::Internal("unknown trial id"))?;
        if trial.state != TrialState::Running {
            return Err(Error::Internal("cannot set a parameter on a finished trial"));
        }
        trial.internal_params.insert(name.to_owned(), internal);
        trial.params.insert(name.to_owned(), external);
        Ok(())
    }

    /// All registered trials, in id order.
    #[must_use]
    pub fn trials(&self) -> &[FrozenTrial] {
        &self.trials
    }

    fn next_trial_id(&self) -> u64 {
        self.trials.len() as u64
    }
}
