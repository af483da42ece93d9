use std::sync::Arc;

use crate::distribution::SearchSpace;
use crate::error::{Error, Result};
use crate::sampler::random::RandomSampler;
use crate::sampler::{IndependentSampler, RelativeSampler, Samplers};
use crate::storage::MemoryStorage;
use crate::types::Direction;

use super::Study;

/// A builder for constructing [`Study`] instances with a fluent API.
///
/// Created via [`Study::builder()`].
///
/// # Defaults
///
/// - Name: `"suggestion"`
/// - Direction: [`Minimize`](Direction::Minimize)
/// - Search space: empty
/// - Independent sampler: [`RandomSampler`]
/// - Relative sampler: none
///
/// # Examples
///
/// ```
/// use suggestion::Study;
/// use suggestion::sampler::tpe::TpeSampler;
///
/// let study = Study::builder()
///     .maximize()
///     .sampler(TpeSampler::new())
///     .build()
///     .unwrap();
/// assert_eq!(study.direction(), suggestion::Direction::Maximize);
/// ```
pub struct StudyBuilder {
    name: String,
    direction: Direction,
    search_space: SearchSpace,
    sampler: Option<Arc<dyn IndependentSampler>>,
    relative_sampler: Option<Arc<dyn RelativeSampler>>,
}

impl StudyBuilder {
    pub(super) fn new() -> Self {
        Self {
            name: "suggestion".to_owned(),
            direction: Direction::Minimize,
            search_space: SearchSpace::new(),
            sampler: None,
            relative_sampler: None,
        }
    }

    /// Set the study name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the optimization direction to minimize (the default).
    #[must_use]
    pub fn minimize(mut self) -> Self {
        self.direction = Direction::Minimize;
        self
    }

    /// Set the optimization direction to maximize.
    #[must_use]
    pub fn maximize(mut self) -> Self {
        self.direction = Direction::Maximize;
        self
    }

    /// Set the optimization direction explicitly.
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the search space.
    #[must_use]
    pub fn search_space(mut self, search_space: SearchSpace) -> Self {
        self.search_space = search_space;
        self
    }

    /// Set the per-parameter sampler.
    ///
    /// Defaults to [`RandomSampler`] if not specified.
    #[must_use]
    pub fn sampler(mut self, sampler: impl IndependentSampler + 'static) -> Self {
        self.sampler = Some(Arc::new(sampler));
        self
    }

    /// Set the joint sampler.
    #[must_use]
    pub fn relative_sampler(mut self, sampler: impl RelativeSampler + 'static) -> Self {
        self.relative_sampler = Some(Arc::new(sampler));
        self
    }

    /// Install both slots of a sampler pairing.
    ///
    /// Empty slots leave the current setting untouched.
    #[must_use]
    pub fn samplers(mut self, samplers: Samplers) -> Self {
        if let Some(independent) = samplers.independent {
            self.sampler = Some(independent);
        }
        if let Some(relative) = samplers.relative {
            self.relative_sampler = Some(relative);
        }
        self
    }

    /// Build the [`Study`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns `Error::StudyCreation` if a distribution in the search space
    /// describes an empty domain.
    pub fn build(self) -> Result<Study> {
        for (_, distribution) in self.search_space.iter() {
            distribution.validate().map_err(|e| Error::StudyCreation {
                source: Box::new(e),
            })?;
        }

        let sampler = self
            .sampler
            .unwrap_or_else(|| Arc::new(RandomSampler::new()));

        Ok(Study {
            id: 0,
            name: self.name,
            direction: self.direction,
            search_space: Arc::new(self.search_space),
            sampler,
            relative_sampler: self.relative_sampler,
            storage: MemoryStorage::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Distribution;

    #[test]
    fn test_build_rejects_empty_domains() {
        let mut space = SearchSpace::new();
        space.insert("x", Distribution::continuous(1.0, 0.0));
        let err = Study::builder().search_space(space).build().unwrap_err();
        assert!(matches!(err, Error::StudyCreation { .. }));
        assert_eq!(err.code(), "StudyCreationFailure");
    }

    #[test]
    fn test_samplers_keep_default_when_slot_empty() {
        let study = Study::builder()
            .samplers(Samplers::default())
            .build()
            .unwrap();
        assert!(study.relative_sampler().is_none());
    }
}
