//! Parameter distribution types and the ordered search space.

use crate::error::{Error, Result};

/// Continuous range `[low, high]`, optionally discretized by `step`.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatDistribution {
    /// Lower bound (inclusive).
    pub low: f64,
    /// Upper bound (inclusive).
    pub high: f64,
    /// Optional step size for discretization.
    pub step: Option<f64>,
}

/// Integer range `[low, high]`, optionally discretized by `step`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntDistribution {
    /// Lower bound (inclusive).
    pub low: i64,
    /// Upper bound (inclusive).
    pub high: i64,
    /// Optional step size for discretization.
    pub step: Option<i64>,
}

/// Ordered list of string choices.
///
/// The order defines the internal index encoding: choice `i` is
/// represented as `i as f64`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoricalDistribution {
    /// The declared choices, order preserved.
    pub choices: Vec<String>,
}

/// Enum wrapping all parameter distribution types.
#[derive(Clone, Debug, PartialEq)]
pub enum Distribution {
    /// A continuous range without a step.
    Continuous(FloatDistribution),
    /// A continuous range discretized by a step.
    SteppedContinuous(FloatDistribution),
    /// An integer range without a step.
    Int(IntDistribution),
    /// An integer range discretized by a step.
    SteppedInt(IntDistribution),
    /// A categorical choice list (also used for discrete-choice parameters).
    Categorical(CategoricalDistribution),
}

impl Distribution {
    /// `ContinuousRange(low, high)`.
    #[must_use]
    pub fn continuous(low: f64, high: f64) -> Self {
        Self::Continuous(FloatDistribution {
            low,
            high,
            step: None,
        })
    }

    /// `SteppedContinuousRange(low, high, step)`.
    #[must_use]
    pub fn stepped_continuous(low: f64, high: f64, step: f64) -> Self {
        Self::SteppedContinuous(FloatDistribution {
            low,
            high,
            step: Some(step),
        })
    }

    /// `IntegerRange(low, high)`.
    #[must_use]
    pub fn int(low: i64, high: i64) -> Self {
        Self::Int(IntDistribution {
            low,
            high,
            step: None,
        })
    }

    /// `SteppedIntegerRange(low, high, step)`.
    #[must_use]
    pub fn stepped_int(low: i64, high: i64, step: i64) -> Self {
        Self::SteppedInt(IntDistribution {
            low,
            high,
            step: Some(step),
        })
    }

    /// `Categorical(choices)`.
    pub fn categorical<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Categorical(CategoricalDistribution {
            choices: choices.into_iter().map(Into::into).collect(),
        })
    }

    /// Returns `true` for the range kinds a numeric optimizer can model.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Categorical(_))
    }

    /// Internal-space bounds, or `None` for categorical distributions.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn internal_bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::Continuous(d) | Self::SteppedContinuous(d) => Some((d.low, d.high)),
            Self::Int(d) | Self::SteppedInt(d) => Some((d.low as f64, d.high as f64)),
            Self::Categorical(_) => None,
        }
    }

    /// Check that the distribution describes a non-empty domain.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidBounds` when `low > high` or a float bound is not
    /// finite, `Error::InvalidStep` for a non-positive step and
    /// `Error::EmptyChoices` for a categorical distribution without choices.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Continuous(d) | Self::SteppedContinuous(d) => {
                if !d.low.is_finite() || !d.high.is_finite() || d.low > d.high {
                    return Err(Error::InvalidBounds {
                        low: d.low,
                        high: d.high,
                    });
                }
                if let Some(step) = d.step
                    && !(step > 0.0 && step.is_finite())
                {
                    return Err(Error::InvalidStep);
                }
            }
            Self::Int(d) | Self::SteppedInt(d) => {
                if d.low > d.high {
                    return Err(Error::InvalidBounds {
                        low: d.low as f64,
                        high: d.high as f64,
                    });
                }
                if let Some(step) = d.step
                    && step <= 0
                {
                    return Err(Error::InvalidStep);
                }
            }
            Self::Categorical(d) => {
                if d.choices.is_empty() {
                    return Err(Error::EmptyChoices);
                }
            }
        }
        Ok(())
    }

    /// Returns `true` if the internal value lies inside this domain.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn contains_internal(&self, value: f64) -> bool {
        match self {
            Self::Categorical(d) => {
                value >= 0.0 && value.fract() == 0.0 && value < d.choices.len() as f64
            }
            _ => self
                .internal_bounds()
                .is_some_and(|(low, high)| (low..=high).contains(&value)),
        }
    }
}

/// The full set of named distributions for one request.
///
/// Iteration follows the order in which names were first inserted, which
/// keeps seeded suggestion sequences reproducible. Inserting an existing
/// name replaces its distribution in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchSpace {
    entries: Vec<(String, Distribution)>,
}

impl SearchSpace {
    /// Creates an empty search space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a distribution, returning the one it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        distribution: Distribution,
    ) -> Option<Distribution> {
        let name = name.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            return Some(core::mem::replace(existing, distribution));
        }
        self.entries.push((name, distribution));
        None
    }

    /// Look up the distribution for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Distribution> {
        self.entries
            .iter()
            .find_map(|(n, d)| (n == name).then_some(d))
    }

    /// Returns `true` if `name` is part of the search space.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the search space has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, distribution)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Distribution)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// The subset of numeric (non-categorical) parameters, order preserved.
    #[must_use]
    pub fn numeric(&self) -> Self {
        self.iter()
            .filter(|(_, d)| d.is_numeric())
            .map(|(n, d)| (n.to_owned(), d.clone()))
            .collect()
    }
}

impl FromIterator<(String, Distribution)> for SearchSpace {
    fn from_iter<T: IntoIterator<Item = (String, Distribution)>>(iter: T) -> Self {
        let mut space = Self::new();
        for (name, distribution) in iter {
            space.insert(name, distribution);
        }
        space
    }
}
