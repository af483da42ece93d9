#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the request itself is absent or malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Returned when the objective type is neither minimize nor maximize.
    #[error("unsupported objective type: {0}")]
    UnsupportedObjectiveType(String),

    /// Returned when a parameter kind is outside the four recognized kinds.
    #[error("unsupported parameter type for '{name}': {kind}")]
    UnsupportedParameterType {
        /// The parameter name.
        name: String,
        /// The rejected kind.
        kind: String,
    },

    /// Returned when a bound, step, seed, metric or assignment fails to parse.
    #[error("malformed numeric literal {literal:?} for {context}: {reason}")]
    MalformedNumericLiteral {
        /// What was being parsed (e.g. `"max of 'lr'"`).
        context: String,
        /// The offending text.
        literal: String,
        /// The parser's message.
        reason: String,
    },

    /// Returned when a trial start or completion time fails to parse.
    #[error("malformed timestamp {literal:?} for {context}: {reason}")]
    MalformedTimestamp {
        /// Which timestamp was being parsed.
        context: String,
        /// The offending text.
        literal: String,
        /// The parser's message.
        reason: String,
    },

    /// Returned when a trial condition is outside the five recognized values.
    #[error("unknown trial condition: {0}")]
    UnknownTrialCondition(String),

    /// Returned when an assignment value is not one of the declared choices.
    #[error("invalid categorical assignment {value:?}: not one of {choices:?}")]
    InvalidCategoricalAssignment {
        /// The rejected value.
        value: String,
        /// The declared choices.
        choices: Vec<String>,
    },

    /// Returned when an internal categorical index has no matching choice.
    #[error("categorical index {index} out of range for {n_choices} choices")]
    CategoricalIndexOutOfRange {
        /// The decoded index.
        index: f64,
        /// The number of declared choices.
        n_choices: usize,
    },

    /// Returned when the sampler factory cannot configure a backend.
    #[error("failed to create sampler for algorithm '{algorithm}': {source}")]
    SamplerCreation {
        /// The requested algorithm name.
        algorithm: String,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// Returned when the study cannot be created.
    #[error("failed to create study: {source}")]
    StudyCreation {
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// Returned when a historical trial cannot be converted or registered.
    #[error("failed to import trial #{index} ({name}): {source}")]
    TrialImport {
        /// Position of the trial in the request history.
        index: usize,
        /// The trial's external name.
        name: String,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// Returned when a sampler fails while producing a suggestion.
    #[error("sampler failed on trial {trial_id}: {source}")]
    SamplerInvocation {
        /// The internal id of the trial being sampled.
        trial_id: u64,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// Returned when the caller cancelled the request or its deadline passed.
    #[error("request cancelled")]
    Cancelled,

    /// Returned when the lower bound is greater than the upper bound.
    #[error("invalid bounds: low ({low}) must be less than or equal to high ({high})")]
    InvalidBounds {
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when step size is not positive.
    #[error("invalid step: step must be positive")]
    InvalidStep,

    /// Returned when categorical choices are empty.
    #[error("categorical choices cannot be empty")]
    EmptyChoices,

    /// Returned when gamma is not in the valid range (0.0, 1.0).
    #[error("invalid gamma: {0} must be in (0.0, 1.0)")]
    InvalidGamma(f64),

    /// Returned when bandwidth is not positive.
    #[error("invalid bandwidth: {0} must be positive")]
    InvalidBandwidth(f64),

    /// Returned when KDE is created with empty samples.
    #[error("KDE requires at least one sample")]
    EmptySamples,

    /// Returned when a sampler setting is out of its valid range.
    #[error("invalid setting '{name}': {reason}")]
    InvalidSetting {
        /// The setting name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl Error {
    /// A stable machine-readable code for this error kind.
    ///
    /// Wrapped collaborator failures report the wrapper's code, never the
    /// inner one.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::UnsupportedObjectiveType(_) => "UnsupportedObjectiveType",
            Self::UnsupportedParameterType { .. } => "UnsupportedParameterType",
            Self::MalformedNumericLiteral { .. } => "MalformedNumericLiteral",
            Self::MalformedTimestamp { .. } => "MalformedTimestamp",
            Self::UnknownTrialCondition(_) => "UnknownTrialCondition",
            Self::InvalidCategoricalAssignment { .. } => "InvalidCategoricalAssignment",
            Self::SamplerCreation { .. } => "SamplerCreationFailure",
            Self::StudyCreation { .. } => "StudyCreationFailure",
            Self::TrialImport { .. } => "TrialImportFailure",
            Self::SamplerInvocation { .. } => "SamplerInvocationFailure",
            Self::Cancelled => "Cancelled",
            Self::CategoricalIndexOutOfRange { .. }
            | Self::InvalidBounds { .. }
            | Self::InvalidStep
            | Self::EmptyChoices
            | Self::InvalidGamma(_)
            | Self::InvalidBandwidth(_)
            | Self::EmptySamples
            | Self::InvalidSetting { .. }
            | Self::Internal(_) => "Internal",
        }
    }

    pub(crate) fn malformed_number(
        context: impl Into<String>,
        literal: &str,
        reason: impl core::fmt::Display,
    ) -> Self {
        Self::MalformedNumericLiteral {
            context: context.into(),
            literal: literal.to_owned(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_outer_code() {
        let err = Error::SamplerInvocation {
            trial_id: 3,
            source: Box::new(Error::EmptyChoices),
        };
        assert_eq!(err.code(), "SamplerInvocationFailure");
        let source = core::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "categorical choices cannot be empty");
    }

    #[test]
    fn test_malformed_number_message() {
        let err = Error::malformed_number("max of 'lr'", "abc", "invalid float literal");
        assert_eq!(err.code(), "MalformedNumericLiteral");
        assert!(err.to_string().contains("\"abc\""));
        assert!(err.to_string().contains("max of 'lr'"));
    }
}
