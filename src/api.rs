//! Wire types for the two service operations.
//!
//! Field names follow the snake_case JSON mapping of the experiment manager's
//! message definitions. Every numeric quantity (bounds, steps, metric values,
//! assignments) crosses the boundary as decimal text. All fields default when
//! absent, so partially filled requests deserialize and fail later with a
//! typed error instead of a parse error.

use serde::{Deserialize, Serialize};

/// Objective type of an experiment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectiveType {
    /// Smaller metric values are better.
    Minimize,
    /// Larger metric values are better.
    Maximize,
    /// Not set, or not a recognized value.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Kind of a tunable parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterType {
    /// Continuous range.
    Double,
    /// Integer range.
    Int,
    /// Discrete list of numeric values.
    Discrete,
    /// List of string choices.
    Categorical,
    /// Not set, or not a recognized value.
    #[default]
    #[serde(other)]
    UnknownType,
}

/// Condition of a trial reported by the experiment manager.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrialCondition {
    /// Created but not yet running.
    #[default]
    Created,
    /// Running.
    Running,
    /// Finished and reported its metrics.
    Succeeded,
    /// Stopped by the controller.
    Killed,
    /// Finished with an error.
    Failed,
    /// Not a recognized value.
    #[serde(other)]
    Unknown,
}

/// Domain of one parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeasibleSpace {
    /// Upper bound (decimal text).
    pub max: String,
    /// Lower bound (decimal text).
    pub min: String,
    /// Choices for categorical and discrete parameters.
    pub list: Vec<String>,
    /// Optional step (decimal text, empty when absent).
    pub step: String,
}

/// One tunable parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSpec {
    /// Parameter name, unique within a request.
    pub name: String,
    /// Parameter kind.
    pub parameter_type: ParameterType,
    /// Parameter domain.
    pub feasible_space: FeasibleSpace,
}

/// Wrapper around the parameter list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSpecs {
    /// The parameters, in declaration order.
    pub parameters: Vec<ParameterSpec>,
}

/// A `(name, value)` algorithm setting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmSetting {
    /// Setting name.
    pub name: String,
    /// Setting value as text.
    pub value: String,
}

/// Early-stopping configuration placeholder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyStoppingSpec {}

/// Search algorithm and its settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmSpec {
    /// Algorithm name (`"random"`, `"tpe"`, `"cmaes"`).
    pub algorithm_name: String,
    /// Settings, in declaration order.
    pub algorithm_setting: Vec<AlgorithmSetting>,
    /// Early-stopping placeholder.
    pub early_stopping_spec: EarlyStoppingSpec,
}

/// Optimization objective.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveSpec {
    /// Whether to minimize or maximize.
    #[serde(rename = "type")]
    pub objective_type: ObjectiveType,
    /// Optional goal value.
    pub goal: Option<f64>,
    /// The metric that carries the objective value.
    pub objective_metric_name: String,
    /// Metrics collected alongside the objective.
    pub additional_metric_names: Vec<String>,
}

/// Experiment definition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentSpec {
    /// The search space.
    pub parameter_specs: ParameterSpecs,
    /// The objective.
    pub objective: ObjectiveSpec,
    /// The search algorithm.
    pub algorithm: AlgorithmSpec,
    /// Maximum number of trials running at once.
    pub parallel_trial_count: i32,
    /// Maximum number of trials in total.
    pub max_trial_count: i32,
}

/// An experiment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experiment {
    /// Experiment name.
    pub name: String,
    /// Experiment definition.
    pub spec: ExperimentSpec,
}

/// A named metric value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metric {
    /// Metric name.
    pub name: String,
    /// Metric value as text.
    pub value: String,
}

/// Metrics reported by a trial, in reporting order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Observation {
    /// The reported metrics.
    pub metrics: Vec<Metric>,
}

/// Runtime status of a trial.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialStatus {
    /// RFC 3339 start time, empty when unknown.
    pub start_time: String,
    /// RFC 3339 completion time, empty when unknown.
    pub completion_time: String,
    /// Current condition.
    pub condition: TrialCondition,
    /// Reported metrics.
    pub observation: Observation,
}

/// A `(name, value)` parameter assignment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterAssignment {
    /// Parameter name.
    pub name: String,
    /// Assigned value as text.
    pub value: String,
}

impl ParameterAssignment {
    /// Creates an assignment.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One complete assignment set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterAssignments {
    /// One assignment per parameter.
    pub assignments: Vec<ParameterAssignment>,
}

/// Definition of a trial.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialSpec {
    /// Name of the owning experiment.
    pub experiment_name: String,
    /// Parameter values the trial was run with.
    pub parameter_assignments: ParameterAssignments,
}

/// A previously created trial.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trial {
    /// Trial name.
    pub name: String,
    /// Trial definition.
    pub spec: TrialSpec,
    /// Trial status.
    pub status: TrialStatus,
}

/// Request for [`SuggestionService::get_suggestions`](crate::SuggestionService::get_suggestions).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetSuggestionsRequest {
    /// The experiment to suggest for.
    pub experiment: Option<Experiment>,
    /// The full trial history.
    pub trials: Vec<Trial>,
    /// Number of assignment sets to produce.
    pub request_number: i32,
}

/// Reply of [`SuggestionService::get_suggestions`](crate::SuggestionService::get_suggestions).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetSuggestionsReply {
    /// One assignment set per requested trial.
    pub parameter_assignments: Vec<ParameterAssignments>,
    /// Algorithm echo.
    pub algorithm: AlgorithmSpec,
}

/// Request for
/// [`SuggestionService::validate_algorithm_settings`](crate::SuggestionService::validate_algorithm_settings).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateAlgorithmSettingsRequest {
    /// The experiment whose algorithm settings are checked.
    pub experiment: Option<Experiment>,
}

/// Reply of
/// [`SuggestionService::validate_algorithm_settings`](crate::SuggestionService::validate_algorithm_settings).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateAlgorithmSettingsReply {}
