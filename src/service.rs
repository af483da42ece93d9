//! The two service operations.

use crate::api::{
    AlgorithmSpec, GetSuggestionsReply, GetSuggestionsRequest, ParameterAssignment,
    ParameterAssignments, ValidateAlgorithmSettingsReply, ValidateAlgorithmSettingsRequest,
};
use crate::cancel::CancelToken;
use crate::convert::{SamplerSettings, build_search_space, register_trials, to_direction};
use crate::error::{Error, Result};
use crate::sampler::random::RandomSampler;
use crate::study::Study;
use crate::suggest::suggest;

/// Stateless suggestion service.
///
/// Every call builds its own study from the request and drops it before
/// returning, so one service value can serve concurrent requests.
///
/// # Examples
///
/// ```
/// use suggestion::api::{
///     AlgorithmSetting, Experiment, FeasibleSpace, GetSuggestionsRequest, ObjectiveType,
///     ParameterSpec, ParameterType,
/// };
/// use suggestion::{CancelToken, SuggestionService};
///
/// let mut experiment = Experiment::default();
/// experiment.spec.objective.objective_type = ObjectiveType::Maximize;
/// experiment.spec.algorithm.algorithm_name = "random".into();
/// experiment.spec.algorithm.algorithm_setting.push(AlgorithmSetting {
///     name: "random_state".into(),
///     value: "1".into(),
/// });
/// experiment.spec.parameter_specs.parameters.push(ParameterSpec {
///     name: "lr".into(),
///     parameter_type: ParameterType::Double,
///     feasible_space: FeasibleSpace {
///         min: "0.01".into(),
///         max: "0.1".into(),
///         ..FeasibleSpace::default()
///     },
/// });
///
/// let request = GetSuggestionsRequest {
///     experiment: Some(experiment),
///     trials: Vec::new(),
///     request_number: 2,
/// };
/// let reply = SuggestionService::new()
///     .get_suggestions(&request, &CancelToken::new())
///     .unwrap();
/// assert_eq!(reply.parameter_assignments.len(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SuggestionService;

#[allow(clippy::unused_self)]
impl SuggestionService {
    /// Creates the service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Produce `request_number` new assignment sets for the experiment.
    ///
    /// The reply echoes an empty algorithm spec.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRequest` when the experiment is missing or the
    /// requested count is negative, and otherwise the first conversion,
    /// study, import or sampling failure.
    pub fn get_suggestions(
        &self,
        request: &GetSuggestionsRequest,
        cancel: &CancelToken,
    ) -> Result<GetSuggestionsReply> {
        Self::try_get_suggestions(request, cancel)
            .inspect_err(|err| log_failure("GetSuggestions", err))
    }

    /// Accept any algorithm settings.
    #[must_use]
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn validate_algorithm_settings(
        &self,
        request: &ValidateAlgorithmSettingsRequest,
    ) -> ValidateAlgorithmSettingsReply {
        trace_debug!(
            algorithm = request
                .experiment
                .as_ref()
                .map_or("", |e| e.spec.algorithm.algorithm_name.as_str()),
            "accepted algorithm settings"
        );
        ValidateAlgorithmSettingsReply {}
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn try_get_suggestions(
        request: &GetSuggestionsRequest,
        cancel: &CancelToken,
    ) -> Result<GetSuggestionsReply> {
        let experiment = request
            .experiment
            .as_ref()
            .ok_or_else(|| Error::InvalidRequest("missing experiment".to_owned()))?;
        let count = usize::try_from(request.request_number).map_err(|_| {
            Error::InvalidRequest(format!(
                "request_number must not be negative, got {}",
                request.request_number
            ))
        })?;
        let spec = &experiment.spec;

        let direction = to_direction(spec.objective.objective_type)?;
        let settings = SamplerSettings::parse(&spec.algorithm)?;
        let samplers = settings.create(&spec.algorithm.algorithm_name)?;
        let search_space = build_search_space(&spec.parameter_specs.parameters)?;
        trace_info!(search_space = ?search_space, "built search space");

        let mut study = Study::builder()
            .name(experiment.name.clone())
            .direction(direction)
            .search_space(search_space)
            .sampler(RandomSampler::from_seed(settings.seed()))
            .samplers(samplers)
            .build()?;

        let n_trials = register_trials(
            &mut study,
            &request.trials,
            &spec.objective.objective_metric_name,
        )?;
        trace_debug!(n_trials, "registered trial history");

        let batch = suggest(&mut study, count, cancel)?;
        let parameter_assignments: Vec<ParameterAssignments> = batch
            .into_iter()
            .map(|assignment| ParameterAssignments {
                assignments: assignment
                    .into_iter()
                    .map(|(name, value)| ParameterAssignment::new(name, value.to_string()))
                    .collect(),
            })
            .collect();
        trace_info!(assignments = ?parameter_assignments, "produced suggestions");

        Ok(GetSuggestionsReply {
            parameter_assignments,
            algorithm: AlgorithmSpec::default(),
        })
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_failure(operation: &str, err: &Error) {
    trace_error!(operation, code = err.code(), error = %err, "request failed");
}
