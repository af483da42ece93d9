use chrono::{DateTime, Utc};

use crate::api::{Trial, TrialCondition};
use crate::codec;
use crate::error::{Error, Result};
use crate::study::Study;
use crate::trial::FrozenTrial;
use crate::types::TrialState;

/// Map a trial condition onto an internal trial state.
///
/// # Errors
///
/// Returns `Error::UnknownTrialCondition` for an unrecognized condition.
pub fn to_trial_state(condition: TrialCondition) -> Result<TrialState> {
    match condition {
        TrialCondition::Created => Ok(TrialState::Waiting),
        TrialCondition::Running => Ok(TrialState::Running),
        TrialCondition::Succeeded => Ok(TrialState::Complete),
        TrialCondition::Killed | TrialCondition::Failed => Ok(TrialState::Fail),
        TrialCondition::Unknown => Err(Error::UnknownTrialCondition(format!("{condition:?}"))),
    }
}

/// Convert the trial history into frozen trials bound to `study`.
///
/// Trials keep their input order and get position-based ids. Only complete
/// trials carry an objective value: the last observation of `metric_name`.
/// Assignments to parameters outside the search space are skipped.
///
/// # Errors
///
/// Returns the first conversion failure: `Error::MalformedTimestamp`,
/// `Error::UnknownTrialCondition`, `Error::MalformedNumericLiteral` or
/// `Error::InvalidCategoricalAssignment`.
pub fn import_trials(
    history: &[Trial],
    metric_name: &str,
    study: &Study,
) -> Result<Vec<FrozenTrial>> {
    history
        .iter()
        .enumerate()
        .map(|(i, t)| import_trial(i as u64, t, metric_name, study))
        .collect()
}

/// Convert the trial history and register it into `study`.
///
/// Returns the number of registered trials.
///
/// # Errors
///
/// Conversion failures are returned as-is (see [`import_trials`]);
/// registration failures are wrapped in `Error::TrialImport`.
pub fn register_trials(study: &mut Study, history: &[Trial], metric_name: &str) -> Result<usize> {
    let trials = import_trials(history, metric_name, study)?;
    for (index, (trial, external)) in trials.iter().zip(history).enumerate() {
        study
            .clone_trial(trial)
            .map_err(|e| Error::TrialImport {
                index,
                name: external.name.clone(),
                source: Box::new(e),
            })?;
    }
    Ok(trials.len())
}

fn import_trial(
    position: u64,
    trial: &Trial,
    metric_name: &str,
    study: &Study,
) -> Result<FrozenTrial> {
    let status = &trial.status;
    let datetime_start = parse_timestamp(&trial.name, "start time", &status.start_time)?;
    let datetime_complete =
        parse_timestamp(&trial.name, "completion time", &status.completion_time)?;
    let state = to_trial_state(status.condition)?;

    if state == TrialState::Complete && datetime_complete.is_none() {
        return Err(Error::MalformedTimestamp {
            context: format!("completion time of succeeded trial '{}'", trial.name),
            literal: String::new(),
            reason: "missing".to_owned(),
        });
    }

    let mut value = 0.0;
    if state == TrialState::Complete
        && let Some(metric) = status
            .observation
            .metrics
            .iter()
            .rev()
            .find(|m| m.name == metric_name)
    {
        value = metric.value.parse::<f64>().map_err(|e| {
            Error::malformed_number(
                format!("metric '{metric_name}' of trial '{}'", trial.name),
                &metric.value,
                e,
            )
        })?;
    }

    let mut frozen = study.new_frozen_trial();
    frozen.id = position;
    frozen.number = position;
    frozen.state = state;
    frozen.value = value;
    frozen.datetime_start = datetime_start;
    frozen.datetime_complete = datetime_complete;

    let space = study.search_space();
    for assignment in &trial.spec.parameter_assignments.assignments {
        let Some(distribution) = space.get(&assignment.name) else {
            continue;
        };
        let (internal, external) =
            codec::to_internal_repr(&assignment.name, distribution, &assignment.value)?;
        frozen.internal_params.insert(assignment.name.clone(), internal);
        frozen.params.insert(assignment.name.clone(), external);
    }

    Ok(frozen)
}

/// Empty text means "not recorded".
fn parse_timestamp(trial: &str, which: &str, text: &str) -> Result<Option<DateTime<Utc>>> {
    if text.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(text)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|e| Error::MalformedTimestamp {
            context: format!("{which} of trial '{trial}'"),
            literal: text.to_owned(),
            reason: e.to_string(),
        })
}
