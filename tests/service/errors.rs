use suggestion::api::{GetSuggestionsRequest, ObjectiveType, ParameterType, TrialCondition};
use suggestion::{CancelToken, Error, SuggestionService};

use crate::common::{call, categorical, double, experiment, int, request, trial, values};

fn code_of(request: &GetSuggestionsRequest) -> &'static str {
    call(request).unwrap_err().code()
}

fn lr_request(algorithm: &str, settings: &[(&str, &str)]) -> GetSuggestionsRequest {
    let experiment = experiment(
        ObjectiveType::Maximize,
        algorithm,
        settings,
        vec![double("lr", "0.01", "0.1")],
    );
    request(experiment, Vec::new(), 1)
}

#[test]
fn test_unknown_objective() {
    let experiment = experiment(
        ObjectiveType::Unknown,
        "random",
        &[],
        vec![double("lr", "0.01", "0.1")],
    );
    assert_eq!(
        code_of(&request(experiment, Vec::new(), 1)),
        "UnsupportedObjectiveType"
    );
}

#[test]
fn test_unknown_parameter_type() {
    let mut spec = double("lr", "0.01", "0.1");
    spec.parameter_type = ParameterType::UnknownType;
    let experiment = experiment(ObjectiveType::Maximize, "random", &[], vec![spec]);
    assert_eq!(
        code_of(&request(experiment, Vec::new(), 1)),
        "UnsupportedParameterType"
    );
}

#[test]
fn test_malformed_literals() {
    let bad_double = experiment(
        ObjectiveType::Maximize,
        "random",
        &[],
        vec![double("lr", "0.01", "ten")],
    );
    assert_eq!(
        code_of(&request(bad_double, Vec::new(), 1)),
        "MalformedNumericLiteral"
    );

    let bad_int = experiment(
        ObjectiveType::Maximize,
        "random",
        &[],
        vec![int("layers", "1", "8", "two")],
    );
    assert_eq!(
        code_of(&request(bad_int, Vec::new(), 1)),
        "MalformedNumericLiteral"
    );

    assert_eq!(
        code_of(&lr_request("random", &[("random_state", "seven")])),
        "MalformedNumericLiteral"
    );

    let mut req = lr_request("random", &[]);
    req.trials = vec![trial(TrialCondition::Succeeded, "high", &[("lr", "0.05")])];
    assert_eq!(code_of(&req), "MalformedNumericLiteral");

    let mut req = lr_request("random", &[]);
    req.trials = vec![trial(TrialCondition::Succeeded, "0.5", &[("lr", "fast")])];
    assert_eq!(code_of(&req), "MalformedNumericLiteral");
}

#[test]
fn test_malformed_timestamps() {
    let mut record = trial(TrialCondition::Succeeded, "0.5", &[("lr", "0.05")]);
    record.status.start_time = "yesterday".to_owned();
    let mut req = lr_request("random", &[]);
    req.trials = vec![record];
    assert_eq!(code_of(&req), "MalformedTimestamp");

    let mut record = trial(TrialCondition::Succeeded, "0.5", &[("lr", "0.05")]);
    record.status.completion_time.clear();
    req.trials = vec![record];
    assert_eq!(code_of(&req), "MalformedTimestamp");

    // Unfinished trials may omit their completion time
    let mut record = trial(TrialCondition::Running, "0.5", &[("lr", "0.05")]);
    record.status.completion_time.clear();
    req.trials = vec![record];
    assert!(call(&req).is_ok());
}

#[test]
fn test_unknown_condition() {
    let mut req = lr_request("random", &[]);
    req.trials = vec![trial(TrialCondition::Unknown, "0.5", &[("lr", "0.05")])];
    assert_eq!(code_of(&req), "UnknownTrialCondition");
}

#[test]
fn test_invalid_categorical_assignment() {
    let experiment = experiment(
        ObjectiveType::Maximize,
        "random",
        &[],
        vec![categorical("optimizer", &["sgd", "adam"])],
    );
    let history = vec![trial(
        TrialCondition::Succeeded,
        "0.5",
        &[("optimizer", "lbfgs")],
    )];
    assert_eq!(
        code_of(&request(experiment, history, 1)),
        "InvalidCategoricalAssignment"
    );
}

#[test]
fn test_sampler_creation_failure() {
    assert_eq!(
        code_of(&lr_request("tpe", &[("gamma", "1.5")])),
        "SamplerCreationFailure"
    );
    assert_eq!(
        code_of(&lr_request("cmaes", &[("population_size", "1")])),
        "SamplerCreationFailure"
    );
}

#[test]
fn test_study_creation_failure() {
    let experiment = experiment(
        ObjectiveType::Maximize,
        "random",
        &[],
        vec![double("lr", "0.1", "0.01")],
    );
    assert_eq!(
        code_of(&request(experiment, Vec::new(), 1)),
        "StudyCreationFailure"
    );
}

#[test]
fn test_infinite_bound_fails_study_creation() {
    let experiment = experiment(
        ObjectiveType::Maximize,
        "random",
        &[],
        vec![double("lr", "0.01", "inf")],
    );
    assert_eq!(
        code_of(&request(experiment, Vec::new(), 1)),
        "StudyCreationFailure"
    );
}

#[test]
fn test_full_i64_stepped_range_samples() {
    let experiment = experiment(
        ObjectiveType::Maximize,
        "random",
        &[("random_state", "4")],
        vec![int(
            "offset",
            "-9223372036854775808",
            "9223372036854775807",
            "2",
        )],
    );
    let reply = call(&request(experiment, Vec::new(), 8)).unwrap();
    for value in values(&reply, "offset") {
        let value: i64 = value.parse().unwrap();
        assert_eq!(value % 2, 0, "offset = {value}");
    }
}

#[test]
fn test_invalid_requests() {
    let missing = GetSuggestionsRequest {
        request_number: 1,
        ..GetSuggestionsRequest::default()
    };
    assert_eq!(code_of(&missing), "InvalidRequest");

    let mut negative = lr_request("random", &[]);
    negative.request_number = -2;
    assert_eq!(code_of(&negative), "InvalidRequest");
}

#[test]
fn test_cancelled_token_stops_the_batch() {
    let token = CancelToken::new();
    token.cancel();
    let err = SuggestionService::new()
        .get_suggestions(&lr_request("random", &[]), &token)
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[test]
fn test_first_failure_wins() {
    // Objective is resolved before parameters are parsed
    let experiment = experiment(
        ObjectiveType::Unknown,
        "random",
        &[],
        vec![double("lr", "0.01", "ten")],
    );
    assert_eq!(
        code_of(&request(experiment, Vec::new(), 1)),
        "UnsupportedObjectiveType"
    );
}
