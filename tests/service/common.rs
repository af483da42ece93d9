use suggestion::api::{
    AlgorithmSetting, Experiment, FeasibleSpace, GetSuggestionsReply, GetSuggestionsRequest,
    Metric, ObjectiveType, ParameterAssignment, ParameterSpec, ParameterType, Trial,
    TrialCondition,
};
use suggestion::{CancelToken, Result, SuggestionService};

pub fn double(name: &str, min: &str, max: &str) -> ParameterSpec {
    ParameterSpec {
        name: name.to_owned(),
        parameter_type: ParameterType::Double,
        feasible_space: FeasibleSpace {
            min: min.to_owned(),
            max: max.to_owned(),
            ..FeasibleSpace::default()
        },
    }
}

pub fn int(name: &str, min: &str, max: &str, step: &str) -> ParameterSpec {
    ParameterSpec {
        name: name.to_owned(),
        parameter_type: ParameterType::Int,
        feasible_space: FeasibleSpace {
            min: min.to_owned(),
            max: max.to_owned(),
            step: step.to_owned(),
            list: Vec::new(),
        },
    }
}

pub fn categorical(name: &str, choices: &[&str]) -> ParameterSpec {
    ParameterSpec {
        name: name.to_owned(),
        parameter_type: ParameterType::Categorical,
        feasible_space: FeasibleSpace {
            list: choices.iter().map(|&c| c.to_owned()).collect(),
            ..FeasibleSpace::default()
        },
    }
}

pub fn experiment(
    objective: ObjectiveType,
    algorithm: &str,
    settings: &[(&str, &str)],
    parameters: Vec<ParameterSpec>,
) -> Experiment {
    let mut experiment = Experiment {
        name: "demo".to_owned(),
        ..Experiment::default()
    };
    experiment.spec.objective.objective_type = objective;
    experiment.spec.objective.objective_metric_name = "accuracy".to_owned();
    experiment.spec.algorithm.algorithm_name = algorithm.to_owned();
    experiment.spec.algorithm.algorithm_setting = settings
        .iter()
        .map(|&(name, value)| AlgorithmSetting {
            name: name.to_owned(),
            value: value.to_owned(),
        })
        .collect();
    experiment.spec.parameter_specs.parameters = parameters;
    experiment
}

pub fn trial(condition: TrialCondition, accuracy: &str, params: &[(&str, &str)]) -> Trial {
    let mut trial = Trial {
        name: "trial".to_owned(),
        ..Trial::default()
    };
    trial.status.condition = condition;
    trial.status.start_time = "2024-03-01T10:00:00.000000001Z".to_owned();
    trial.status.completion_time = "2024-03-01T10:30:00Z".to_owned();
    trial.status.observation.metrics.push(Metric {
        name: "accuracy".to_owned(),
        value: accuracy.to_owned(),
    });
    trial.spec.parameter_assignments.assignments = params
        .iter()
        .map(|&(name, value)| ParameterAssignment::new(name, value))
        .collect();
    trial
}

pub fn request(experiment: Experiment, trials: Vec<Trial>, n: i32) -> GetSuggestionsRequest {
    GetSuggestionsRequest {
        experiment: Some(experiment),
        trials,
        request_number: n,
    }
}

pub fn call(request: &GetSuggestionsRequest) -> Result<GetSuggestionsReply> {
    SuggestionService::new().get_suggestions(request, &CancelToken::new())
}

/// The value assigned to `name` in every assignment set of `reply`.
pub fn values(reply: &GetSuggestionsReply, name: &str) -> Vec<String> {
    reply
        .parameter_assignments
        .iter()
        .map(|set| {
            set.assignments
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.clone())
                .unwrap_or_else(|| panic!("missing assignment for {name}"))
        })
        .collect()
}
