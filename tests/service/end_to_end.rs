use suggestion::api::{ObjectiveType, TrialCondition};
use suggestion::convert::{build_search_space, import_trials};
use suggestion::{ParamValue, Study};

use crate::common::{call, categorical, double, experiment, int, request, trial, values};

#[test]
fn test_seeded_random_is_in_bounds_and_repeatable() {
    let experiment = experiment(
        ObjectiveType::Maximize,
        "random",
        &[("random_state", "1")],
        vec![double("lr", "0.01", "0.1")],
    );
    let request = request(experiment, Vec::new(), 2);

    let first = call(&request).unwrap();
    assert_eq!(first.parameter_assignments.len(), 2);
    let lr = values(&first, "lr");
    for value in &lr {
        let value: f64 = value.parse().unwrap();
        assert!((0.01..=0.1).contains(&value), "lr = {value}");
    }

    let second = call(&request).unwrap();
    assert_eq!(values(&second, "lr"), lr);
}

#[test]
fn test_categorical_history_imports_as_index() {
    let parameters = vec![categorical("optimizer", &["sgd", "adam"])];
    let space = build_search_space(&parameters).unwrap();
    let study = Study::builder().maximize().search_space(space).build().unwrap();

    let history = vec![trial(
        TrialCondition::Succeeded,
        "0.9",
        &[("optimizer", "adam")],
    )];
    let imported = import_trials(&history, "accuracy", &study).unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].internal_param("optimizer"), Some(1.0));
    assert_eq!(
        imported[0].params["optimizer"],
        ParamValue::Categorical("adam".to_owned())
    );
    assert!((imported[0].value - 0.9).abs() < 1e-12);

    let experiment = experiment(ObjectiveType::Maximize, "tpe", &[], parameters);
    let reply = call(&request(experiment, history, 1)).unwrap();
    let optimizer = values(&reply, "optimizer");
    assert!(optimizer[0] == "sgd" || optimizer[0] == "adam");
}

#[test]
fn test_every_set_covers_the_whole_space() {
    let experiment = experiment(
        ObjectiveType::Minimize,
        "random",
        &[("random_state", "7")],
        vec![
            double("lr", "0.001", "0.1"),
            int("layers", "1", "9", "2"),
            categorical("optimizer", &["sgd", "adam", "rmsprop"]),
        ],
    );
    let reply = call(&request(experiment, Vec::new(), 6)).unwrap();
    assert_eq!(reply.parameter_assignments.len(), 6);

    for set in &reply.parameter_assignments {
        let names: Vec<&str> = set.assignments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["lr", "layers", "optimizer"]);
    }
    for layers in values(&reply, "layers") {
        let layers: i64 = layers.parse().unwrap();
        assert!((1..=9).contains(&layers) && layers % 2 == 1, "layers = {layers}");
    }
    for optimizer in values(&reply, "optimizer") {
        assert!(["sgd", "adam", "rmsprop"].contains(&optimizer.as_str()));
    }
}

#[test]
fn test_zero_requested_is_empty() {
    let experiment = experiment(
        ObjectiveType::Minimize,
        "random",
        &[],
        vec![double("lr", "0.01", "0.1")],
    );
    let reply = call(&request(experiment, Vec::new(), 0)).unwrap();
    assert!(reply.parameter_assignments.is_empty());
}

#[test]
fn test_reply_echoes_empty_algorithm() {
    let experiment = experiment(
        ObjectiveType::Maximize,
        "tpe",
        &[("random_state", "3"), ("gamma", "0.3")],
        vec![double("lr", "0.01", "0.1")],
    );
    let reply = call(&request(experiment, Vec::new(), 1)).unwrap();
    assert!(reply.algorithm.algorithm_name.is_empty());
    assert!(reply.algorithm.algorithm_setting.is_empty());
}
