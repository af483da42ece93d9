use suggestion::api::{GetSuggestionsRequest, ObjectiveType, Trial, TrialCondition};

use crate::common::{call, categorical, double, experiment, int, request, trial, values};

fn history(n: usize) -> Vec<Trial> {
    (0..n)
        .map(|i| {
            let lr = 0.01 + 0.09 * (i as f64) / (n as f64);
            let accuracy = 1.0 - (lr - 0.04).abs();
            let optimizer = if i % 3 == 0 { "adam" } else { "sgd" };
            let (lr, layers) = (lr.to_string(), (1 + 2 * (i % 4)).to_string());
            trial(
                TrialCondition::Succeeded,
                &accuracy.to_string(),
                &[
                    ("lr", lr.as_str()),
                    ("layers", layers.as_str()),
                    ("optimizer", optimizer),
                ],
            )
        })
        .collect()
}

fn mixed_request(
    algorithm: &str,
    settings: &[(&str, &str)],
    n_history: usize,
) -> GetSuggestionsRequest {
    let experiment = experiment(
        ObjectiveType::Maximize,
        algorithm,
        settings,
        vec![
            double("lr", "0.01", "0.1"),
            int("layers", "1", "7", "2"),
            categorical("optimizer", &["sgd", "adam"]),
        ],
    );
    request(experiment, history(n_history), 4)
}

fn assert_in_domain(req: &GetSuggestionsRequest) {
    let reply = call(req).unwrap();
    assert_eq!(reply.parameter_assignments.len(), 4);
    for lr in values(&reply, "lr") {
        let lr: f64 = lr.parse().unwrap();
        assert!((0.01..=0.1).contains(&lr), "lr = {lr}");
    }
    for layers in values(&reply, "layers") {
        assert!(["1", "3", "5", "7"].contains(&layers.as_str()), "layers = {layers}");
    }
    for optimizer in values(&reply, "optimizer") {
        assert!(["sgd", "adam"].contains(&optimizer.as_str()));
    }
}

#[test]
fn test_every_algorithm_stays_in_domain() {
    for algorithm in ["random", "tpe", "cmaes", "", "grid"] {
        for n_history in [0, 3, 30] {
            assert_in_domain(&mixed_request(algorithm, &[("random_state", "11")], n_history));
        }
    }
}

#[test]
fn test_seeded_algorithms_are_deterministic() {
    for algorithm in ["random", "tpe", "cmaes"] {
        let req = mixed_request(algorithm, &[("random_state", "42")], 20);
        let first = call(&req).unwrap();
        let second = call(&req).unwrap();
        assert_eq!(first, second, "{algorithm} is not reproducible");
    }
}

#[test]
fn test_tpe_settings_are_honoured() {
    let req = mixed_request(
        "tpe",
        &[
            ("random_state", "5"),
            ("n_startup_trials", "2"),
            ("n_ei_candidates", "8"),
            ("gamma", "0.2"),
        ],
        12,
    );
    assert_in_domain(&req);
}

#[test]
fn test_cmaes_settings_are_honoured() {
    let req = mixed_request(
        "cmaes",
        &[("random_state", "5"), ("sigma", "0.1"), ("population_size", "4")],
        12,
    );
    assert_in_domain(&req);
}

#[test]
fn test_tpe_concentrates_near_the_best_region() {
    // Accuracy peaks at lr = 0.04; after enough history most proposals land nearby
    let experiment = experiment(
        ObjectiveType::Maximize,
        "tpe",
        &[("random_state", "3"), ("n_startup_trials", "5")],
        vec![double("lr", "0.01", "0.1")],
    );
    let history: Vec<Trial> = (0..40)
        .map(|i| {
            let lr = 0.01 + 0.09 * f64::from(i) / 40.0;
            let accuracy = -(lr - 0.04).powi(2);
            let lr = lr.to_string();
            trial(
                TrialCondition::Succeeded,
                &accuracy.to_string(),
                &[("lr", lr.as_str())],
            )
        })
        .collect();
    let reply = call(&request(experiment, history, 20)).unwrap();
    let near = values(&reply, "lr")
        .iter()
        .filter(|v| (v.parse::<f64>().unwrap() - 0.04).abs() < 0.025)
        .count();
    assert!(near >= 12, "only {near} of 20 near the optimum");
}
