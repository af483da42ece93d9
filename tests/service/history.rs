use suggestion::api::TrialCondition;
use suggestion::convert::{build_search_space, import_trials, register_trials};
use suggestion::{Study, TrialState};

use crate::common::{categorical, double, trial};

fn study() -> Study {
    let space = build_search_space(&[
        double("lr", "0.01", "0.1"),
        categorical("optimizer", &["sgd", "adam"]),
    ])
    .unwrap();
    Study::builder().maximize().search_space(space).build().unwrap()
}

#[test]
fn test_only_succeeded_trials_carry_a_value() {
    let history = vec![
        trial(TrialCondition::Succeeded, "0.8", &[("lr", "0.05")]),
        trial(TrialCondition::Failed, "0.7", &[("lr", "0.02")]),
        trial(TrialCondition::Killed, "0.6", &[("lr", "0.03")]),
        trial(TrialCondition::Running, "0.5", &[("lr", "0.04")]),
        trial(TrialCondition::Created, "0.4", &[]),
    ];
    let imported = import_trials(&history, "accuracy", &study()).unwrap();

    let states: Vec<TrialState> = imported.iter().map(|t| t.state).collect();
    assert_eq!(
        states,
        [
            TrialState::Complete,
            TrialState::Fail,
            TrialState::Fail,
            TrialState::Running,
            TrialState::Waiting,
        ]
    );
    assert!((imported[0].value - 0.8).abs() < 1e-12);
    assert!(imported[1..].iter().all(|t| t.value == 0.0));
}

#[test]
fn test_unknown_parameters_are_skipped() {
    let history = vec![trial(
        TrialCondition::Succeeded,
        "0.8",
        &[("lr", "0.05"), ("momentum", "0.9")],
    )];
    let imported = import_trials(&history, "accuracy", &study()).unwrap();
    assert_eq!(imported[0].params.len(), 1);
    assert!(imported[0].internal_param("momentum").is_none());
}

#[test]
fn test_register_assigns_positional_ids() {
    let mut study = study();
    let history = vec![
        trial(TrialCondition::Succeeded, "0.8", &[("lr", "0.05")]),
        trial(TrialCondition::Succeeded, "0.9", &[("optimizer", "sgd")]),
    ];
    assert_eq!(register_trials(&mut study, &history, "accuracy").unwrap(), 2);
    let ids: Vec<u64> = study.trials().iter().map(|t| t.id).collect();
    assert_eq!(ids, [0, 1]);
    assert_eq!(study.completed_trials().count(), 2);
}

#[test]
fn test_missing_metric_on_success_keeps_zero() {
    let mut record = trial(TrialCondition::Succeeded, "0.8", &[("lr", "0.05")]);
    record.status.observation.metrics.clear();
    let imported = import_trials(&[record], "accuracy", &study()).unwrap();
    assert_eq!(imported[0].state, TrialState::Complete);
    assert_eq!(imported[0].value, 0.0);
}

#[test]
fn test_direction_does_not_change_import() {
    let space = build_search_space(&[double("lr", "0.01", "0.1")]).unwrap();
    let minimize = Study::builder().minimize().search_space(space).build().unwrap();
    let history = vec![trial(TrialCondition::Succeeded, "0.8", &[("lr", "0.05")])];
    let imported = import_trials(&history, "accuracy", &minimize).unwrap();
    assert!((imported[0].value - 0.8).abs() < 1e-12);
}
