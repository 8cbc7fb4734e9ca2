//! Report tests
//!
//! The report is a pure function of config + result; the table is a pure
//! function of the report.

use channel_sim_core_rs::{
    build_report, render_table, run_experiment, Estimate, ExperimentResult, IntervalEstimate,
    SimulationConfig,
};

fn config() -> SimulationConfig {
    SimulationConfig {
        connection_rate: vec![1.0, 2.5],
        release_rate: vec![4.0, 0.75],
        ..SimulationConfig::uniform(2, 1, 0.1, 3, 2.0, 1.96, 0.0, 0.0)
    }
}

fn result(estimate: Estimate) -> ExperimentResult {
    ExperimentResult {
        per_trial_attempts: vec![4, 10, 7],
        per_trial_denials: vec![1, 3, 0],
        total_attempts: 21,
        total_denials: 4,
        ticks_per_trial: 19,
        estimate,
    }
}

fn defined() -> Estimate {
    Estimate::Defined(IntervalEstimate {
        failure_probability: 0.19,
        margin: 0.168,
        lower_bound: 0.022,
        upper_bound: 0.358,
    })
}

#[test]
fn test_report_fields() {
    let config = config();
    let report = build_report(&config, &result(defined())).unwrap();

    assert_eq!(report.machines.len(), 2);
    assert_eq!(report.machines[1].machine, 2);
    assert_eq!(report.machines[1].connection_rate, 2.5);
    assert_eq!(report.machines[1].release_rate, 0.75);

    assert_eq!(report.trials.len(), 3);
    assert_eq!(report.trials[1].trial, 2);
    assert_eq!(report.trials[1].attempts, 10);
    assert_eq!(report.trials[1].denials, 3);

    assert_eq!(report.failure_probability, Some(0.19));
    assert_eq!(report.lower_bound, Some(0.022));
    assert_eq!(report.upper_bound, Some(0.358));
    assert_eq!(report.config_fingerprint, config.fingerprint().unwrap());
}

#[test]
fn test_table_layout() {
    let report = build_report(&config(), &result(defined())).unwrap();
    let table = render_table(&report);
    let lines: Vec<&str> = table.lines().collect();

    assert!(lines[0].starts_with("+------------------------------+-------------+"));
    assert_eq!(
        lines[1],
        "| Machine                      |           1 |           2 |"
    );
    assert_eq!(
        lines[3],
        "| Connection rate              |        1.00 |        2.50 |"
    );
    assert_eq!(
        lines[4],
        "| Release rate                 |        4.00 |        0.75 |"
    );
    assert!(table.contains("| Attempts                     |    4 |   10 |    7 |"));
    assert!(table.contains("| Denials                      |    1 |    3 |    0 |"));
    assert!(table.contains("| Denial probability           |          0.190 |"));
    assert!(table.contains("| Confidence interval          | (0.022; 0.358) |"));
    assert!(table.ends_with("+\n"));
}

#[test]
fn test_table_shows_undefined() {
    let report = build_report(&config(), &result(Estimate::Undefined { trials: 3 })).unwrap();

    assert_eq!(report.failure_probability, None);
    let table = render_table(&report);
    assert!(table.contains("| Denial probability           | undefined |"));
    assert!(table.contains("| Confidence interval          | undefined |"));
}

#[test]
fn test_report_json_has_null_for_undefined() {
    let report = build_report(&config(), &result(Estimate::Undefined { trials: 3 })).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert!(json["failure_probability"].is_null());
    assert_eq!(json["trials"][2]["attempts"], 7);
    assert_eq!(json["margin_normalization"], "attempts");
}

#[test]
fn test_report_from_real_run() {
    let config = SimulationConfig::uniform(4, 2, 0.1, 6, 5.0, 1.96, 2.0, 1.0);
    let result = run_experiment(config.clone()).unwrap();
    let report = build_report(&config, &result).unwrap();

    assert_eq!(report.trials.len(), 6);
    assert_eq!(report.ticks_per_trial, result.ticks_per_trial);
    assert_eq!(
        report.trials.iter().map(|t| t.attempts).sum::<u64>(),
        report.total_attempts
    );
    assert!(render_table(&report).lines().count() > 10);
}
