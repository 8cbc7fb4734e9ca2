//! Fixed-width text rendering of a [`Report`]
//!
//! ```text
//! +------------------------------+-------------+-------------+
//! | Machine                      |           1 |           2 |
//! +------------------------------+-------------+-------------+
//! | Connection rate              |        1.00 |        2.00 |
//! ...
//! ```
//!
//! Machine columns are 11 characters wide, trial columns 4; labels 28.

use super::Report;
use std::fmt::Write;

const LABEL_WIDTH: usize = 28;
const RATE_WIDTH: usize = 11;
const TRIAL_WIDTH: usize = 4;

/// Render the report as a text table
pub fn render_table(report: &Report) -> String {
    let mut out = String::new();

    // Rates section
    let machine_numbers: Vec<String> = report
        .machines
        .iter()
        .map(|m| m.machine.to_string())
        .collect();
    let connection: Vec<String> = report
        .machines
        .iter()
        .map(|m| format!("{:.2}", m.connection_rate))
        .collect();
    let release: Vec<String> = report
        .machines
        .iter()
        .map(|m| format!("{:.2}", m.release_rate))
        .collect();

    let rate_rule = rule(report.machines.len(), RATE_WIDTH);
    push_line(&mut out, &rate_rule);
    push_row(&mut out, "Machine", &machine_numbers, RATE_WIDTH);
    push_line(&mut out, &rate_rule);
    push_row(&mut out, "Connection rate", &connection, RATE_WIDTH);
    push_row(&mut out, "Release rate", &release, RATE_WIDTH);
    push_line(&mut out, &rate_rule);

    // Trials section
    let trial_numbers: Vec<String> = report.trials.iter().map(|t| t.trial.to_string()).collect();
    let attempts: Vec<String> = report.trials.iter().map(|t| t.attempts.to_string()).collect();
    let denials: Vec<String> = report.trials.iter().map(|t| t.denials.to_string()).collect();

    let trial_rule = rule(report.trials.len(), TRIAL_WIDTH);
    push_line(&mut out, &trial_rule);
    push_row(&mut out, "Trial", &trial_numbers, TRIAL_WIDTH);
    push_line(&mut out, &trial_rule);
    push_row(&mut out, "Attempts", &attempts, TRIAL_WIDTH);
    push_row(&mut out, "Denials", &denials, TRIAL_WIDTH);
    push_line(&mut out, &trial_rule);

    // Summary section
    let probability = match report.failure_probability {
        Some(p) => format!("{:.3}", p),
        None => "undefined".to_string(),
    };
    let interval = match (report.lower_bound, report.upper_bound) {
        (Some(lower), Some(upper)) => format!("({:.3}; {:.3})", lower, upper),
        _ => "undefined".to_string(),
    };

    let summary_width = interval.len().max(probability.len()).max(9);
    let summary_rule = rule(1, summary_width);
    push_line(&mut out, &summary_rule);
    push_row(&mut out, "Denial probability", &[probability], summary_width);
    push_row(&mut out, "Confidence interval", &[interval], summary_width);
    push_line(&mut out, &summary_rule);

    out
}

/// `+----+----+` line for a label column plus `columns` value columns
fn rule(columns: usize, width: usize) -> String {
    let mut line = format!("+{}", "-".repeat(LABEL_WIDTH + 2));
    for _ in 0..columns {
        line.push('+');
        line.push_str(&"-".repeat(width + 2));
    }
    line.push('+');
    line
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_row(out: &mut String, label: &str, cells: &[String], width: usize) {
    let _ = write!(out, "| {:<w$} ", label, w = LABEL_WIDTH);
    for cell in cells {
        let _ = write!(out, "| {:>w$} ", cell, w = width);
    }
    out.push_str("|\n");
}
