//! Legacy flat text configuration format
//!
//! The file starts with eight scalar lines. The first token of each line is
//! the value; anything after it is a free-text label:
//!
//! ```text
//! 3      machines
//! 2      channels
//! 0.1    tick probability
//! 20     trials
//! 5      observation interval
//! 1.96   normal quantile
//! 4      connection samples per machine
//! 3      working-time samples per machine
//! ```
//!
//! Two tables follow, each introduced by at least one non-numeric header
//! line. The connection table holds `C` observed connection counts per
//! machine, the working-time table `W` observed working hours per machine,
//! machine by machine. They are reduced to rates:
//!
//! ```text
//! connection_rate[i] = sum(connections[i]) / C
//! release_rate[i]    = W * 24 / sum(hours[i])
//! ```

use super::{ConfigError, SimulationConfig, DEFAULT_RNG_SEED};
use crate::estimator::MarginNormalization;
use std::str::FromStr;

/// Hours in one day; working hours are converted to releases per day
const HOURS_PER_DAY: f64 = 24.0;

/// Parse the legacy flat format
///
/// The result is not validated; [`super::load`] validates after parsing.
///
/// # Example
///
/// ```rust
/// use channel_sim_core_rs::config::flat;
///
/// let text = "\
/// 2 machines
/// 1 channels
/// 0.1 tick
/// 5 trials
/// 3.0 interval
/// 1.96 quantile
/// 2 connection samples
/// 1 working samples
/// Connections
/// 1 3
/// 2 2
/// Working hours
/// 8
/// 12
/// ";
/// let config = flat::parse(text).unwrap();
/// assert_eq!(config.connection_rate, vec![2.0, 2.0]);
/// assert_eq!(config.release_rate, vec![3.0, 2.0]);
/// ```
pub fn parse(text: &str) -> Result<SimulationConfig, ConfigError> {
    let mut cursor = LineCursor::new(text);

    let machine_count: usize = cursor.scalar("machine count")?;
    let channel_capacity: usize = cursor.scalar("channel capacity")?;
    let tick_probability: f64 = cursor.scalar("tick probability")?;
    let trial_count: usize = cursor.scalar("trial count")?;
    let observation_interval: f64 = cursor.scalar("observation interval")?;
    let confidence_quantile: f64 = cursor.scalar("confidence quantile")?;
    let connection_samples: usize = cursor.scalar("connection sample count")?;
    let working_samples: usize = cursor.scalar("working-time sample count")?;

    if connection_samples == 0 || working_samples == 0 {
        return Err(ConfigError::Parse {
            line: cursor.line_number(),
            message: "sample counts must be > 0".to_string(),
        });
    }

    let connections = cursor.table("connection table", machine_count, connection_samples)?;
    let connection_rate = connections
        .iter()
        .map(|sum| sum / connection_samples as f64)
        .collect();

    let hours = cursor.table("working-time table", machine_count, working_samples)?;
    let mut release_rate = Vec::with_capacity(hours.len());
    for (machine, sum) in hours.iter().enumerate() {
        if *sum <= 0.0 {
            return Err(ConfigError::Parse {
                line: cursor.line_number(),
                message: format!(
                    "working hours of machine {} sum to {}, expected > 0",
                    machine + 1,
                    sum
                ),
            });
        }
        release_rate.push(working_samples as f64 * HOURS_PER_DAY / sum);
    }

    Ok(SimulationConfig {
        machine_count,
        channel_capacity,
        tick_probability,
        trial_count,
        observation_interval,
        confidence_quantile,
        connection_rate,
        release_rate,
        rng_seed: DEFAULT_RNG_SEED,
        margin_normalization: MarginNormalization::default(),
    })
}

/// Line-oriented reader that remembers where it is
struct LineCursor<'a> {
    lines: std::iter::Peekable<std::iter::Enumerate<std::str::Lines<'a>>>,
    line_number: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate().peekable(),
            line_number: 0,
        }
    }

    /// 1-based number of the last line consumed
    fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next non-blank line
    fn next_content_line(&mut self) -> Option<&'a str> {
        for (index, line) in self.lines.by_ref() {
            self.line_number = index + 1;
            if !line.trim().is_empty() {
                return Some(line);
            }
        }
        None
    }

    /// First token of the next non-blank line, parsed as `T`
    fn scalar<T: FromStr>(&mut self, what: &str) -> Result<T, ConfigError> {
        let line = self
            .next_content_line()
            .ok_or_else(|| ConfigError::UnexpectedEof(format!("missing {}", what)))?;
        let token = line.split_whitespace().next().unwrap_or_default();
        token.parse().map_err(|_| ConfigError::Parse {
            line: self.line_number,
            message: format!("cannot read {} from '{}'", what, token),
        })
    }

    /// Skip header lines, then sum `samples` numbers for each of `rows` machines
    fn table(&mut self, what: &str, rows: usize, samples: usize) -> Result<Vec<f64>, ConfigError> {
        self.skip_headers(what)?;

        let wanted = rows.checked_mul(samples).ok_or_else(|| ConfigError::Parse {
            line: self.line_number,
            message: format!("{} size overflows ({} x {})", what, rows, samples),
        })?;
        let mut values = Vec::new();
        while values.len() < wanted {
            let line = self.next_content_line().ok_or_else(|| {
                ConfigError::UnexpectedEof(format!(
                    "{} has {} of {} values",
                    what,
                    values.len(),
                    wanted
                ))
            })?;
            for token in line.split_whitespace() {
                if values.len() == wanted {
                    return Err(ConfigError::Parse {
                        line: self.line_number,
                        message: format!("{} has more than {} values", what, wanted),
                    });
                }
                let value: f64 = token.parse().map_err(|_| ConfigError::Parse {
                    line: self.line_number,
                    message: format!("bad number '{}' in {}", token, what),
                })?;
                values.push(value);
            }
        }

        Ok(values.chunks(samples).map(|chunk| chunk.iter().sum()).collect())
    }

    /// Consume lines until the next one starts with a number
    fn skip_headers(&mut self, what: &str) -> Result<(), ConfigError> {
        let mut skipped = 0;
        loop {
            let (_, line) = self
                .lines
                .peek()
                .ok_or_else(|| ConfigError::UnexpectedEof(format!("missing {}", what)))?;
            let starts_numeric = line
                .split_whitespace()
                .next()
                .map(|t| t.parse::<f64>().is_ok())
                .unwrap_or(false);
            if starts_numeric {
                break;
            }
            if !line.trim().is_empty() {
                skipped += 1;
            }
            if let Some((index, _)) = self.lines.next() {
                self.line_number = index + 1;
            }
        }

        if skipped == 0 {
            return Err(ConfigError::Parse {
                line: self.line_number + 1,
                message: format!("{} must start with a header line", what),
            });
        }
        Ok(())
    }
}
