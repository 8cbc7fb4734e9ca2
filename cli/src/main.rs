// Command-line front end for the channel denial simulator

use anyhow::Context;
use channel_sim_core_rs::{
    build_report, config, render_table, Experiment, MarginNormalization, SimulationConfig,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "channel-sim")]
#[command(about = "Monte Carlo estimate of channel denial probability", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an experiment and print the report
    Run {
        /// Config file (.json, or the flat text format)
        #[arg(short, long, default_value = "data.txt")]
        config: PathBuf,

        /// Override the number of trials
        #[arg(short, long)]
        trials: Option<usize>,

        /// Override the RNG seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Margin normalization: attempts, trials or none
        #[arg(short, long)]
        normalization: Option<MarginNormalization>,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Load and validate a config without running it
    Check {
        /// Config file (.json, or the flat text format)
        #[arg(short, long, default_value = "data.txt")]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config,
            trials,
            seed,
            normalization,
            json,
        } => run(&config, trials, seed, normalization, json)?,
        Commands::Check { config } => check(&config)?,
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<SimulationConfig> {
    config::load(path).with_context(|| format!("failed to load config {}", path.display()))
}

fn run(
    path: &Path,
    trials: Option<usize>,
    seed: Option<u64>,
    normalization: Option<MarginNormalization>,
    json: bool,
) -> anyhow::Result<()> {
    let mut config = load(path)?;
    if let Some(trials) = trials {
        config.trial_count = trials;
    }
    if let Some(seed) = seed {
        config.rng_seed = seed;
    }
    if let Some(normalization) = normalization {
        config.margin_normalization = normalization;
    }

    tracing::info!(
        machines = config.machine_count,
        channels = config.channel_capacity,
        trials = config.trial_count,
        seed = config.rng_seed,
        "starting experiment"
    );

    let result = Experiment::new(config.clone())?.run();
    let report = build_report(&config, &result)?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", render_table(&report));
    }

    Ok(())
}

fn check(path: &Path) -> anyhow::Result<()> {
    let config = load(path)?;

    println!("config:           {}", path.display());
    println!("fingerprint:      {}", config.fingerprint()?);
    println!("machines:         {}", config.machine_count);
    println!("channels:         {}", config.channel_capacity);
    println!("trials:           {}", config.trial_count);
    println!("seed:             {}", config.rng_seed);
    println!("normalization:    {}", config.margin_normalization.as_str());
    println!("ticks per trial:  {}", config.ticks_per_trial());
    Ok(())
}
