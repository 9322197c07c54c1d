use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use run_control::{
    init_telemetry, shutdown_telemetry, DryRunExecutor, ExecutionController, RunControlConfig,
    RunOutcome, RunnerConfig, RunReport, TransitionEvaluator, TransitionFile, TransitionRunner, Watchdog,
};

#[derive(Parser)]
#[command(name = "run-control")]
#[command(about = "Rehearse scripted automation transitions under a cooperative run controller")]
#[command(long_about = "run-control loads declarative transition files and drives them through the \
                       execution controller with a dry-run step executor. Use it to check transition \
                       files and to observe pause/stop behavior before wiring a real automation backend.")]
struct Cli {
    /// Configuration file (defaults to run-control.toml plus RUN_CONTROL_* variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every transition in a file with the dry-run executor
    Run {
        /// Transition file (JSON)
        #[arg(long, short = 'f')]
        file: PathBuf,
        /// Stop the run after this many seconds
        #[arg(long, help = "Run-level timeout in seconds")]
        timeout: Option<u64>,
        /// Check for pause/stop before each step
        #[arg(long, help = "Add a pause point before every step, not only before every transition")]
        per_step: bool,
        /// Check for pause/stop only before each transition
        #[arg(long, conflicts_with = "per_step")]
        no_per_step: bool,
        /// Abort at the first transition that evaluates to false
        #[arg(long)]
        stop_on_failure: bool,
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a transition file without executing any step
    Check {
        /// Transition file (JSON)
        #[arg(long, short = 'f')]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    init_telemetry(&config.observability)?;

    let result = match cli.command {
        Commands::Run {
            file,
            timeout,
            per_step,
            no_per_step,
            stop_on_failure,
            json,
        } => {
            let per_step = per_step_override(per_step, no_per_step);
            apply_run_overrides(&mut config.runner, timeout, per_step, stop_on_failure);
            run_command(&file, &config, json)
        }
        Commands::Check { file } => check_command(&file),
    };

    shutdown_telemetry();
    result
}

fn per_step_override(per_step: bool, no_per_step: bool) -> Option<bool> {
    match (per_step, no_per_step) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Command-line flags win over the config file and environment
fn apply_run_overrides(
    runner: &mut RunnerConfig,
    timeout: Option<u64>,
    per_step: Option<bool>,
    stop_on_failure: bool,
) {
    if timeout.is_some() {
        runner.run_timeout_seconds = timeout;
    }
    if let Some(per_step) = per_step {
        runner.pause_point_per_step = per_step;
    }
    runner.stop_on_failure |= stop_on_failure;
}

fn load_config(path: Option<&Path>) -> Result<RunControlConfig> {
    RunControlConfig::load_env_file()?;
    match path {
        Some(path) => RunControlConfig::load_from_file(path),
        None => RunControlConfig::load(),
    }
}

fn run_command(file: &Path, config: &RunControlConfig, json: bool) -> Result<()> {
    let transitions = TransitionFile::load(file)?;
    let controller = Arc::new(ExecutionController::new());

    let watchdog = match config.runner.run_timeout() {
        Some(timeout) => Some(Watchdog::spawn(Arc::clone(&controller), timeout)?),
        None => None,
    };

    let runner = TransitionRunner::from_config(
        Arc::clone(&controller),
        Arc::new(DryRunExecutor),
        &config.runner,
    );
    let report = runner.start_and_run(&transitions.transitions)?;
    drop(watchdog);
    controller.reset();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    match report.outcome {
        RunOutcome::Completed => Ok(()),
        RunOutcome::Stopped => bail!("Run {} was stopped before completing", report.run_id),
        RunOutcome::Aborted { transition } => {
            bail!("Run {} aborted at failed transition '{}'", report.run_id, transition)
        }
    }
}

fn print_report(report: &RunReport) {
    println!("Run {}", report.run_id);
    for record in &report.records {
        let mark = if record.success { "ok  " } else { "FAIL" };
        println!(
            "  {} {} ({} ms)",
            mark,
            record.name,
            record.duration().num_milliseconds()
        );
    }
    println!(
        "{} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );
}

fn check_command(file: &Path) -> Result<()> {
    let transitions = TransitionFile::load(file)?;
    let evaluator = TransitionEvaluator::new(Arc::new(DryRunExecutor));

    let defects = transitions.validate(&evaluator);
    if defects.is_empty() {
        println!("{}: {} transitions OK", file.display(), transitions.len());
        return Ok(());
    }

    for defect in &defects {
        println!("  {}", defect);
    }
    bail!("{} of {} transitions are invalid", defects.len(), transitions.len())
}
