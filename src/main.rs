//! PerfLab CLI - Measure and compare small numeric kernels

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use perflab::config::{log_level, CliArgs, Commands, JuliaConfig, OutputFormat};
use perflab::error::{PerfLabError, Result};
use perflab::fractal::{run_kernel, ComparisonReport, JuliaGrid};
use perflab::prime::{is_prime_with, parse_integer, PrimeStrategy};
use perflab::profile::{run_demo, ProfileConfig, Profiler};
use perflab::timing::{Routine, RoutineInput, Timer, TimerConfig};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG wins over -v/-q
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(args.verbose, args.quiet)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Handle result
    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every check passed
fn run(args: &CliArgs) -> Result<bool> {
    match &args.command {
        Commands::Prime { number, strategy } => cmd_prime(args, number, &strategy.strategies()),
        Commands::Julia { .. } => cmd_julia(args),
        Commands::Timeit { .. } => cmd_timeit(args),
        Commands::Profile { .. } => cmd_profile(args),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct PrimeCheck {
    number: i64,
    strategy: PrimeStrategy,
    is_prime: bool,
    elapsed_secs: f64,
}

fn cmd_prime(args: &CliArgs, number: &str, strategies: &[PrimeStrategy]) -> Result<bool> {
    let n = parse_integer(number)?;

    let checks: Vec<PrimeCheck> = strategies
        .iter()
        .map(|&strategy| {
            let start = Instant::now();
            let is_prime = is_prime_with(n, strategy);
            PrimeCheck {
                number: n,
                strategy,
                is_prime,
                elapsed_secs: start.elapsed().as_secs_f64(),
            }
        })
        .collect();

    let agree = checks.windows(2).all(|w| w[0].is_prime == w[1].is_prime);
    if !agree {
        tracing::error!("Strategies disagree on {}", n);
    }

    if args.quiet {
        return Ok(agree);
    }

    match args.output_format {
        OutputFormat::Json => print_json(&checks)?,
        OutputFormat::Text => {
            println!("Testing {}:", n);
            for check in &checks {
                println!(
                    "  {:12} {:5}  ({:.2?})",
                    check.strategy.name(),
                    check.is_prime,
                    Duration::from_secs_f64(check.elapsed_secs)
                );
            }
        }
    }

    Ok(agree)
}

fn cmd_julia(args: &CliArgs) -> Result<bool> {
    let config = JuliaConfig::from_cli(&args.command)?;

    let grid = JuliaGrid::generate(&config.region, config.width, config.c)
        .map_err(|e| e.with_context("Generating grid"))?;
    tracing::info!("Grid {}x{} ({} points), c = {}", grid.width, grid.height, grid.len(), config.c);

    let spinner = if args.quiet || args.output_format == OutputFormat::Json {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .map_err(|e| PerfLabError::config(format!("Invalid progress template: {}", e)))?,
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    };

    let mut runs = Vec::with_capacity(config.kernels.len());
    for &kernel in &config.kernels {
        spinner.set_message(format!("Running {} kernel...", kernel));
        runs.push(run_kernel(kernel, &grid, config.max_iter, config.expected_sum)?);
    }
    spinner.finish_and_clear();

    let report = ComparisonReport {
        points: grid.len(),
        max_iter: config.max_iter,
        expected_sum: config.expected_sum,
        threads: rayon::current_num_threads(),
        runs,
    };

    if !args.quiet {
        match args.output_format {
            OutputFormat::Json => print_json(&report)?,
            OutputFormat::Text => report.print_summary(),
        }
    }

    Ok(report.all_correct())
}

fn cmd_timeit(args: &CliArgs) -> Result<bool> {
    let Commands::Timeit { routine, number, strategy, .. } = &args.command else {
        return Err(PerfLabError::config("not a timeit command"));
    };

    let timer = Timer::new(TimerConfig::from_cli(&args.command)?)?;
    let input = RoutineInput {
        number: parse_integer(number)?,
        strategy: *strategy,
    };

    let label = match routine {
        Routine::CheckPrime => {
            format!("{}({}, {})", routine.name(), input.number, input.strategy)
        }
        _ => routine.name().to_string(),
    };

    let report = timer.time(&label, || routine.invoke(&input));

    if !args.quiet {
        match args.output_format {
            OutputFormat::Json => print_json(&report)?,
            OutputFormat::Text => report.print_summary(),
        }
    }

    Ok(true)
}

fn cmd_profile(args: &CliArgs) -> Result<bool> {
    let config = ProfileConfig::from_cli(&args.command)?;
    let mut profiler = Profiler::from_config(&config)?;

    if !profiler.is_enabled() {
        tracing::info!("Profiling disabled; running workloads unobserved");
    }

    let report = run_demo(&mut profiler)?;

    if !args.quiet {
        match args.output_format {
            OutputFormat::Json => print_json(&report)?,
            OutputFormat::Text => report.print_summary(),
        }
    }

    Ok(true)
}
