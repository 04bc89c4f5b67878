//! radionet: network interface lifecycle simulator
//!
//! Entry point for the radionet application.

use radionet::config::{Cli, Command, ValidatedConfig, write_default_config};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, print_report_json, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Handle init subcommand
    if let Some(Command::Init { output }) = &cli.command {
        return handle_init(output);
    }

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    if cli.is_check() {
        return handle_check(&config);
    }

    // Setup logging and run
    setup_tracing(config.verbose);
    tracing::info!("{config}");

    run_application(&config)
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Handles the `check` subcommand: prints what each backend would receive.
fn handle_check(config: &ValidatedConfig) -> ExitCode {
    println!("{config}");
    if config.interfaces.is_empty() {
        println!("No interfaces configured.");
    }
    for plan in &config.interfaces {
        println!("  {}: {}", plan.network_type(), plan.params);
    }
    exit_code::SUCCESS
}

/// Runs the simulation with the given configuration.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(config: &ValidatedConfig) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    let report = match runtime.block_on(run::execute(config)) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Application error: {e}");
            return exit_code::runtime_error();
        }
    };

    tracing::debug!("Baseline audit: {}", report.before);
    if report.interrupted {
        tracing::info!("Simulation interrupted, resources were still torn down");
    }
    if config.json {
        print_report_json(&report.after);
    }

    if report.is_clean() {
        tracing::info!(
            "Simulation finished after {} cycle(s): {}",
            report.cycles_completed,
            report.after
        );
    } else {
        tracing::error!("Simulation audit failed: {}", report.after);
    }
    report.exit_code()
}
