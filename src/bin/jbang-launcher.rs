// src/bin/jbang-launcher.rs

use anyhow::Result;
use colored::*;
use jbang_launcher::{
    CommandInput, LaunchError, Launcher,
    cli::{self, Cli},
    constants::EXIT_FAILURE,
    t,
};

/// The entry point of the shim.
/// It sets up logging, forwards every argument to JBang on this terminal and
/// exits with whatever JBang exited with.
fn main() {
    cli::init_logging();
    log::debug!("Starting jbang-launcher");

    let argv = std::env::args_os().map(|a| a.to_string_lossy().into_owned());
    match run_cli(Cli::from_args(argv)) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // --- Centralized Error Handling ---
            if let Some(launch_err) = e.downcast_ref::<LaunchError>() {
                match launch_err {
                    // The child was already signalled and reaped; leave quietly.
                    LaunchError::Interrupted { signal } => {
                        log::debug!("Interrupted by signal {}", signal);
                    }
                    LaunchError::ResolutionFailed { .. } => {
                        eprintln!(
                            "{}: {}",
                            t!("launcher.error.prefix").red().bold(),
                            t!("launcher.error.resolution")
                        );
                    }
                    LaunchError::SpawnFailed { .. } => {
                        log::debug!("{:?}", launch_err);
                        eprintln!(
                            "{}: {}",
                            t!("launcher.error.prefix").red().bold(),
                            t!("launcher.error.spawn")
                        );
                    }
                    _ => {
                        eprintln!("{}: {}", t!("launcher.error.prefix").red().bold(), e);
                    }
                }
                std::process::exit(launch_err.exit_code());
            }

            eprintln!("{}: {}", t!("launcher.error.prefix").red().bold(), e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

/// Runs JBang interactively and returns the exit code to leave with.
fn run_cli(cli: Cli) -> Result<i32> {
    log::debug!("CLI args parsed: {:?}", cli);
    let result = Launcher::jbang().spawn_sync(CommandInput::Args(cli.args))?;
    Ok(result.exit_code)
}
