// src/cli.rs

use crate::constants::{DEBUG_ENV_VAR, DEBUG_MARKER};
use clap::Parser;
use log::LevelFilter;

/// jbang-launcher: runs JBang, installing it on the fly if needed.
///
/// Every argument is handed to JBang untouched, including `--help` and
/// `--version`. The exit code is JBang's own.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Arguments forwarded verbatim to JBang.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Parses `argv` (program name first) so that nothing after the program name
    /// is ever read as a flag, not even `--help` or a leading `--`.
    pub fn from_args<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next().unwrap_or_else(|| "jbang-launcher".to_string());
        let escaped = std::iter::once(program)
            .chain(std::iter::once("--".to_string()))
            .chain(argv);
        Self::parse_from(escaped)
    }
}

/// Whether a `DEBUG` value asks for diagnostic output.
pub fn debug_requested(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.contains(DEBUG_MARKER))
}

/// Sets up `env_logger`: debug level when `DEBUG` contains `jbang`, silent otherwise.
pub fn init_logging() {
    let debug = debug_requested(std::env::var(DEBUG_ENV_VAR).ok().as_deref());
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .format_target(true)
        .try_init();
}
