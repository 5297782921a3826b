// src/core/command_builder.rs

use crate::{
    core::{
        config::ToolConfig,
        quoting::{self, Dialect},
    },
    models::{BootstrapStrategy, CommandInput, CommandLine, Resolution},
};
use std::path::Path;

/// Turns the caller's input into the argument part of the command line.
///
/// `Args` are quoted here, once. A `Line` is assumed to be quoted by the caller.
pub fn argument_line(input: &CommandInput, dialect: Dialect) -> String {
    match input {
        CommandInput::Line(line) => {
            log::debug!("Argument line given as a string, using it as is");
            line.clone()
        }
        CommandInput::Args(args) => {
            log::debug!("Arguments given as a list, quoting each one");
            quoting::quote(args, dialect)
        }
    }
}

/// Composes the resolved tool (or its bootstrap) with the caller's arguments.
///
/// No escaping happens past [`argument_line`]; only the executable path is quoted,
/// as a single token.
pub fn build_command_line(
    resolution: &Resolution,
    input: &CommandInput,
    config: &ToolConfig,
    dialect: Dialect,
) -> CommandLine {
    let arg_dialect = match resolution {
        Resolution::Installed(path) if dialect == Dialect::WindowsCmd && is_batch_file(path) => {
            Dialect::WindowsBatch
        }
        _ => dialect,
    };
    let arg_line = argument_line(input, arg_dialect);
    log::debug!("argLine: {}", arg_line);

    let line = match resolution {
        Resolution::Installed(path) => {
            let executable = quoting::quote_arg(&path.to_string_lossy(), dialect);
            join_non_empty(&executable, &arg_line)
        }
        Resolution::Bootstrap(BootstrapStrategy::CurlBash) => join_non_empty(
            &format!("curl -Ls {} | bash -s -", config.unix_script_url),
            &arg_line,
        ),
        Resolution::Bootstrap(BootstrapStrategy::PowerShell) => format!(
            "powershell -Command iex \"& {{ $(iwr -useb {}) }} {}\"",
            config.powershell_script_url, arg_line
        ),
    };

    CommandLine::new(line)
}

fn is_batch_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("cmd") || ext.eq_ignore_ascii_case("bat"))
}

fn join_non_empty(head: &str, tail: &str) -> String {
    if tail.is_empty() {
        head.to_string()
    } else {
        format!("{} {}", head, tail)
    }
}
