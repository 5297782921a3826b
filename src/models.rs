// src/models.rs

use std::fmt;
use std::path::PathBuf;

// --- Inputs ---

/// What the caller wants passed to the tool.
///
/// A `Line` is trusted to be quoted already and is used verbatim. `Args` are quoted
/// one by one for the host shell before being joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandInput {
    /// A pre-formed argument line, e.g. `-Dx="funky bear" properties@jbangdev`.
    Line(String),
    /// Raw arguments, each of which must reach the tool as a single token.
    Args(Vec<String>),
}

impl From<&str> for CommandInput {
    fn from(line: &str) -> Self {
        Self::Line(line.to_string())
    }
}

impl From<String> for CommandInput {
    fn from(line: String) -> Self {
        Self::Line(line)
    }
}

impl From<Vec<String>> for CommandInput {
    fn from(args: Vec<String>) -> Self {
        Self::Args(args)
    }
}

impl From<Vec<&str>> for CommandInput {
    fn from(args: Vec<&str>) -> Self {
        Self::Args(args.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for CommandInput {
    fn from(args: &[&str]) -> Self {
        Self::Args(args.iter().map(|s| (*s).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for CommandInput {
    fn from(args: [&str; N]) -> Self {
        Self::Args(args.iter().map(|s| (*s).to_string()).collect())
    }
}

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Output is collected and returned in the [`ExecutionResult`].
    Captured,
    /// The child shares the launcher's terminal; signals are relayed to it.
    Interactive,
}

// --- Resolution ---

/// A way to run the tool without a local installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStrategy {
    /// `curl -Ls <script> | bash -s - <args>`.
    CurlBash,
    /// `powershell -Command iex "& { $(iwr -useb <script>) } <args>"`.
    PowerShell,
}

/// The outcome of looking for the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An installed executable, by absolute path.
    Installed(PathBuf),
    /// No installation; download and run through a helper shell.
    Bootstrap(BootstrapStrategy),
}

// --- Outputs ---

/// A fully quoted command line, ready for the host shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(String);

impl CommandLine {
    pub(crate) fn new(line: String) -> Self {
        Self(line)
    }

    /// The command line as handed to the shell.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The result of one tool invocation, shared by both execution modes.
///
/// A non-zero `exit_code` is a normal result, not an error. In interactive mode
/// `stdout` and `stderr` are empty because the child wrote straight to the terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// The child's exit code, or `128 + signal` if a signal killed it.
    pub exit_code: i32,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl ExecutionResult {
    /// Whether the tool exited with code zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
