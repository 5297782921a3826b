// src/constants.rs

/// The command name of the tool on `PATH`.
pub const TOOL_NAME: &str = "jbang";

/// The wrapper script a project may carry next to its sources (Windows only).
pub const WINDOWS_WRAPPER: &str = "./jbang.cmd";

/// The per-user installation directory, relative to the home directory.
pub const INSTALL_DIR_SEGMENTS: [&str; 2] = [".jbang", "bin"];

/// Installer piped into `bash` when no installation is found.
pub const UNIX_SCRIPT_URL: &str = "https://sh.jbang.dev";

/// Installer evaluated by PowerShell when no installation is found.
pub const POWERSHELL_SCRIPT_URL: &str = "https://ps.jbang.dev";

/// Environment variable inspected for [`DEBUG_MARKER`].
pub const DEBUG_ENV_VAR: &str = "DEBUG";

/// Substring of [`DEBUG_ENV_VAR`] that turns on diagnostic logging.
pub const DEBUG_MARKER: &str = "jbang";

/// Exit code for any launcher failure that has no dedicated code.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code when the tool could neither be found nor bootstrapped.
pub const EXIT_RESOLUTION_FAILED: i32 = 2;

/// Base added to a signal number to form the exit code of an interrupted run.
pub const EXIT_SIGNAL_BASE: i32 = 128;

/// Signal number reported for Ctrl-C (`SIGINT`), also used on Windows.
pub const SIGINT_NUMBER: i32 = 2;

/// How often an interactive run checks for a caught termination signal.
pub const RELAY_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(50);
