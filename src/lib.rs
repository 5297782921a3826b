//! # jbang-launcher
//!
//! Finds (or bootstraps) JBang and runs it: arguments are quoted for the host
//! shell, standard streams are captured or passed through, the child's exit code
//! comes back untouched, and termination signals are relayed to the child.
//!
//! ```no_run
//! let result = jbang_launcher::exec(["-Dx=funky bear", "properties@jbangdev"])?;
//! assert_eq!(result.exit_code, 0);
//! # Ok::<(), jbang_launcher::LaunchError>(())
//! ```

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod error;
pub mod launcher;
pub mod models;
pub mod system;

pub use crate::core::quoting::{Dialect, quote, quote_arg};
pub use crate::error::LaunchError;
pub use crate::launcher::{Launcher, exec, exec_with_input, spawn_sync};
pub use crate::models::{CommandInput, ExecutionMode, ExecutionResult};
