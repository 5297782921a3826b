//! # System Interaction Layer
//!
//! The boundary with the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: spawns a command line through the host shell, either capturing
//!   its output or handing it the launcher's terminal, and reports the exit code.
//! - **`probe`**: read-only lookups of executables on `PATH` and on disk.
//! - **`relay`**: owns the active child of an interactive run and forwards
//!   termination signals to its process group.

pub mod executor;
pub mod probe;
pub mod relay;
