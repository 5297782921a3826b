//! # Launch Planning
//!
//! Everything that happens before a process exists: quoting arguments, finding
//! the tool and composing the final command line. Nothing here spawns.

pub mod command_builder;
pub mod config;
pub mod quoting;
pub mod resolver;
