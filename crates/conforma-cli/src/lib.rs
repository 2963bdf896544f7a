//! # conforma-cli — Command Handlers
//!
//! One module per subcommand; each owns its clap `Args` struct and a
//! `run` function. The binary entry point in `main.rs` only parses and
//! dispatches.

pub mod coerce;
pub mod resolve;
pub mod validate;
