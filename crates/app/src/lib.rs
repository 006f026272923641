//! Cost Manager API checker
//!
//! Calls the service's raw endpoints and logs what comes back, then
//! runs a fixed suite of assertion checks and reports a verdict.

pub mod cli;
pub mod run;

pub use cli::{CliConfig, CliError, Command, OutputFormat, USAGE, parse_args};
pub use run::{AppError, RunSummary, run, run_with_client};
