//! CLI module
//!
//! Provides command-line interface for:
//! - serve: Run the HTTP server
//! - check-connection: One-shot connectivity check

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{build_service, check_connection, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_response_to};
