//! AS400 Web API entry point
//!
//! Parses arguments and dispatches to the CLI module; errors go to stderr
//! and end the process with a non-zero exit code.

use as400_web_api::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
