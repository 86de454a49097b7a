//! CLI argument definitions using clap
//!
//! Commands:
//! - as400-web-api serve [--host <host>] [--port <port>] [--in-memory]
//! - as400-web-api check-connection

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AS400 Web API - browse and maintain IBM i master data over HTTP
#[derive(Parser, Debug)]
#[command(name = "as400-web-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Env file to load before reading configuration (default: ./.env if present)
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides HTTP_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides HTTP_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Serve from an in-memory store instead of ODBC
        #[arg(long)]
        in_memory: bool,
    },

    /// Open and close one backing-store connection, then exit
    CheckConnection,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
