//! CLI command implementations
//!
//! `serve` builds the connector from configuration and runs the HTTP server
//! on a tokio runtime; `check-connection` opens a single connection and
//! reports the result as JSON.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::connection::{Connector, OdbcConnector};
use crate::http_server::HttpServer;
use crate::observability::{init_logging, LogFormat};
use crate::records::{MemoryStore, PartStatements, RecordService};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cli: Cli) -> CliResult<()> {
    // The env file may carry RUST_LOG, so it is merged before the subscriber reads it
    let env_file = AppConfig::load_env_file(cli.env_file.as_deref())?;

    init_logging(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    match &env_file {
        Some(path) => info!(path = %path.display(), "loaded env file"),
        None => warn!("no .env file found, using process environment"),
    }
    let config = AppConfig::from_env()?;

    match cli.command {
        Command::Serve {
            host,
            port,
            in_memory,
        } => serve(config, host, port, in_memory),
        Command::CheckConnection => check_connection(&config),
    }
}

/// Build the record service for `config`
pub fn build_service(config: &AppConfig, in_memory: bool) -> CliResult<RecordService> {
    let statements = PartStatements::new(&config.part_table)?;

    let connector: Arc<dyn Connector> = if in_memory {
        warn!("serving from an in-memory store; data is lost on exit");
        Arc::new(MemoryStore::with_statements(statements.clone()))
    } else {
        Arc::new(OdbcConnector::new(&config.connection)?)
    };

    Ok(RecordService::new(connector, statements))
}

/// Start the HTTP server and block until shutdown
pub fn serve(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
    in_memory: bool,
) -> CliResult<()> {
    if let Some(host) = host {
        config.http.host = host;
    }
    if let Some(port) = port {
        config.http.port = port;
    }

    info!(connection = %config.connection.masked(), "connection string");
    info!(
        configured = config.connection.is_configured(),
        autocommit = config.connection.autocommit,
        part_table = %config.part_table,
        "connection configured"
    );
    if !config.connection.is_configured() && !in_memory {
        warn!("no connection settings; database endpoints will fail until configured");
    }

    let service = Arc::new(build_service(&config, in_memory)?);
    let server = HttpServer::new(config.http.clone(), service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

#[derive(Debug, Serialize)]
struct ConnectionReport {
    status: &'static str,
    connection: String,
}

/// Open one connection, print the outcome and exit
pub fn check_connection(config: &AppConfig) -> CliResult<()> {
    let service = build_service(config, false)?;
    info!(connection = %service.describe_connection(), "testing connection");

    match service.test_connection() {
        Ok(()) => {
            info!("connection successful");
            write_response(&ConnectionReport {
                status: "connected",
                connection: service.describe_connection(),
            })
        }
        Err(e) => {
            let err = CliError::connection_failed(e.to_string());
            error!(detail = %err.message(), "connection failed");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_service_uses_configured_table() {
        let config = AppConfig::from_lookup(|k| (k == "AS400_PART_TABLE").then(|| "qgpl.parts".to_string())).unwrap();
        let service = build_service(&config, true).unwrap();
        assert_eq!(service.describe_connection(), "memory");
        assert_eq!(service.list_parts(None).unwrap().count, 0);
    }

    #[test]
    fn test_invalid_table_is_a_config_error() {
        let config = AppConfig::from_lookup(|k| (k == "AS400_PART_TABLE").then(|| "x;y".to_string())).unwrap();
        let err = build_service(&config, true).err().unwrap();
        assert_eq!(err.code_str(), "AS400_CLI_CONFIG_ERROR");
    }
}
