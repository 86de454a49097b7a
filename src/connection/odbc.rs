//! ODBC connector
//!
//! Production [`Connector`] backed by `odbc-api`. The driver environment is
//! created once; every `acquire` opens a brand new connection that is
//! disconnected when the returned session drops.

use odbc_api::parameter::InputParameter;
use odbc_api::{Connection, ConnectionOptions, Cursor, Environment, IntoParameter, ResultSetMetadata};
use tracing::debug;

use super::config::ConnectionConfig;
use super::errors::{ConnectionError, ConnectionResult};
use super::session::{Connector, Row, Session, SqlParam};

/// Opens one ODBC connection per request
pub struct OdbcConnector {
    environment: Environment,
    connection_string: Option<String>,
    masked: String,
    autocommit: bool,
}

impl OdbcConnector {
    /// Build the connector from startup configuration
    ///
    /// A missing connection string is not an error here; `acquire` reports
    /// it so the server can still answer health probes.
    pub fn new(config: &ConnectionConfig) -> ConnectionResult<Self> {
        let environment =
            Environment::new().map_err(|e| ConnectionError::Environment(e.to_string()))?;

        Ok(Self {
            environment,
            connection_string: config.connection_string(),
            masked: config.masked(),
            autocommit: config.autocommit,
        })
    }
}

impl Connector for OdbcConnector {
    fn acquire(&self) -> ConnectionResult<Box<dyn Session + '_>> {
        let conn_str = self
            .connection_string
            .as_deref()
            .ok_or(ConnectionError::NotConfigured)?;

        let connection = self
            .environment
            .connect_with_connection_string(conn_str, ConnectionOptions::default())
            .map_err(|e| ConnectionError::Open(e.to_string()))?;

        // On failure the connection drops here and is disconnected
        connection
            .set_autocommit(self.autocommit)
            .map_err(|e| ConnectionError::Open(e.to_string()))?;

        debug!(connection = %self.masked, autocommit = self.autocommit, "opened connection");
        Ok(Box::new(OdbcSession {
            connection,
            autocommit: self.autocommit,
        }))
    }

    fn describe(&self) -> String {
        self.masked.clone()
    }
}

struct OdbcSession<'env> {
    connection: Connection<'env>,
    autocommit: bool,
}

fn bind(params: &[SqlParam]) -> Vec<Box<dyn InputParameter>> {
    params
        .iter()
        .map(|param| match param {
            SqlParam::Int(value) => Box::new(*value) as Box<dyn InputParameter>,
            SqlParam::Text(value) => Box::new(value.clone().into_parameter()) as Box<dyn InputParameter>,
        })
        .collect()
}

fn statement_error(e: odbc_api::Error) -> ConnectionError {
    ConnectionError::Statement(e.to_string())
}

impl Session for OdbcSession<'_> {
    fn query(&mut self, sql: &str, params: &[SqlParam]) -> ConnectionResult<Vec<Row>> {
        let bound = bind(params);
        let Some(mut cursor) = self
            .connection
            .execute(sql, bound.as_slice())
            .map_err(statement_error)?
        else {
            return Ok(Vec::new());
        };

        let num_cols = cursor.num_result_cols().map_err(statement_error)?;
        let num_cols = u16::try_from(num_cols).unwrap_or(0);

        let mut rows = Vec::new();
        let mut buf = Vec::new();
        while let Some(mut row) = cursor.next_row().map_err(statement_error)? {
            let mut columns = Vec::with_capacity(usize::from(num_cols));
            for col in 1..=num_cols {
                let present = row.get_text(col, &mut buf).map_err(statement_error)?;
                columns.push(present.then(|| String::from_utf8_lossy(&buf).into_owned()));
            }
            rows.push(Row::new(columns));
        }
        Ok(rows)
    }

    fn execute(&mut self, sql: &str, params: &[SqlParam]) -> ConnectionResult<()> {
        let bound = bind(params);
        self.connection
            .execute(sql, bound.as_slice())
            .map_err(statement_error)?;
        Ok(())
    }

    fn commit(&mut self) -> ConnectionResult<()> {
        if self.autocommit {
            return Ok(());
        }
        self.connection
            .commit()
            .map_err(|e| ConnectionError::Commit(e.to_string()))
    }
}
