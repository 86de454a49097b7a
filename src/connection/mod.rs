//! # Connection Provider
//!
//! Opens one backing-store connection per request from configuration that
//! is loaded once at startup.
//!
//! - [`ConnectionConfig`] - connection parameters and the assembled string
//! - [`mask_credentials`] - hides `PWD`/`PASSWORD` values for diagnostics
//! - [`Connector`] / [`Session`] - scoped acquisition; a session closes on drop
//! - [`OdbcConnector`] - the ODBC implementation

pub mod config;
pub mod errors;
pub mod odbc;
pub mod session;

pub use config::{mask_credentials, ConnectionConfig};
pub use errors::{ConnectionError, ConnectionResult};
pub use odbc::OdbcConnector;
pub use session::{Connector, Row, Session, SqlParam};
