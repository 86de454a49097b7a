//! as400_web_api - HTTP access to IBM i (AS400) master data over ODBC
//!
//! - [`connection`] - per-request connections and credential masking
//! - [`records`] - catalog listing and the part CRUD protocol
//! - [`http_server`] - axum routes and error mapping
//! - [`cli`] - `serve` and `check-connection` commands

pub mod cli;
pub mod config;
pub mod connection;
pub mod http_server;
pub mod observability;
pub mod records;
