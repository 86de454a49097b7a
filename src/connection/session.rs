//! Session and connector traits
//!
//! A [`Connector`] opens one [`Session`] per call. Sessions are owned by the
//! caller and close their underlying connection when dropped, so every exit
//! path (including `?` propagation) releases the connection.

use super::errors::{ConnectionError, ConnectionResult};

/// A bound statement parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i32),
    Text(String),
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

/// One result row; every column is fetched as text, `None` for SQL NULL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<Option<String>>,
}

impl Row {
    pub fn new(columns: Vec<Option<String>>) -> Self {
        Self { columns }
    }

    /// Text value of a zero-based column, `None` when NULL or absent
    pub fn text(&self, index: usize) -> Option<&str> {
        self.columns.get(index).and_then(|c| c.as_deref())
    }

    /// Integer value of a zero-based column
    pub fn int(&self, index: usize) -> ConnectionResult<i32> {
        let raw = self
            .text(index)
            .ok_or_else(|| ConnectionError::Decode(format!("column {} is NULL", index)))?;
        raw.trim()
            .parse()
            .map_err(|_| ConnectionError::Decode(format!("column {} is not an integer: {:?}", index, raw)))
    }
}

/// An open connection, exclusively owned by one request
pub trait Session {
    /// Run a query and collect all result rows
    fn query(&mut self, sql: &str, params: &[SqlParam]) -> ConnectionResult<Vec<Row>>;

    /// Run a statement that produces no result set
    fn execute(&mut self, sql: &str, params: &[SqlParam]) -> ConnectionResult<()>;

    /// Make preceding statements durable
    ///
    /// A no-op for autocommit sessions.
    fn commit(&mut self) -> ConnectionResult<()>;
}

/// Opens sessions against the backing store
pub trait Connector: Send + Sync {
    /// Open a fresh session; no pooling or reuse
    fn acquire(&self) -> ConnectionResult<Box<dyn Session + '_>>;

    /// Connection target with credentials masked, for diagnostics
    fn describe(&self) -> String;
}
