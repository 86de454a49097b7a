//! Record Service
//!
//! Catalog listing and the part CRUD protocol. Every call acquires its own
//! session and drops it before returning; existence is always checked
//! against the live store right before a mutation.
//!
//! Create is check-then-insert on one autocommit connection. Two concurrent
//! creators of the same code can both pass the check; the loser then fails
//! on the table's primary key and surfaces as a connection error rather
//! than [`ServiceError::Conflict`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::connection::{Connector, Row, Session, SqlParam};

use super::catalog::{normalize_library, TableEntry, TableListing};
use super::errors::{ServiceError, ServiceResult};
use super::part::{normalize_name, validate_code, NewPart, Part, PartListing, PartUpdate};
use super::statements::{PartStatements, LIST_TABLES};

/// Catalog and part operations over a [`Connector`]
#[derive(Clone)]
pub struct RecordService {
    connector: Arc<dyn Connector>,
    statements: PartStatements,
}

impl RecordService {
    pub fn new(connector: Arc<dyn Connector>, statements: PartStatements) -> Self {
        Self {
            connector,
            statements,
        }
    }

    /// Masked connection target
    pub fn describe_connection(&self) -> String {
        self.connector.describe()
    }

    /// Open and immediately release a session
    pub fn test_connection(&self) -> ServiceResult<()> {
        let _session = self.connector.acquire()?;
        Ok(())
    }

    /// Tables in `library`, ordered by name
    pub fn list_tables(&self, library: &str) -> ServiceResult<TableListing> {
        let library = normalize_library(library);
        let mut session = self.connector.acquire()?;
        let rows = session.query(LIST_TABLES, &[SqlParam::from(library.as_str())])?;
        let tables: Vec<TableEntry> = rows
            .iter()
            .map(|row| TableEntry {
                table_name: row.text(0).unwrap_or_default().trim_end().to_string(),
                table_type: row.text(1).unwrap_or_default().trim_end().to_string(),
                table_text: row.text(2).unwrap_or_default().trim_end().to_string(),
            })
            .collect();

        info!(library = %library, count = tables.len(), "listed tables");
        Ok(TableListing { library, tables })
    }

    /// All parts, or those with `code >= from` when a lower bound is given
    pub fn list_parts(&self, from: Option<i32>) -> ServiceResult<PartListing> {
        let mut session = self.connector.acquire()?;
        let rows = match from {
            Some(from) => {
                session.query(&self.statements.select_from, &[SqlParam::from(from)])?
            }
            None => session.query(&self.statements.select_all, &[])?,
        };
        let items = rows.iter().map(part_from_row).collect::<ServiceResult<Vec<_>>>()?;

        debug!(from = ?from, count = items.len(), "listed parts");
        Ok(PartListing::from(items))
    }

    pub fn get_part(&self, code: i32) -> ServiceResult<Part> {
        let mut session = self.connector.acquire()?;
        let rows = session.query(&self.statements.select_one, &[SqlParam::from(code)])?;
        let row = rows.first().ok_or(ServiceError::NotFound(code))?;
        part_from_row(row)
    }

    pub fn create_part(&self, new_part: NewPart) -> ServiceResult<Part> {
        let code = validate_code(new_part.code)?;
        let name = normalize_name(&new_part.name)?;

        let mut session = self.connector.acquire()?;
        if self.exists(session.as_mut(), code)? {
            return Err(ServiceError::Conflict(code));
        }
        session.execute(
            &self.statements.insert,
            &[SqlParam::from(code), SqlParam::from(name.as_str())],
        )?;
        session.commit()?;

        info!(code, "created part");
        Ok(Part { code, name })
    }

    pub fn update_part(&self, code: i32, update: PartUpdate) -> ServiceResult<Part> {
        let name = normalize_name(&update.name)?;

        let mut session = self.connector.acquire()?;
        if !self.exists(session.as_mut(), code)? {
            return Err(ServiceError::NotFound(code));
        }
        session.execute(
            &self.statements.update,
            &[SqlParam::from(name.as_str()), SqlParam::from(code)],
        )?;
        session.commit()?;

        info!(code, "updated part");
        Ok(Part { code, name })
    }

    pub fn delete_part(&self, code: i32) -> ServiceResult<()> {
        let mut session = self.connector.acquire()?;
        if !self.exists(session.as_mut(), code)? {
            return Err(ServiceError::NotFound(code));
        }
        session.execute(&self.statements.delete, &[SqlParam::from(code)])?;
        session.commit()?;

        info!(code, "deleted part");
        Ok(())
    }

    fn exists(&self, session: &mut dyn Session, code: i32) -> ServiceResult<bool> {
        let rows = session.query(&self.statements.exists, &[SqlParam::from(code)])?;
        Ok(!rows.is_empty())
    }
}

fn part_from_row(row: &Row) -> ServiceResult<Part> {
    let code = row.int(0)?;
    Ok(Part::from_stored(code, row.text(1).unwrap_or_default()))
}
