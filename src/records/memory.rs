//! In-memory backing store
//!
//! A [`Connector`] that understands exactly the statements issued by
//! [`RecordService`](super::RecordService). Names are stored padded to the
//! column width like the real table, writes are buffered until commit when
//! autocommit is off, and open sessions are counted so callers can check
//! that every session was released.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::connection::{ConnectionError, ConnectionResult, Connector, Row, Session, SqlParam};

use super::part::NAME_MAX_LEN;
use super::statements::{PartStatements, LIST_TABLES};

type CatalogRow = (String, String, Option<String>);

#[derive(Debug, Default)]
struct StoreState {
    parts: BTreeMap<i32, String>,
    catalog: BTreeMap<String, Vec<CatalogRow>>,
    unreachable: Option<String>,
    write_failure: Option<String>,
}

/// In-memory stand-in for the part table and the system catalog
pub struct MemoryStore {
    statements: PartStatements,
    autocommit: bool,
    state: Mutex<StoreState>,
    open_sessions: AtomicUsize,
    acquired: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_statements(PartStatements::default())
    }

    pub fn with_statements(statements: PartStatements) -> Self {
        Self {
            statements,
            autocommit: true,
            state: Mutex::new(StoreState::default()),
            open_sessions: AtomicUsize::new(0),
            acquired: AtomicUsize::new(0),
        }
    }

    /// Sessions buffer writes until `commit`; uncommitted writes are discarded on drop
    pub fn without_autocommit(mut self) -> Self {
        self.autocommit = false;
        self
    }

    /// Insert a part directly, padded like the real column
    pub fn seed_part(&self, code: i32, name: &str) {
        self.lock().parts.insert(code, pad(name));
    }

    /// Register a catalog entry for `schema`
    pub fn seed_table(&self, schema: &str, name: &str, table_type: &str, text: Option<&str>) {
        let mut state = self.lock();
        let tables = state.catalog.entry(schema.to_string()).or_default();
        tables.push((name.to_string(), table_type.to_string(), text.map(str::to_string)));
        tables.sort_by(|a, b| a.0.cmp(&b.0));
    }

    /// Make every `acquire` fail with the given driver message, or clear it
    pub fn set_unreachable(&self, message: Option<&str>) {
        self.lock().unreachable = message.map(str::to_string);
    }

    /// Make every write statement fail with the given driver message, or clear it
    pub fn set_write_failure(&self, message: Option<&str>) {
        self.lock().write_failure = message.map(str::to_string);
    }

    /// Raw stored name, including padding
    pub fn stored_name(&self, code: i32) -> Option<String> {
        self.lock().parts.get(&code).cloned()
    }

    pub fn part_count(&self) -> usize {
        self.lock().parts.len()
    }

    /// Sessions currently held by callers
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }

    /// Sessions handed out since creation
    pub fn acquired_sessions(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        // Poisoning is ignored
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for MemoryStore {
    fn acquire(&self) -> ConnectionResult<Box<dyn Session + '_>> {
        if let Some(message) = &self.lock().unreachable {
            return Err(ConnectionError::Open(message.clone()));
        }
        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            store: self,
            pending: Vec::new(),
        }))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Debug, Clone)]
enum Write {
    Upsert(i32, String),
    Remove(i32),
}

struct MemorySession<'a> {
    store: &'a MemoryStore,
    pending: Vec<Write>,
}

impl MemorySession<'_> {
    /// Committed parts with this session's own pending writes applied
    fn visible_parts(&self) -> BTreeMap<i32, String> {
        let mut parts = self.store.lock().parts.clone();
        apply(&mut parts, &self.pending);
        parts
    }

    fn write(&mut self, op: Write) {
        if self.store.autocommit {
            apply(&mut self.store.lock().parts, std::slice::from_ref(&op));
        } else {
            self.pending.push(op);
        }
    }
}

impl Session for MemorySession<'_> {
    fn query(&mut self, sql: &str, params: &[SqlParam]) -> ConnectionResult<Vec<Row>> {
        let store = self.store;
        let stmts = &store.statements;

        if sql == LIST_TABLES {
            let schema = text_param(params, 0)?;
            let state = store.lock();
            let rows = state
                .catalog
                .get(schema)
                .map(|tables| {
                    tables
                        .iter()
                        .map(|(name, kind, text)| {
                            Row::new(vec![Some(name.clone()), Some(kind.clone()), text.clone()])
                        })
                        .collect()
                })
                .unwrap_or_default();
            return Ok(rows);
        }

        let parts = self.visible_parts();
        let part_row = |(code, name): (&i32, &String)| Row::new(vec![Some(code.to_string()), Some(name.clone())]);

        if sql == stmts.select_all {
            Ok(parts.iter().map(part_row).collect())
        } else if sql == stmts.select_from {
            let from = int_param(params, 0)?;
            Ok(parts.range(from..).map(part_row).collect())
        } else if sql == stmts.select_one {
            let code = int_param(params, 0)?;
            Ok(parts.get_key_value(&code).map(part_row).into_iter().collect())
        } else if sql == stmts.exists {
            let code = int_param(params, 0)?;
            Ok(parts
                .get(&code)
                .map(|_| Row::new(vec![Some(code.to_string())]))
                .into_iter()
                .collect())
        } else {
            Err(ConnectionError::Statement(format!("unsupported query: {}", sql)))
        }
    }

    fn execute(&mut self, sql: &str, params: &[SqlParam]) -> ConnectionResult<()> {
        if let Some(message) = &self.store.lock().write_failure {
            return Err(ConnectionError::Statement(message.clone()));
        }
        let store = self.store;
        let stmts = &store.statements;

        if sql == stmts.insert {
            let code = int_param(params, 0)?;
            let name = text_param(params, 1)?.to_string();
            if self.visible_parts().contains_key(&code) {
                return Err(ConnectionError::Statement(format!(
                    "duplicate key value specified for BUNO {}",
                    code
                )));
            }
            self.write(Write::Upsert(code, pad(&name)));
        } else if sql == stmts.update {
            let name = text_param(params, 0)?.to_string();
            let code = int_param(params, 1)?;
            if self.visible_parts().contains_key(&code) {
                self.write(Write::Upsert(code, pad(&name)));
            }
        } else if sql == stmts.delete {
            let code = int_param(params, 0)?;
            self.write(Write::Remove(code));
        } else {
            return Err(ConnectionError::Statement(format!("unsupported statement: {}", sql)));
        }
        Ok(())
    }

    fn commit(&mut self) -> ConnectionResult<()> {
        let pending = std::mem::take(&mut self.pending);
        apply(&mut self.store.lock().parts, &pending);
        Ok(())
    }
}

impl Drop for MemorySession<'_> {
    fn drop(&mut self) {
        // Uncommitted writes roll back with the connection
        self.pending.clear();
        self.store.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

fn apply(parts: &mut BTreeMap<i32, String>, ops: &[Write]) {
    for op in ops {
        match op {
            Write::Upsert(code, name) => {
                parts.insert(*code, name.clone());
            }
            Write::Remove(code) => {
                parts.remove(code);
            }
        }
    }
}

fn pad(name: &str) -> String {
    format!("{:<width$}", name, width = NAME_MAX_LEN)
}

fn int_param(params: &[SqlParam], index: usize) -> ConnectionResult<i32> {
    match params.get(index) {
        Some(SqlParam::Int(value)) => Ok(*value),
        other => Err(ConnectionError::Statement(format!(
            "parameter {} must be an integer, got {:?}",
            index, other
        ))),
    }
}

fn text_param(params: &[SqlParam], index: usize) -> ConnectionResult<&str> {
    match params.get(index) {
        Some(SqlParam::Text(value)) => Ok(value.as_str()),
        other => Err(ConnectionError::Statement(format!(
            "parameter {} must be text, got {:?}",
            index, other
        ))),
    }
}
