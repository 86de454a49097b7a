//! Catalog entries
//!
//! Read-only table metadata from `QSYS2.SYSTABLES`.

use serde::{Deserialize, Serialize};

/// One table in a library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub table_name: String,
    pub table_type: String,
    /// Free-text description; empty when the catalog has none
    pub table_text: String,
}

/// Tables of one library, ordered by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableListing {
    pub library: String,
    pub tables: Vec<TableEntry>,
}

/// Libraries are stored upper-case in the catalog
pub fn normalize_library(library: &str) -> String {
    library.to_uppercase()
}
