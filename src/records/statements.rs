//! SQL statements
//!
//! All values are bound as parameters. The part table name is the only
//! interpolated piece, and it is checked against the system-name character
//! set before any statement is built.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::ConfigError;

/// Default part master table
pub const DEFAULT_PART_TABLE: &str = "GOM.BUHIN";

/// Tables of one schema, ordered by name
pub const LIST_TABLES: &str = "SELECT TABLE_NAME, TABLE_TYPE, TABLE_TEXT \
     FROM QSYS2.SYSTABLES \
     WHERE TABLE_SCHEMA = ? \
     ORDER BY TABLE_NAME";

fn table_identifier() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_#@$]{1,128}(\.[A-Za-z0-9_#@$]{1,128})?$")
            .expect("table identifier pattern is valid")
    })
}

/// Statements against the part table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartStatements {
    pub table: String,
    pub select_all: String,
    pub select_from: String,
    pub select_one: String,
    pub exists: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
}

impl PartStatements {
    /// Build the statement set for `table` (`TABLE` or `LIBRARY.TABLE`)
    pub fn new(table: &str) -> Result<Self, ConfigError> {
        if !table_identifier().is_match(table) {
            return Err(ConfigError::invalid("AS400_PART_TABLE", table));
        }
        let t = table.to_uppercase();

        Ok(Self {
            select_all: format!("SELECT BUNO, BUNM FROM {} ORDER BY BUNO", t),
            select_from: format!("SELECT BUNO, BUNM FROM {} WHERE BUNO >= ? ORDER BY BUNO", t),
            select_one: format!("SELECT BUNO, BUNM FROM {} WHERE BUNO = ?", t),
            exists: format!("SELECT BUNO FROM {} WHERE BUNO = ?", t),
            insert: format!("INSERT INTO {} (BUNO, BUNM) VALUES (?, ?)", t),
            update: format!("UPDATE {} SET BUNM = ? WHERE BUNO = ?", t),
            delete: format!("DELETE FROM {} WHERE BUNO = ?", t),
            table: t,
        })
    }
}

impl Default for PartStatements {
    fn default() -> Self {
        Self::new(DEFAULT_PART_TABLE).expect("default part table is a valid identifier")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_use_placeholders() {
        let stmts = PartStatements::new("gom.buhin").unwrap();
        assert_eq!(stmts.table, "GOM.BUHIN");
        assert_eq!(stmts.select_one, "SELECT BUNO, BUNM FROM GOM.BUHIN WHERE BUNO = ?");
        assert_eq!(stmts.update, "UPDATE GOM.BUHIN SET BUNM = ? WHERE BUNO = ?");
        assert!(stmts.select_all.ends_with("ORDER BY BUNO"));
    }

    #[test]
    fn test_rejects_unsafe_table_names() {
        for bad in ["", "BUHIN; DROP TABLE X", "A.B.C", "GOM.", "BU HIN", "GOM.BUHIN--"] {
            assert!(PartStatements::new(bad).is_err(), "{:?} accepted", bad);
        }
        assert!(PartStatements::new("BUHIN").is_ok());
        assert!(PartStatements::new("QGPL.#PARTS").is_ok());
    }
}
