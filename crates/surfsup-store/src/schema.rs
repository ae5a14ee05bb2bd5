//! Declared layout of the external observation database.
//!
//! The service never creates or migrates these tables. They are checked once
//! at startup so a wrong file fails loudly instead of on the first request.

use rusqlite::Connection;

use crate::error::{StoreError, StoreResult};

/// A table and the columns the queries rely on.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Daily readings: one row per station per date.
pub const MEASUREMENT: TableSchema = TableSchema {
    name: "measurement",
    columns: &["station", "date", "prcp", "tobs"],
};

/// Station metadata.
pub const STATION: TableSchema = TableSchema {
    name: "station",
    columns: &["station", "name", "latitude", "longitude", "elevation"],
};

pub const TABLES: [TableSchema; 2] = [MEASUREMENT, STATION];

impl TableSchema {
    /// Columns of this table missing from the database.
    ///
    /// Returns `None` when the table itself does not exist.
    pub fn missing_columns(&self, conn: &Connection) -> StoreResult<Option<Vec<&'static str>>> {
        let present: Vec<String> = conn
            .prepare(&format!("PRAGMA table_info({})", self.name))?
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;

        if present.is_empty() {
            return Ok(None);
        }

        Ok(Some(
            self.columns
                .iter()
                .copied()
                .filter(|col| !present.iter().any(|p| p.eq_ignore_ascii_case(col)))
                .collect(),
        ))
    }
}

/// Check every declared table against the database.
pub fn verify(conn: &Connection) -> StoreResult<()> {
    let mut problems = Vec::new();

    for table in TABLES {
        match table.missing_columns(conn)? {
            None => problems.push(format!("missing table '{}'", table.name)),
            Some(missing) if !missing.is_empty() => problems.push(format!(
                "table '{}' lacks column(s) {}",
                table.name,
                missing.join(", ")
            )),
            Some(_) => {}
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(StoreError::schema(problems.join("; ")))
    }
}
