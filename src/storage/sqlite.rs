//! SQLite storage implementation

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use rusqlite::{Connection, TransactionBehavior, params, params_from_iter};
use rusqlite::types::Value;
use serde::Serialize;
use crate::{Result, Error};
use super::schema::{self, Table, ID_COLUMN};

/// A fetched row: column name to stored value
pub type Row = BTreeMap<String, Value>;

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpsertOutcome {
    /// Newly assigned id on insert, the requested id on update
    pub id: i64,
    /// Rows written; 0 means the update matched no row
    pub affected: usize,
}

impl UpsertOutcome {
    pub fn is_noop(&self) -> bool {
        self.affected == 0
    }
}

/// SQLite-backed row store for the studio tables.
///
/// Holds no connection: every operation opens its own, performs a single
/// statement (plus schema checks) and drops it before returning.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteStore {
    pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

    /// Open a database file (creates it and its directory if missing)
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, Self::DEFAULT_BUSY_TIMEOUT)
    }

    /// Open a database file, waiting up to `busy_timeout` on a locked writer
    pub fn open_with_timeout(path: &Path, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self {
            path: path.to_path_buf(),
            busy_timeout,
        };
        store.initialize_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    /// Create any missing table. Existing tables and rows are left alone.
    pub fn initialize_schema(&self) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        for stmt in schema::all_schema_statements() {
            tx.execute(stmt, [])?;
        }
        tx.commit()?;
        tracing::info!("Schema ready at {}", self.path.display());
        Ok(())
    }

    // ========== Row Operations ==========

    /// Insert a row (`id` is `None`) or update the row with that id.
    ///
    /// Only the named columns are written. Updating an unknown id is not an
    /// error; it is reported as `affected == 0`.
    pub fn upsert(
        &self,
        table: Table,
        columns: &[&str],
        values: &[Value],
        id: Option<i64>,
    ) -> Result<UpsertOutcome> {
        let columns = assignment_columns(table, columns, values)?;
        let conn = self.connect()?;

        let outcome = match id {
            None => {
                let placeholders: Vec<String> =
                    (1..=columns.len()).map(|i| format!("?{}", i)).collect();
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    table,
                    columns.join(", "),
                    placeholders.join(", ")
                );
                let affected = conn.execute(&sql, params_from_iter(values.iter()))?;
                UpsertOutcome {
                    id: conn.last_insert_rowid(),
                    affected,
                }
            }
            Some(id) => {
                let set_clause: Vec<String> = columns
                    .iter()
                    .enumerate()
                    .map(|(i, col)| format!("{} = ?{}", col, i + 1))
                    .collect();
                let sql = format!(
                    "UPDATE {} SET {} WHERE {} = ?{}",
                    table,
                    set_clause.join(", "),
                    ID_COLUMN,
                    columns.len() + 1
                );
                let id_value = Value::Integer(id);
                let bound = values.iter().chain(std::iter::once(&id_value));
                let affected = conn.execute(&sql, params_from_iter(bound))?;
                UpsertOutcome { id, affected }
            }
        };

        tracing::debug!(
            "upsert {} id={} affected={}",
            table,
            outcome.id,
            outcome.affected
        );
        Ok(outcome)
    }

    /// Delete every row of `table` whose `column` equals `value`.
    ///
    /// The column must be declared for the table and present in the live
    /// schema. Returns the number of deleted rows.
    pub fn delete(&self, table: Table, column: &str, value: &Value) -> Result<usize> {
        let column = table.column(column)?;
        let mut conn = self.connect()?;
        // IMMEDIATE: a deferred read-then-write upgrade returns SQLITE_BUSY
        // without consulting the busy timeout.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let present: i64 = tx.query_row(
            "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
            params![table.as_str(), column],
            |row| row.get(0),
        )?;
        if present == 0 {
            return Err(Error::invalid(format!(
                "table '{}' in {} has no column '{}'",
                table,
                self.path.display(),
                column
            )));
        }

        let sql = format!("DELETE FROM {} WHERE {} = ?1", table, column);
        let deleted = tx.execute(&sql, params![value])?;
        tx.commit()?;

        tracing::debug!("delete {} where {} deleted={}", table, column, deleted);
        Ok(deleted)
    }

    /// Fetch rows from `table`.
    ///
    /// `columns` of `None` (or empty) selects every column. `filter` is the
    /// text after `WHERE` and may end with an ORDER BY / LIMIT; its `?`
    /// placeholders are bound from `params` in order.
    pub fn select(
        &self,
        table: Table,
        columns: Option<&[&str]>,
        filter: Option<&str>,
        params: &[Value],
    ) -> Result<Vec<Row>> {
        let projection = match columns {
            Some(cols) if !cols.is_empty() => cols
                .iter()
                .map(|c| table.column(c))
                .collect::<Result<Vec<_>>>()?
                .join(", "),
            _ => "*".to_string(),
        };

        let mut sql = format!("SELECT {} FROM {}", projection, table);
        if let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql).map_err(classify_prepare_error)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let mut map = Row::new();
                for (i, name) in names.iter().enumerate() {
                    map.insert(name.clone(), row.get::<_, Value>(i)?);
                }
                Ok(map)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!("select {} returned {} rows", table, rows.len());
        Ok(rows)
    }

    /// Count rows in a table
    pub fn count(&self, table: Table) -> Result<usize> {
        let conn = self.connect()?;
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            news: self.count(Table::News)?,
            services: self.count(Table::Service)?,
            clients: self.count(Table::Clients)?,
            reviews: self.count(Table::Reviews)?,
        })
    }
}

/// Validate an upsert's column list and map it onto declared identifiers
fn assignment_columns(
    table: Table,
    columns: &[&str],
    values: &[Value],
) -> Result<Vec<&'static str>> {
    if columns.is_empty() {
        return Err(Error::invalid("column list is empty"));
    }
    if columns.len() != values.len() {
        return Err(Error::invalid(format!(
            "{} columns but {} values",
            columns.len(),
            values.len()
        )));
    }

    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(columns.len());
    for col in columns {
        let col = table.column(col)?;
        if col == ID_COLUMN {
            return Err(Error::invalid("the id column cannot be assigned"));
        }
        if !seen.insert(col) {
            return Err(Error::invalid(format!("column '{}' listed twice", col)));
        }
        resolved.push(col);
    }
    Ok(resolved)
}

/// Unknown columns in a caller's filter are the caller's mistake, not the store's
fn classify_prepare_error(err: rusqlite::Error) -> Error {
    let text = err.to_string();
    if text.contains("no such column") {
        tracing::debug!("select rejected: {}", text);
        Error::invalid("unknown column in select")
    } else {
        Error::Storage(err)
    }
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub news: usize,
    pub services: usize,
    pub clients: usize,
    pub reviews: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  News: {}", self.news)?;
        writeln!(f, "  Services: {}", self.services)?;
        writeln!(f, "  Clients: {}", self.clients)?;
        writeln!(f, "  Reviews: {}", self.reviews)
    }
}
