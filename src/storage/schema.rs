//! Database schema definitions

use std::fmt;
use std::str::FromStr;
use crate::{Error, Result};

/// SQL to create the news table
pub const CREATE_NEWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS news (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    text TEXT
)
"#;

/// SQL to create the service table
/// Price is free-form text ("from 400 UAH", "on request")
pub const CREATE_SERVICE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS service (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    description TEXT,
    price TEXT,
    img TEXT
)
"#;

/// SQL to create the clients table
pub const CREATE_CLIENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    email TEXT,
    phone TEXT
)
"#;

/// SQL to create the reviews table
pub const CREATE_REVIEWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    text TEXT,
    img TEXT DEFAULT NULL
)
"#;

/// Name of the identifier column shared by every table
pub const ID_COLUMN: &str = "id";

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    Table::ALL.iter().map(|t| t.create_sql()).collect()
}

/// The allow-list of tables the row access layer may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    News,
    Service,
    Clients,
    Reviews,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::News, Table::Service, Table::Clients, Table::Reviews];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::News => "news",
            Table::Service => "service",
            Table::Clients => "clients",
            Table::Reviews => "reviews",
        }
    }

    /// Declared columns, `id` first
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::News => &["id", "name", "text"],
            Table::Service => &["id", "name", "description", "price", "img"],
            Table::Clients => &["id", "name", "email", "phone"],
            Table::Reviews => &["id", "name", "text", "img"],
        }
    }

    pub fn create_sql(&self) -> &'static str {
        match self {
            Table::News => CREATE_NEWS_TABLE,
            Table::Service => CREATE_SERVICE_TABLE,
            Table::Clients => CREATE_CLIENTS_TABLE,
            Table::Reviews => CREATE_REVIEWS_TABLE,
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    /// Resolve a caller-supplied column name to the declared identifier.
    ///
    /// The returned `&'static str` is the only form of a column name that
    /// is ever embedded in SQL text.
    pub fn column(&self, column: &str) -> Result<&'static str> {
        self.columns()
            .iter()
            .copied()
            .find(|c| *c == column)
            .ok_or_else(|| {
                Error::invalid(format!("table '{}' has no column '{}'", self.as_str(), column))
            })
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Table::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::invalid(format!("unknown table '{}'", s)))
    }
}
