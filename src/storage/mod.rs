//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - news(id, name, text)
//! - service(id, name, description, price, img)
//! - clients(id, name, email, phone)
//! - reviews(id, name, text, img)
//!
//! Table and column names are only ever taken from [`Table`]; values are
//! always bound as parameters.

pub mod schema;
pub mod sqlite;

pub use schema::Table;
pub use sqlite::{SqliteStore, Row, UpsertOutcome, DbStats};
