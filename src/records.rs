//! Typed records for the studio tables
//!
//! Each record maps onto one [`Table`] and is persisted through the generic
//! row operations of [`SqliteStore`]. An `id` of `None` means "not stored yet".

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use crate::storage::{Row, SqliteStore, Table, UpsertOutcome};
use crate::Result;

/// A row type bound to one table
pub trait Record: Sized {
    const TABLE: Table;

    fn id(&self) -> Option<i64>;

    /// Column/value pairs written on save (never includes `id`)
    fn fields(&self) -> Vec<(&'static str, Value)>;

    fn from_row(row: &Row) -> Self;
}

/// News post shown at the top of the landing page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: Option<i64>,
    pub name: String,
    pub text: String,
}

/// A class or package the studio offers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    /// Free-form, e.g. "400 UAH" or "on request"
    pub price: String,
    pub img: Option<String>,
}

/// Contact details left by a (prospective) student.
/// Emails are not unique; the same person may sign up twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Option<i64>,
    pub name: String,
    pub text: String,
    pub img: Option<String>,
}

impl Service {
    /// Image reference, if one is set and non-empty
    pub fn image(&self) -> Option<&str> {
        self.img.as_deref().filter(|s| !s.is_empty())
    }
}

impl Review {
    pub fn image(&self) -> Option<&str> {
        self.img.as_deref().filter(|s| !s.is_empty())
    }
}

fn text_value(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn optional_text_value(s: &Option<String>) -> Value {
    s.as_deref().map(text_value).unwrap_or(Value::Null)
}

/// Read a column as text. NULL and missing columns read as `None`.
pub fn text_field(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Text(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Blob(b) => Some(String::from_utf8_lossy(b).into_owned()),
        Value::Null => None,
    }
}

fn id_field(row: &Row) -> Option<i64> {
    match row.get("id")? {
        Value::Integer(i) => Some(*i),
        _ => None,
    }
}

impl Record for NewsItem {
    const TABLE: Table = Table::News;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![("name", text_value(&self.name)), ("text", text_value(&self.text))]
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: id_field(row),
            name: text_field(row, "name").unwrap_or_default(),
            text: text_field(row, "text").unwrap_or_default(),
        }
    }
}

impl Record for Service {
    const TABLE: Table = Table::Service;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", text_value(&self.name)),
            ("description", text_value(&self.description)),
            ("price", text_value(&self.price)),
            ("img", optional_text_value(&self.img)),
        ]
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: id_field(row),
            name: text_field(row, "name").unwrap_or_default(),
            description: text_field(row, "description").unwrap_or_default(),
            price: text_field(row, "price").unwrap_or_default(),
            img: text_field(row, "img"),
        }
    }
}

impl Record for Client {
    const TABLE: Table = Table::Clients;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", text_value(&self.name)),
            ("email", text_value(&self.email)),
            ("phone", text_value(&self.phone)),
        ]
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: id_field(row),
            name: text_field(row, "name").unwrap_or_default(),
            email: text_field(row, "email").unwrap_or_default(),
            phone: text_field(row, "phone").unwrap_or_default(),
        }
    }
}

impl Record for Review {
    const TABLE: Table = Table::Reviews;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", text_value(&self.name)),
            ("text", text_value(&self.text)),
            ("img", optional_text_value(&self.img)),
        ]
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: id_field(row),
            name: text_field(row, "name").unwrap_or_default(),
            text: text_field(row, "text").unwrap_or_default(),
            img: text_field(row, "img"),
        }
    }
}

// ========== Typed Repository Operations ==========

impl SqliteStore {
    /// Insert the record, or update it in place when it carries an id
    pub fn save<R: Record>(&self, record: &R) -> Result<UpsertOutcome> {
        let (columns, values): (Vec<&str>, Vec<Value>) = record.fields().into_iter().unzip();
        self.upsert(R::TABLE, &columns, &values, record.id())
    }

    /// All records of a kind, oldest first
    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        let rows = self.select(R::TABLE, None, Some("1 = 1 ORDER BY id"), &[])?;
        Ok(rows.iter().map(R::from_row).collect())
    }

    pub fn get<R: Record>(&self, id: i64) -> Result<Option<R>> {
        let rows = self.select(R::TABLE, None, Some("id = ?"), &[Value::Integer(id)])?;
        Ok(rows.first().map(R::from_row))
    }

    /// Delete by id; returns 0 when nothing matched
    pub fn remove<R: Record>(&self, id: i64) -> Result<usize> {
        self.delete(R::TABLE, "id", &Value::Integer(id))
    }
}
