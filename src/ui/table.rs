use rusqlite::types::Value;
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use crate::storage::{DbStats, Row};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Table")]
    pub label: String,
    #[tabled(rename = "Rows")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            label: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("news", &stats.news.to_string());
    builder.add_row("service", &stats.services.to_string());
    builder.add_row("clients", &stats.clients.to_string());
    builder.add_row("reviews", &stats.reviews.to_string());
    builder.build()
}

/// Plain-text rendering of a stored value; NULL shows as an empty cell
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Render fetched rows with one column per field, `id` first
pub fn rows_table(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };

    let mut columns: Vec<&String> = first.keys().collect();
    columns.sort_by_key(|c| c.as_str() != "id");

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.to_string()));
    for row in rows {
        builder.push_record(
            columns
                .iter()
                .map(|c| row.get(*c).map(display_value).unwrap_or_default()),
        );
    }

    builder.build().with(Style::rounded()).to_string()
}
