//! Minimal composable SELECT builder used by the filter pipeline.
//!
//! Every narrowing method appends one `AND` clause and its bound parameter;
//! nothing is interpolated into the SQL text except static column names.

use crate::db::pool::UNICODE_LOWER;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use rusqlite::types::Value;

/// A table related to the base row through a foreign key pointing at `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub table: &'static str,
    pub foreign_key: &'static str,
    pub column: &'static str,
}

/// Parameter as supplied by the caller. Dates stay raw until bind time so
/// that a malformed value fails in the persistence layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Date(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    select: String,
    alias: &'static str,
    clauses: Vec<String>,
    params: Vec<SqlParam>,
    order_by: Option<&'static str>,
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for ch in term.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

impl SqlQuery {
    /// `select` is the full `SELECT … FROM … [JOIN …]` head; `alias` names
    /// the base table inside it.
    pub fn new(select: &str, alias: &'static str) -> Self {
        Self {
            select: select.to_string(),
            alias,
            clauses: Vec::new(),
            params: Vec::new(),
            order_by: None,
        }
    }

    pub fn alias(&self) -> &'static str {
        self.alias
    }

    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn order_by(mut self, order: &'static str) -> Self {
        self.order_by = Some(order);
        self
    }

    pub fn where_eq(mut self, column: &str, value: &str) -> Self {
        self.clauses.push(format!("{column} = ?"));
        self.params.push(SqlParam::Text(value.to_string()));
        self
    }

    pub fn where_int(mut self, column: &str, value: i64) -> Self {
        self.clauses.push(format!("{column} = ?"));
        self.params.push(SqlParam::Int(value));
        self
    }

    /// Inclusive lower bound on the date part of `column`.
    pub fn where_date_from(mut self, column: &str, raw: &str) -> Self {
        self.clauses.push(format!("date({column}) >= ?"));
        self.params.push(SqlParam::Date(raw.to_string()));
        self
    }

    /// Inclusive upper bound on the date part of `column`.
    pub fn where_date_to(mut self, column: &str, raw: &str) -> Self {
        self.clauses.push(format!("date({column}) <= ?"));
        self.params.push(SqlParam::Date(raw.to_string()));
        self
    }

    pub fn where_flag(self, column: &str, value: bool) -> Self {
        self.where_int(column, i64::from(value))
    }

    /// Case-insensitive "contains" on any of `columns`. Both sides are
    /// lowercased with Unicode rules; the connection must come from `DbPool`.
    pub fn where_search(mut self, columns: &[&str], term: &str) -> Self {
        if columns.is_empty() {
            return self;
        }
        let pattern = escape_like(term);
        let ors: Vec<String> = columns
            .iter()
            .map(|c| format!("{UNICODE_LOWER}({c}) LIKE ? ESCAPE '\\'"))
            .collect();
        self.clauses.push(format!("({})", ors.join(" OR ")));
        for _ in columns {
            self.params.push(SqlParam::Text(pattern.clone()));
        }
        self
    }

    /// Rows whose related collection contains a row with `column = value`.
    pub fn where_related(mut self, rel: &Relation, value: &str) -> Self {
        self.clauses.push(format!(
            "EXISTS (SELECT 1 FROM {table} r WHERE r.{fk} = {alias}.id AND r.{col} = ?)",
            table = rel.table,
            fk = rel.foreign_key,
            alias = self.alias,
            col = rel.column,
        ));
        self.params.push(SqlParam::Text(value.to_string()));
        self
    }

    pub fn to_sql(&self) -> String {
        let mut sql = self.select.clone();
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        if let Some(order) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        sql
    }

    /// Convert parameters into SQLite values. Date parameters are parsed
    /// here; a malformed one is reported as a validation error.
    pub fn bind_values(&self) -> AppResult<Vec<Value>> {
        self.params
            .iter()
            .map(|p| match p {
                SqlParam::Text(s) => Ok(Value::Text(s.clone())),
                SqlParam::Int(i) => Ok(Value::Integer(*i)),
                SqlParam::Date(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map(|d| Value::Text(d.format("%Y-%m-%d").to_string()))
                    .map_err(|_| {
                        AppError::Validation(format!("'{raw}' is not a valid date (YYYY-MM-DD)"))
                    }),
            })
            .collect()
    }
}
