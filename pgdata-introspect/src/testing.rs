//! In-memory catalog for tests.
//!
//! Enabled by the `testing` feature.

use std::collections::{HashMap, HashSet};

use pgdata_core::QualifiedName;

use crate::{Catalog, ColumnRow, ConstraintKind, ConstraintRow, Error, Result};

/// A [`Catalog`] serving fixed tables.
///
/// Constraint rows are returned in the same order as the PostgreSQL
/// catalog query: by constraint type, then name, keeping each
/// constraint's columns in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    tables: HashMap<QualifiedName, MemoryTable>,
    failing: HashSet<QualifiedName>,
}

/// Columns and constraints of one in-memory table.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    columns: Vec<ColumnRow>,
    constraints: Vec<ConstraintRow>,
}

fn parse_name(identifier: &str) -> QualifiedName {
    QualifiedName::parse(identifier)
        .unwrap_or_else(|e| panic!("invalid in-memory table name: {e}"))
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, identifier: &str, table: MemoryTable) -> Self {
        self.tables.insert(parse_name(identifier), table);
        self
    }

    /// Make every query against `identifier` fail.
    pub fn failing(mut self, identifier: &str) -> Self {
        self.failing.insert(parse_name(identifier));
        self
    }

    fn check(&self, name: &QualifiedName) -> Result<Option<&MemoryTable>> {
        if self.failing.contains(name) {
            return Err(Error::Query {
                table: name.to_string(),
                source: sqlx::Error::Protocol("in-memory catalog failure".to_string()),
            });
        }
        Ok(self.tables.get(name))
    }
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column at the next ordinal position.
    pub fn column(mut self, name: &str, data_type: &str) -> Self {
        let ordinal = self.columns.len() as i32 + 1;
        self.columns.push(ColumnRow::new(name, data_type, ordinal));
        self
    }

    pub fn primary_key(self, constraint: &str, columns: &[&str]) -> Self {
        self.constraint(ConstraintKind::PrimaryKey, constraint, columns)
    }

    pub fn unique(self, constraint: &str, columns: &[&str]) -> Self {
        self.constraint(ConstraintKind::Unique, constraint, columns)
    }

    /// Add a single constraint row as-is.
    pub fn raw_constraint(mut self, row: ConstraintRow) -> Self {
        self.constraints.push(row);
        self
    }

    fn constraint(mut self, kind: ConstraintKind, constraint: &str, columns: &[&str]) -> Self {
        self.constraints.extend(
            columns
                .iter()
                .map(|column| ConstraintRow::new(kind, constraint, *column)),
        );
        self
    }
}

impl Catalog for MemoryCatalog {
    async fn columns(&self, name: &QualifiedName) -> Result<Vec<ColumnRow>> {
        Ok(self
            .check(name)?
            .map(|table| table.columns.clone())
            .unwrap_or_default())
    }

    async fn constraints(&self, name: &QualifiedName) -> Result<Vec<ConstraintRow>> {
        let mut rows = self
            .check(name)?
            .map(|table| table.constraints.clone())
            .unwrap_or_default();
        rows.sort_by(|a, b| {
            (a.kind.as_catalog(), &a.constraint_name)
                .cmp(&(b.kind.as_catalog(), &b.constraint_name))
        });
        Ok(rows)
    }
}
