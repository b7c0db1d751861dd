use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

/// Schema assumed for unqualified table names.
pub const DEFAULT_SCHEMA: &str = "public";

/// A table identifier split into schema and bare table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QualifiedName {
    schema: String,
    table: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QualifiedNameError {
    #[error("'{0}' has more than one schema separator")]
    TooManySeparators(String),

    #[error("'{0}' has an empty schema or table segment")]
    EmptySegment(String),
}

impl QualifiedName {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Split "schema.table" or "table"; the latter defaults to [`DEFAULT_SCHEMA`].
    pub fn parse(identifier: &str) -> Result<Self, QualifiedNameError> {
        let parts: Vec<&str> = identifier.split('.').collect();
        let (schema, table) = match parts.as_slice() {
            [table] => (DEFAULT_SCHEMA, *table),
            [schema, table] => (*schema, *table),
            _ => {
                return Err(QualifiedNameError::TooManySeparators(
                    identifier.to_string(),
                ));
            }
        };

        if schema.is_empty() || table.is_empty() {
            return Err(QualifiedNameError::EmptySegment(identifier.to_string()));
        }

        Ok(Self::new(schema, table))
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl FromStr for QualifiedName {
    type Err = QualifiedNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qualified() {
        let name = QualifiedName::parse("public.customer").unwrap();
        assert_eq!(name.schema(), "public");
        assert_eq!(name.table(), "customer");
    }

    #[test]
    fn test_parse_defaults_schema() {
        let name = QualifiedName::parse("customer").unwrap();
        assert_eq!(name, QualifiedName::new("public", "customer"));
    }

    #[test]
    fn test_parse_other_schema() {
        let name: QualifiedName = "sales.invoice".parse().unwrap();
        assert_eq!(name.schema(), "sales");
        assert_eq!(name.to_string(), "sales.invoice");
    }

    #[test]
    fn test_parse_too_many_separators() {
        assert_eq!(
            QualifiedName::parse("a.b.c"),
            Err(QualifiedNameError::TooManySeparators("a.b.c".to_string()))
        );
    }

    #[test]
    fn test_parse_empty_segments() {
        assert!(matches!(
            QualifiedName::parse("public."),
            Err(QualifiedNameError::EmptySegment(_))
        ));
        assert!(matches!(
            QualifiedName::parse(""),
            Err(QualifiedNameError::EmptySegment(_))
        ));
    }
}
