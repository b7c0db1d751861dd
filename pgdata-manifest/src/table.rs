use pgdata_core::{QualifiedName, QualifiedNameError};
use serde::Deserialize;

/// Primary key assumed when a table declares none.
pub const DEFAULT_PRIMARY_KEY: &[&str] = &["id"];

/// A `[[tables]]` declaration.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    /// Table identifier, optionally schema-qualified ("schema.table")
    pub table_name: String,

    /// Generated type name; defaults to the public case of the bare table name
    pub struct_name: Option<String>,

    /// Ordered primary key column names; defaults to ["id"]
    pub primary_key: Option<Vec<String>>,

    /// Per-column field-name overrides
    #[serde(default)]
    pub columns: Vec<ColumnOverride>,
}

/// A `[[tables.columns]]` field-name override.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ColumnOverride {
    pub column_name: String,
    pub field_name: String,
}

impl TableConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            struct_name: None,
            primary_key: None,
            columns: Vec::new(),
        }
    }

    pub fn with_struct_name(mut self, struct_name: impl Into<String>) -> Self {
        self.struct_name = Some(struct_name.into());
        self
    }

    pub fn with_primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_override(
        mut self,
        column_name: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Self {
        self.columns.push(ColumnOverride {
            column_name: column_name.into(),
            field_name: field_name.into(),
        });
        self
    }

    pub fn qualified_name(&self) -> Result<QualifiedName, QualifiedNameError> {
        QualifiedName::parse(&self.table_name)
    }

    /// Configured primary key column names, or the default.
    pub fn primary_key_columns(&self) -> Vec<&str> {
        match &self.primary_key {
            Some(columns) => columns.iter().map(String::as_str).collect(),
            None => DEFAULT_PRIMARY_KEY.to_vec(),
        }
    }

    /// The configured field name for a column, if overridden.
    pub fn field_override(&self, column_name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.column_name == column_name)
            .map(|c| c.field_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_default() {
        let table = TableConfig::new("customer");
        assert_eq!(table.primary_key_columns(), vec!["id"]);
    }

    #[test]
    fn test_primary_key_configured_order() {
        let table = TableConfig::new("semester").with_primary_key(["year", "season"]);
        assert_eq!(table.primary_key_columns(), vec!["year", "season"]);
    }

    #[test]
    fn test_field_override() {
        let table = TableConfig::new("customer").with_override("birth_date", "Birthday");
        assert_eq!(table.field_override("birth_date"), Some("Birthday"));
        assert_eq!(table.field_override("first_name"), None);
    }

    #[test]
    fn test_qualified_name() {
        let table = TableConfig::new("sales.invoice");
        let name = table.qualified_name().unwrap();
        assert_eq!(name.schema(), "sales");
        assert_eq!(name.table(), "invoice");
        assert!(TableConfig::new("a.b.c").qualified_name().is_err());
    }
}
