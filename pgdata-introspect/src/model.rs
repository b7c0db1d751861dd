//! Resolved table metadata and the raw catalog rows it is built from.

use pgdata_core::QualifiedName;
use pgdata_manifest::ColumnOverride;
use serde::{Serialize, ser::SerializeStruct};

/// One row of the column listing for a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub column_name: String,
    pub data_type: String,
    pub ordinal_position: i32,
}

impl ColumnRow {
    pub fn new(
        column_name: impl Into<String>,
        data_type: impl Into<String>,
        ordinal_position: i32,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            data_type: data_type.into(),
            ordinal_position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
}

impl ConstraintKind {
    /// Parse an `information_schema` constraint type.
    pub fn from_catalog(constraint_type: &str) -> Option<Self> {
        match constraint_type {
            "PRIMARY KEY" => Some(ConstraintKind::PrimaryKey),
            "UNIQUE" => Some(ConstraintKind::Unique),
            _ => None,
        }
    }

    pub fn as_catalog(&self) -> &'static str {
        match self {
            ConstraintKind::PrimaryKey => "PRIMARY KEY",
            ConstraintKind::Unique => "UNIQUE",
        }
    }
}

/// One (constraint, column) pair of a primary key or unique constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintRow {
    pub kind: ConstraintKind,
    pub constraint_name: String,
    pub column_name: String,
}

impl ConstraintRow {
    pub fn new(
        kind: ConstraintKind,
        constraint_name: impl Into<String>,
        column_name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            constraint_name: constraint_name.into(),
            column_name: column_name.into(),
        }
    }
}

/// A named constraint and its columns in key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateKey {
    pub name: String,
    pub columns: Vec<String>,
}

impl CandidateKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }
}

/// Primary and unique constraints of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyConstraints {
    pub primary: Option<CandidateKey>,
    pub unique: Vec<CandidateKey>,
    /// Primary key constraint names seen after the first one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_primary: Vec<String>,
}

impl KeyConstraints {
    /// Group rows ordered by (constraint type, constraint name, column
    /// position) into keys, in a single pass.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = ConstraintRow>,
    {
        rows.into_iter().fold(Self::default(), |mut keys, row| {
            keys.push_row(row);
            keys
        })
    }

    fn push_row(&mut self, row: ConstraintRow) {
        match row.kind {
            ConstraintKind::PrimaryKey => match &mut self.primary {
                None => {
                    self.primary = Some(CandidateKey {
                        name: row.constraint_name,
                        columns: vec![row.column_name],
                    });
                }
                Some(primary) => {
                    if primary.name != row.constraint_name
                        && !self.extra_primary.contains(&row.constraint_name)
                    {
                        self.extra_primary.push(row.constraint_name);
                    }
                    primary.columns.push(row.column_name);
                }
            },
            ConstraintKind::Unique => match self.unique.last_mut() {
                Some(current) if current.name == row.constraint_name => {
                    current.columns.push(row.column_name);
                }
                _ => self.unique.push(CandidateKey {
                    name: row.constraint_name,
                    columns: vec![row.column_name],
                }),
            },
        }
    }
}

/// A catalog column with its derived names and types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub column_name: String,
    pub data_type: String,
    pub ordinal_position: i32,
    /// Public identifier used as the struct field name
    pub field_name: String,
    /// Private identifier used for locals and parameters
    pub var_name: String,
    pub value_type: String,
    pub wrapper_type: String,
}

impl From<ColumnRow> for Column {
    fn from(row: ColumnRow) -> Self {
        Self {
            column_name: row.column_name,
            data_type: row.data_type,
            ordinal_position: row.ordinal_position,
            field_name: String::new(),
            var_name: String::new(),
            value_type: String::new(),
            wrapper_type: String::new(),
        }
    }
}

/// Fully resolved metadata for one configured table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: QualifiedName,
    /// Identifier as written in pgdata.toml
    pub table_name: String,
    pub struct_name: String,
    /// Columns in ordinal order
    pub columns: Vec<Column>,
    pub keys: KeyConstraints,
    pub overrides: Vec<ColumnOverride>,
    /// Primary key column names in configured order
    primary_key: Vec<String>,
}

impl Table {
    pub fn new(
        name: QualifiedName,
        table_name: impl Into<String>,
        struct_name: impl Into<String>,
    ) -> Self {
        Self {
            name,
            table_name: table_name.into(),
            struct_name: struct_name.into(),
            columns: Vec::new(),
            keys: KeyConstraints::default(),
            overrides: Vec::new(),
            primary_key: Vec::new(),
        }
    }

    pub fn column(&self, column_name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.column_name == column_name)
    }

    pub(crate) fn set_primary_key(&mut self, columns: Vec<String>) {
        self.primary_key = columns;
    }

    /// Primary key columns in configured order. Names no longer present
    /// in `columns` are skipped.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.primary_key.iter().filter_map(|name| self.column(name))
    }

    pub fn is_primary_key(&self, column_name: &str) -> bool {
        self.primary_key.iter().any(|name| name == column_name)
    }

    /// Columns outside the primary key, in ordinal order.
    pub fn non_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| !self.is_primary_key(&c.column_name))
    }

    /// Unique constraints whose columns all resolve, with the columns in
    /// constraint order.
    pub fn unique_keys(&self) -> impl Iterator<Item = (&CandidateKey, Vec<&Column>)> {
        self.keys.unique.iter().filter_map(|key| {
            let columns: Option<Vec<&Column>> =
                key.columns.iter().map(|name| self.column(name)).collect();
            columns.map(|columns| (key, columns))
        })
    }
}

impl Serialize for Table {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let primary_key: Vec<&str> = self
            .primary_key_columns()
            .map(|c| c.column_name.as_str())
            .collect();

        let mut state = serializer.serialize_struct("Table", 6)?;
        state.serialize_field("schema", self.name.schema())?;
        state.serialize_field("table", self.name.table())?;
        state.serialize_field("struct_name", &self.struct_name)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("primary_key", &primary_key)?;
        state.serialize_field("keys", &self.keys)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(name: &str, column: &str) -> ConstraintRow {
        ConstraintRow::new(ConstraintKind::PrimaryKey, name, column)
    }

    fn unique(name: &str, column: &str) -> ConstraintRow {
        ConstraintRow::new(ConstraintKind::Unique, name, column)
    }

    #[test]
    fn test_group_unique_constraints() {
        let keys = KeyConstraints::from_rows([
            pk("customer_pkey", "id"),
            unique("customer_email_key", "email"),
            unique("customer_name_key", "first_name"),
            unique("customer_name_key", "last_name"),
        ]);

        let primary = keys.primary.unwrap();
        assert_eq!(primary.name, "customer_pkey");
        assert_eq!(primary.columns, vec!["id"]);

        assert_eq!(keys.unique.len(), 2);
        assert_eq!(keys.unique[0].name, "customer_email_key");
        assert_eq!(keys.unique[0].columns, vec!["email"]);
        assert_eq!(keys.unique[1].name, "customer_name_key");
        assert_eq!(keys.unique[1].columns, vec!["first_name", "last_name"]);
        assert!(keys.extra_primary.is_empty());
    }

    #[test]
    fn test_no_constraints() {
        let keys = KeyConstraints::from_rows(Vec::new());
        assert!(keys.primary.is_none());
        assert!(keys.unique.is_empty());
    }

    #[test]
    fn test_second_primary_name_is_flagged_and_appended() {
        let keys = KeyConstraints::from_rows([
            pk("a_pkey", "x"),
            pk("b_pkey", "y"),
            pk("b_pkey", "z"),
        ]);

        let primary = keys.primary.unwrap();
        assert_eq!(primary.name, "a_pkey");
        assert_eq!(primary.columns, vec!["x", "y", "z"]);
        assert_eq!(keys.extra_primary, vec!["b_pkey"]);
    }

    #[test]
    fn test_constraint_kind_from_catalog() {
        assert_eq!(
            ConstraintKind::from_catalog("PRIMARY KEY"),
            Some(ConstraintKind::PrimaryKey)
        );
        assert_eq!(ConstraintKind::from_catalog("UNIQUE"), Some(ConstraintKind::Unique));
        assert_eq!(ConstraintKind::from_catalog("FOREIGN KEY"), None);
    }

    #[test]
    fn test_table_key_views() {
        let mut table = Table::new(QualifiedName::new("public", "widget"), "widget", "Widget");
        table.columns = vec![
            Column::from(ColumnRow::new("id", "integer", 1)),
            Column::from(ColumnRow::new("sku", "text", 2)),
            Column::from(ColumnRow::new("name", "text", 3)),
        ];
        table.set_primary_key(vec!["id".to_string()]);
        table.keys = KeyConstraints::from_rows([
            unique("widget_sku_key", "sku"),
            unique("widget_gone_key", "dropped"),
        ]);

        assert!(table.is_primary_key("id"));
        let rest: Vec<&str> = table
            .non_key_columns()
            .map(|c| c.column_name.as_str())
            .collect();
        assert_eq!(rest, vec!["sku", "name"]);

        let unique: Vec<&str> = table.unique_keys().map(|(k, _)| k.name.as_str()).collect();
        assert_eq!(unique, vec!["widget_sku_key"]);
    }

    #[test]
    fn test_replaced_columns_do_not_break_key_views() {
        let mut table = Table::new(QualifiedName::new("public", "widget"), "widget", "Widget");
        table.columns = vec![
            Column::from(ColumnRow::new("id", "integer", 1)),
            Column::from(ColumnRow::new("sku", "text", 2)),
        ];
        table.set_primary_key(vec!["sku".to_string(), "id".to_string()]);

        table.columns = vec![Column::from(ColumnRow::new("id", "integer", 1))];

        let pk: Vec<&str> = table
            .primary_key_columns()
            .map(|c| c.column_name.as_str())
            .collect();
        assert_eq!(pk, vec!["id"]);
        assert_eq!(table.non_key_columns().count(), 0);
    }
}
