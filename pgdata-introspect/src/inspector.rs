use pgdata_core::QualifiedName;
use tracing::debug;

use crate::{Catalog, Column, Error, Result};

/// Reads the ordered column list of a table from the catalog.
#[derive(Debug)]
pub struct SchemaInspector<'c, C> {
    catalog: &'c C,
}

impl<'c, C: Catalog> SchemaInspector<'c, C> {
    pub fn new(catalog: &'c C) -> Self {
        Self { catalog }
    }

    /// Split "schema.table" or "table" into its parts, defaulting the
    /// schema to `public`.
    pub fn split_table_name(identifier: &str) -> Result<QualifiedName> {
        QualifiedName::parse(identifier).map_err(|source| Error::Config {
            name: identifier.to_string(),
            source,
        })
    }

    /// Columns of `name` in ordinal order, with only catalog attributes
    /// populated. A table with no visible columns yields an empty list.
    pub async fn fetch_columns(&self, name: &QualifiedName) -> Result<Vec<Column>> {
        let rows = self.catalog.columns(name).await?;
        debug!(table = %name, columns = rows.len(), "inspected table");
        Ok(rows.into_iter().map(Column::from).collect())
    }
}
