//! Per-table metadata resolution.

use pgdata_core::{NameMapper, QualifiedName, TypeMap};
use pgdata_manifest::{Manifest, TableConfig};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    Catalog, ColumnRole, Diagnostic, Error, KeyConstraintResolver, Result, SchemaInspector, Table,
};

/// Resolved metadata for every configured table, plus whatever was
/// tolerated along the way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Introspection {
    pub tables: Vec<Table>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Introspection {
    pub fn table(&self, name: &QualifiedName) -> Option<&Table> {
        self.tables.iter().find(|t| &t.name == name)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity.is_warning())
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }
}

/// Builds [`Table`] metadata from configuration and the catalog.
///
/// Each table is resolved from its own configuration and catalog rows;
/// nothing is shared between tables except the immutable name and type
/// maps.
pub struct TableMetadataBuilder<'c, C> {
    catalog: &'c C,
    names: NameMapper,
    types: TypeMap,
}

impl<'c, C: Catalog> TableMetadataBuilder<'c, C> {
    /// A builder with the default acronyms and the PostgreSQL type map.
    pub fn new(catalog: &'c C) -> Self {
        Self {
            catalog,
            names: NameMapper::default(),
            types: TypeMap::postgres(),
        }
    }

    /// A builder using the `[naming]` and `[types]` settings of `manifest`.
    pub fn from_manifest(catalog: &'c C, manifest: &Manifest) -> Self {
        Self::new(catalog)
            .with_names(manifest.name_mapper())
            .with_types(manifest.type_map())
    }

    pub fn with_names(mut self, names: NameMapper) -> Self {
        self.names = names;
        self
    }

    pub fn with_types(mut self, types: TypeMap) -> Self {
        self.types = types;
        self
    }

    /// Resolve every table in declaration order, stopping at the first
    /// failure.
    pub async fn build_all(&self, configs: &[TableConfig]) -> Result<Introspection> {
        let mut introspection = Introspection::default();
        for config in configs {
            let (table, diagnostics) = self.build(config).await?;
            introspection.tables.push(table);
            introspection.diagnostics.extend(diagnostics);
        }
        info!(tables = introspection.tables.len(), "introspection complete");
        Ok(introspection)
    }

    /// Resolve one table.
    pub async fn build(&self, config: &TableConfig) -> Result<(Table, Vec<Diagnostic>)> {
        let location = format!("tables.{}", config.table_name);
        let mut diagnostics = Vec::new();

        let name = SchemaInspector::<C>::split_table_name(&config.table_name)?;
        debug!(table = %name, "resolving table");

        let columns = SchemaInspector::new(self.catalog)
            .fetch_columns(&name)
            .await?;
        if columns.is_empty() {
            return Err(Error::TableNotFound {
                table: name.to_string(),
            });
        }

        let keys = KeyConstraintResolver::new(self.catalog)
            .infer_key_constraints(&name)
            .await?;
        for extra in &keys.extra_primary {
            diagnostics.push(
                Diagnostic::warning(
                    "keys",
                    format!(
                        "table '{}' reports a second primary key constraint '{}'; its columns were appended to the first",
                        name, extra
                    ),
                )
                .at(&location),
            );
        }

        let struct_name = config
            .struct_name
            .clone()
            .unwrap_or_else(|| self.names.public_case(name.table()));
        let mut table = Table::new(name, &config.table_name, struct_name);
        table.columns = columns;
        table.keys = keys;
        table.overrides = config.columns.clone();

        self.resolve_primary_key(&mut table, config, &location, &mut diagnostics)?;
        self.check_overrides(&table)?;
        self.derive_columns(&mut table, &location, &mut diagnostics);

        Ok((table, diagnostics))
    }

    fn resolve_primary_key(
        &self,
        table: &mut Table,
        config: &TableConfig,
        location: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        let configured = config.primary_key_columns();
        if let Some(missing) = configured.iter().find(|c| table.column(c).is_none()) {
            return Err(Error::NotFound {
                table: table.name.to_string(),
                column: missing.to_string(),
                role: ColumnRole::PrimaryKey,
            });
        }

        if let Some(catalog_key) = &table.keys.primary {
            if catalog_key.columns.iter().map(String::as_str).ne(configured.iter().copied()) {
                diagnostics.push(
                    Diagnostic::info(
                        "keys",
                        format!(
                            "primary key ({}) differs from catalog constraint '{}' ({})",
                            configured.join(", "),
                            catalog_key.name,
                            catalog_key.columns.join(", ")
                        ),
                    )
                    .at(location),
                );
            }
        }

        table.set_primary_key(configured.iter().map(|c| c.to_string()).collect());
        Ok(())
    }

    fn check_overrides(&self, table: &Table) -> Result<()> {
        for column in &table.overrides {
            if table.column(&column.column_name).is_none() {
                return Err(Error::NotFound {
                    table: table.name.to_string(),
                    column: column.column_name.clone(),
                    role: ColumnRole::FieldOverride,
                });
            }
        }
        Ok(())
    }

    fn derive_columns(&self, table: &mut Table, location: &str, diagnostics: &mut Vec<Diagnostic>) {
        let Table {
            name,
            columns,
            overrides,
            ..
        } = table;

        for column in columns.iter_mut() {
            column.field_name = overrides
                .iter()
                .find(|o| o.column_name == column.column_name)
                .map(|o| o.field_name.clone())
                .unwrap_or_else(|| self.names.public_case(&column.column_name));
            column.var_name = self.names.private_case(&column.column_name);

            let mapping = self.types.map_type(&column.data_type);
            if mapping.is_fallback() {
                warn!(
                    table = %name,
                    column = %column.column_name,
                    data_type = %column.data_type,
                    "unmapped catalog type"
                );
                diagnostics.push(
                    Diagnostic::warning(
                        "types",
                        format!(
                            "column '{}' has unmapped type '{}'; using {} / {}",
                            column.column_name,
                            column.data_type,
                            mapping.value(),
                            mapping.wrapper()
                        ),
                    )
                    .at(location),
                );
            }
            column.value_type = mapping.value().to_string();
            column.wrapper_type = mapping.wrapper().to_string();
        }
    }
}
