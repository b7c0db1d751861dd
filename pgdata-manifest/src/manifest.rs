use std::{collections::HashMap, path::Path, str::FromStr};

use indexmap::IndexMap;
use pgdata_core::{Acronyms, MappedType, NameMapper, QualifiedNameError, TypeMap};
use serde::Deserialize;

use crate::{DatabaseConfig, Error, Result, TableConfig, validate::ParseContext};

/// Conventional config file name.
pub const DEFAULT_CONFIG_FILE: &str = "pgdata.toml";

/// Root manifest for pgdata.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Generated package metadata
    pub package: PackageConfig,

    /// Catalog connection settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Identifier conversion settings
    #[serde(default)]
    pub naming: NamingConfig,

    /// Additional or replacement catalog type mappings
    #[serde(default)]
    pub types: IndexMap<String, MappedType>,

    /// Tables to generate, in declaration order
    #[serde(default)]
    pub tables: Vec<TableConfig>,
}

/// `[package]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    /// Name of the generated module
    pub name: String,
}

/// `[naming]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingConfig {
    /// Replaces the default acronym set when present
    pub acronyms: Option<Vec<String>>,
}

impl NamingConfig {
    pub fn acronyms(&self) -> Acronyms {
        match &self.acronyms {
            Some(tokens) => Acronyms::new(tokens),
            None => Acronyms::default(),
        }
    }
}

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, DEFAULT_CONFIG_FILE)
    }
}

impl Manifest {
    /// Parse a pgdata.toml file from the given path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse a pgdata.toml from a string with a custom filename for error reporting
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let ctx = ParseContext::new(content, filename);
        let manifest: Self =
            toml::from_str(content).map_err(|e| ctx.source_context().parse_error(e))?;
        manifest.validate(&ctx)?;
        Ok(manifest)
    }

    /// The name mapper configured by `[naming]`.
    pub fn name_mapper(&self) -> NameMapper {
        NameMapper::new(self.naming.acronyms())
    }

    /// The built-in type map extended by `[types]`.
    pub fn type_map(&self) -> TypeMap {
        TypeMap::postgres().with_overrides(&self.types)
    }

    pub fn table(&self, table_name: &str) -> Option<&TableConfig> {
        self.tables.iter().find(|t| t.table_name == table_name)
    }

    /// Validate the manifest after parsing
    fn validate(&self, ctx: &ParseContext<'_>) -> Result<()> {
        ctx.validate_name(&self.package.name, "package name")?;
        self.validate_database(ctx)?;

        for (name, mapped) in &self.types {
            if mapped.value.trim().is_empty() || mapped.wrapper.trim().is_empty() {
                return Err(ctx.source_context().validation_error(
                    format!("type mapping for '{}' needs a value and a wrapper", name),
                    ctx.find_span(name),
                ));
            }
            ctx.push("types").validate_name(&mapped.wrapper, "wrapper type")?;
        }

        let merged = self.type_map();
        for (name, mapped) in &self.types {
            if let Some((other, existing)) = merged.wrapper_conflict(mapped) {
                return Err(ctx.source_context().validation_error(
                    format!(
                        "wrapper '{}' of type mapping '{}' wraps {}, but '{}' already uses it for {}",
                        mapped.wrapper, name, mapped.value, other, existing.value
                    ),
                    ctx.find_span(&mapped.wrapper),
                ));
            }
        }

        let mut seen: HashMap<String, &str> = HashMap::new();
        for table in &self.tables {
            let qualified = table.qualified_name().map_err(|e| {
                let reason = match e {
                    QualifiedNameError::TooManySeparators(_) => {
                        "a table name may contain at most one '.' separator"
                    }
                    QualifiedNameError::EmptySegment(_) => {
                        "schema and table segments cannot be empty"
                    }
                };
                ctx.source_context().invalid_table_name_error(
                    &table.table_name,
                    reason,
                    ctx.find_span(&table.table_name),
                )
            })?;

            if let Some(first) = seen.insert(qualified.to_string(), &table.table_name) {
                let first_span = ctx.find_span(first);
                let second_span = ctx
                    .find_spans(&table.table_name)
                    .into_iter()
                    .rfind(|s| Some(*s) != first_span);
                return Err(match (first_span, second_span) {
                    (Some(first_span), Some(second_span)) => ctx
                        .source_context()
                        .duplicate_table_error(qualified.to_string(), first_span, second_span),
                    _ => ctx.source_context().validation_error(
                        format!("table '{}' is declared more than once", qualified),
                        ctx.find_span(&table.table_name),
                    ),
                });
            }

            let table_ctx = ctx.push("tables").push(&table.table_name);
            self.validate_table(table, &table_ctx)?;
        }

        Ok(())
    }

    fn validate_database(&self, ctx: &ParseContext<'_>) -> Result<()> {
        let pool = &self.database.pool;
        let settings = [
            ("max_connections", pool.max_connections.map(u64::from)),
            ("acquire_timeout", pool.acquire_timeout),
            ("query_timeout", pool.query_timeout),
        ];
        for (key, value) in settings {
            if value == Some(0) {
                return Err(ctx.source_context().validation_error(
                    format!("[database] {} must be greater than zero", key),
                    ctx.find_key_span(key),
                ));
            }
        }
        Ok(())
    }

    fn validate_table(&self, table: &TableConfig, ctx: &ParseContext<'_>) -> Result<()> {
        if let Some(struct_name) = &table.struct_name {
            ctx.validate_name(struct_name, "struct name")?;
        }

        if let Some(primary_key) = &table.primary_key {
            if primary_key.is_empty() {
                return Err(ctx.source_context().validation_error(
                    format!(
                        "primary_key of '{}' must name at least one column",
                        table.table_name
                    ),
                    ctx.find_span(&table.table_name),
                ));
            }
        }

        let mut overridden: Vec<&str> = Vec::new();
        for column in &table.columns {
            if overridden.contains(&column.column_name.as_str()) {
                return Err(ctx.source_context().duplicate_override_error(
                    &table.table_name,
                    &column.column_name,
                    ctx.find_spans(&column.column_name).last().copied(),
                ));
            }
            overridden.push(&column.column_name);
            ctx.validate_name(&column.field_name, "field name")?;
        }

        Ok(())
    }
}
