//! Check operation - offline manifest summary.

use std::path::Path;

use pgdata_manifest::Manifest;

use crate::reports::{CheckReport, TableSummary};

/// Summarize a manifest that already passed parse-time validation.
pub fn check(manifest: &Manifest, config_path: &Path) -> CheckReport {
    let database = match &manifest.database.url {
        Some(_) => "literal url".to_string(),
        None => format!("${}", manifest.database.env_var()),
    };

    let tables = manifest
        .tables
        .iter()
        .map(|table| TableSummary {
            qualified_name: table
                .qualified_name()
                .map(|name| name.to_string())
                .unwrap_or_else(|_| table.table_name.clone()),
            struct_name: table.struct_name.clone(),
            primary_key: table
                .primary_key_columns()
                .into_iter()
                .map(String::from)
                .collect(),
            overrides: table.columns.len(),
        })
        .collect();

    CheckReport {
        config_path: config_path.to_path_buf(),
        package: manifest.package.name.clone(),
        database,
        type_overrides: manifest.types.len(),
        tables,
    }
}
