//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from config validation.
#[derive(Debug)]
pub struct CheckReport {
    pub config_path: PathBuf,
    pub package: String,
    /// Where the connection URL will come from
    pub database: String,
    /// Number of `[types]` entries
    pub type_overrides: usize,
    pub tables: Vec<TableSummary>,
}

/// One declared table, as configured.
#[derive(Debug)]
pub struct TableSummary {
    pub qualified_name: String,
    pub struct_name: Option<String>,
    pub primary_key: Vec<String>,
    pub overrides: usize,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        if self.tables.is_empty() {
            out.warning("no [[tables]] declared; generate will only write attribute.rs and mod.rs");
            out.newline();
        }

        out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
        out.newline();

        out.key_value("  package", &self.package);
        out.key_value("  database", &self.database);
        if self.type_overrides > 0 {
            out.key_value("  type mappings", &self.type_overrides.to_string());
        }
        out.newline();

        let count = self.tables.len();
        out.section(&format!(
            "  {} table{}",
            count,
            if count == 1 { "" } else { "s" }
        ));
        for table in &self.tables {
            let mut line = table.qualified_name.clone();
            if let Some(name) = &table.struct_name {
                line.push_str(&format!(" -> {}", name));
            }
            line.push_str(&format!(" (pk: {})", table.primary_key.join(", ")));
            if table.overrides > 0 {
                line.push_str(&format!(
                    ", {} field override{}",
                    table.overrides,
                    if table.overrides == 1 { "" } else { "s" }
                ));
            }
            out.list_item(&line);
        }
    }
}
