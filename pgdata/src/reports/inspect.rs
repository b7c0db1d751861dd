//! Inspect command report data structures.

use pgdata_introspect::{Diagnostic, Introspection, Severity, Table};

use super::output::{Output, Report};

/// Resolved metadata for every configured table.
#[derive(Debug)]
pub struct InspectReport {
    pub introspection: Introspection,
}

/// Render a diagnostic the way check and generate print them.
pub(super) fn render_diagnostic(out: &mut dyn Output, diag: &Diagnostic) {
    let msg = match &diag.location {
        Some(loc) => format!("{}\n  --> {}", diag.message, loc),
        None => diag.message.clone(),
    };
    match diag.severity {
        Severity::Warning => out.warning(&msg),
        Severity::Info => out.preformatted(&format!("info: {}", msg)),
    }
}

impl InspectReport {
    fn render_table(&self, out: &mut dyn Output, table: &Table) {
        out.preformatted(&format!("{} -> {}", table.name, table.struct_name));

        out.section("  columns");
        for column in &table.columns {
            let marker = if table.is_primary_key(&column.column_name) {
                " [pk]"
            } else {
                ""
            };
            out.preformatted(&format!(
                "    {:>2} {} {} -> {}: {}{}",
                column.ordinal_position,
                column.column_name,
                column.data_type,
                column.field_name,
                column.wrapper_type,
                marker
            ));
        }

        let primary_key: Vec<&str> = table
            .primary_key_columns()
            .map(|c| c.column_name.as_str())
            .collect();
        out.key_value("  primary key", &primary_key.join(", "));

        for key in &table.keys.unique {
            out.key_value(
                "  unique",
                &format!("{} ({})", key.name, key.columns.join(", ")),
            );
        }
    }
}

impl Report for InspectReport {
    fn render(&self, out: &mut dyn Output) {
        for diag in &self.introspection.diagnostics {
            render_diagnostic(out, diag);
        }
        if !self.introspection.diagnostics.is_empty() {
            out.newline();
        }

        for (i, table) in self.introspection.tables.iter().enumerate() {
            if i > 0 {
                out.newline();
            }
            self.render_table(out, table);
        }
    }
}

#[cfg(test)]
mod tests {
    use pgdata_introspect::{
        TableMetadataBuilder,
        testing::{MemoryCatalog, MemoryTable},
    };
    use pgdata_manifest::TableConfig;

    use super::*;
    use crate::reports::BufferOutput;

    #[tokio::test]
    async fn test_render_table() {
        let catalog = MemoryCatalog::new().with_table(
            "account",
            MemoryTable::new()
                .column("id", "integer")
                .column("email", "text")
                .column("balance", "money")
                .primary_key("account_pkey", &["id"])
                .unique("account_email_key", &["email"]),
        );
        let introspection = TableMetadataBuilder::new(&catalog)
            .build_all(&[TableConfig::new("account")])
            .await
            .unwrap();

        let mut out = BufferOutput::default();
        InspectReport { introspection }.render(&mut out);

        let text = out.text();
        assert!(text.contains("public.account -> Account"));
        assert!(text.contains("     1 id integer -> ID: Int4 [pk]"));
        assert!(text.contains("     2 email text -> Email: Text\n"));
        assert!(text.contains("  primary key: id"));
        assert!(text.contains("  unique: account_email_key (email)"));

        assert_eq!(out.stderr.len(), 1);
        assert!(out.stderr[0].starts_with("warning: "));
        assert!(out.stderr[0].ends_with("--> tables.account"));
    }
}
