use std::path::{Path, PathBuf};

use pgdata_core::{FileRules, GeneratedFile};
use pgdata_manifest::DEFAULT_CONFIG_FILE;

/// The commented `pgdata.toml` skeleton written by `pgdata init`.
pub struct PgdataToml {
    pub name: String,
}

impl PgdataToml {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl GeneratedFile for PgdataToml {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(DEFAULT_CONFIG_FILE)
    }

    fn rules(&self) -> FileRules {
        FileRules::if_missing()
    }

    fn render(&self) -> String {
        format!(
            r#"[package]
name = "{}"

[database]
env = "DATABASE_URL"
# url = "postgres://localhost/{}"
# max_connections = 4
# acquire_timeout = 30
# query_timeout = 30

# [naming]
# acronyms = ["id", "ip", "url"]

# Extra or replacement catalog type mappings:
# [types."numeric"]
# value = "rust_decimal::Decimal"
# wrapper = "Numeric"

[[tables]]
table_name = "public.customer"
# struct_name = "Customer"
# primary_key = ["id"]

# [[tables.columns]]
# column_name = "birth_date"
# field_name = "Birthday"
"#,
            self.name, self.name
        )
    }
}
