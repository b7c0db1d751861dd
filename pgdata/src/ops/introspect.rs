//! Introspect operation - catalog connection and table resolution.

use eyre::{Result, eyre};
use pgdata_introspect::{Catalog, Introspection, PgCatalog, TableMetadataBuilder};
use pgdata_manifest::Manifest;
use tracing::info;

/// Open a catalog connection using the manifest's `[database]` section.
pub async fn connect(manifest: &Manifest) -> Result<PgCatalog> {
    let database = &manifest.database;
    let url = database.connection_url().ok_or_else(|| {
        eyre!(
            "no database URL: set ${} or [database] url in pgdata.toml",
            database.env_var()
        )
    })?;

    info!(env = database.env_var(), "connecting to catalog");
    Ok(PgCatalog::connect(&url, &database.pool).await?)
}

/// Resolve every declared table against `catalog`.
pub async fn introspect<C: Catalog>(
    catalog: &C,
    manifest: &Manifest,
) -> pgdata_introspect::Result<Introspection> {
    TableMetadataBuilder::from_manifest(catalog, manifest)
        .build_all(&manifest.tables)
        .await
}

#[cfg(test)]
mod tests {
    use pgdata_introspect::testing::{MemoryCatalog, MemoryTable};

    use super::*;

    fn manifest(content: &str) -> Manifest {
        content.parse().unwrap()
    }

    #[tokio::test]
    async fn test_connect_without_url() {
        let manifest = manifest(
            r#"
            [package]
            name = "data"

            [database]
            env = "PGDATA_TEST_UNSET_VARIABLE"
            "#,
        );

        let err = connect(&manifest).await.unwrap_err();
        assert!(err.to_string().contains("$PGDATA_TEST_UNSET_VARIABLE"));
    }

    #[tokio::test]
    async fn test_introspect_uses_manifest_naming() {
        let catalog = MemoryCatalog::new().with_table(
            "device",
            MemoryTable::new()
                .column("id", "integer")
                .column("mac_address", "text")
                .primary_key("device_pkey", &["id"]),
        );
        let manifest = manifest(
            r#"
            [package]
            name = "data"

            [naming]
            acronyms = ["mac"]

            [[tables]]
            table_name = "device"
            "#,
        );

        let introspection = introspect(&catalog, &manifest).await.unwrap();

        let device = &introspection.tables[0];
        assert_eq!(device.struct_name, "Device");
        assert_eq!(device.column("mac_address").unwrap().field_name, "MACAddress");
        assert_eq!(device.column("id").unwrap().field_name, "Id");
    }
}
