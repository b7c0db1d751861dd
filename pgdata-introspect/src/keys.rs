use pgdata_core::QualifiedName;
use tracing::{debug, warn};

use crate::{Catalog, KeyConstraints, Result};

/// Discovers primary key and unique constraints of a table.
#[derive(Debug)]
pub struct KeyConstraintResolver<'c, C> {
    catalog: &'c C,
}

impl<'c, C: Catalog> KeyConstraintResolver<'c, C> {
    pub fn new(catalog: &'c C) -> Self {
        Self { catalog }
    }

    /// Group the catalog's constraint rows into keys.
    ///
    /// Rows of a second primary key constraint name are still appended to
    /// the first; the name is recorded in
    /// [`KeyConstraints::extra_primary`].
    pub async fn infer_key_constraints(&self, name: &QualifiedName) -> Result<KeyConstraints> {
        let rows = self.catalog.constraints(name).await?;
        let keys = KeyConstraints::from_rows(rows);

        for extra in &keys.extra_primary {
            warn!(table = %name, constraint = %extra, "more than one primary key constraint");
        }
        debug!(
            table = %name,
            primary = keys.primary.as_ref().map(|k| k.name.as_str()),
            unique = keys.unique.len(),
            "resolved key constraints"
        );

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ConstraintKind, ConstraintRow, Error,
        testing::{MemoryCatalog, MemoryTable},
    };

    #[tokio::test]
    async fn test_infer_composite_unique() {
        let catalog = MemoryCatalog::new().with_table(
            "semester",
            MemoryTable::new()
                .column("year", "smallint")
                .column("season", "text")
                .column("code", "text")
                .unique("semester_code_key", &["code"])
                .primary_key("semester_pkey", &["year", "season"]),
        );

        let keys = KeyConstraintResolver::new(&catalog)
            .infer_key_constraints(&QualifiedName::new("public", "semester"))
            .await
            .unwrap();

        let primary = keys.primary.unwrap();
        assert_eq!(primary.columns, vec!["year", "season"]);
        assert_eq!(keys.unique.len(), 1);
        assert_eq!(keys.unique[0].columns, vec!["code"]);
    }

    #[tokio::test]
    async fn test_infer_tolerates_second_primary_name() {
        let catalog = MemoryCatalog::new().with_table(
            "odd",
            MemoryTable::new()
                .column("a", "integer")
                .column("b", "integer")
                .raw_constraint(ConstraintRow::new(ConstraintKind::PrimaryKey, "odd_a", "a"))
                .raw_constraint(ConstraintRow::new(ConstraintKind::PrimaryKey, "odd_b", "b")),
        );

        let keys = KeyConstraintResolver::new(&catalog)
            .infer_key_constraints(&QualifiedName::new("public", "odd"))
            .await
            .unwrap();

        assert_eq!(keys.primary.unwrap().columns, vec!["a", "b"]);
        assert_eq!(keys.extra_primary, vec!["odd_b"]);
    }

    #[tokio::test]
    async fn test_infer_propagates_query_failure() {
        let catalog = MemoryCatalog::new().failing("customer");

        let err = KeyConstraintResolver::new(&catalog)
            .infer_key_constraints(&QualifiedName::new("public", "customer"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Query { .. }));
    }
}
