// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Catalog introspection for the pgdata generator.
//!
//! Turns configured `[[tables]]` declarations into fully resolved
//! [`Table`] metadata: ordered columns from the catalog, primary and
//! unique keys, and derived field names and types.
//!
//! ```ignore
//! let catalog = PgCatalog::connect(&url, &manifest.database.pool).await?;
//! let introspection = TableMetadataBuilder::from_manifest(&catalog, &manifest)
//!     .build_all(&manifest.tables)
//!     .await?;
//! ```

mod builder;
mod catalog;
mod diagnostic;
mod error;
mod inspector;
mod keys;
mod model;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use builder::{Introspection, TableMetadataBuilder};
pub use catalog::{COLUMNS_QUERY, CONSTRAINTS_QUERY, Catalog, PgCatalog};
pub use diagnostic::{Diagnostic, Severity};
pub use error::{ColumnRole, Error, Result};
pub use inspector::SchemaInspector;
pub use keys::KeyConstraintResolver;
pub use model::{
    CandidateKey, Column, ColumnRow, ConstraintKind, ConstraintRow, KeyConstraints, Table,
};
