//! Rendering stage of the pgdata generator.
//!
//! Consumes resolved [`Table`](pgdata_introspect::Table) metadata and
//! emits one accessor module per table plus the shared `attribute.rs`
//! and `mod.rs`. Nothing here talks to the database.

pub mod builder;
pub mod files;
mod generator;
pub mod naming;

pub use generator::{GenerateResult, Generator, PreviewFile};
