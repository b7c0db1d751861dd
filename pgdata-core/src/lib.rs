//! Core utilities and types for the pgdata generator.
//!
//! This crate holds the pure pieces of the pipeline: identifier case
//! conversion, catalog type mapping, schema-qualified name splitting and
//! the primitives used to write generated files.

mod file;
mod naming;
mod qualified_name;
mod type_mapper;

// File operations
pub use file::{FileRules, GeneratedFile, Overwrite, WriteResult};
// Naming
pub use naming::{Acronyms, DEFAULT_ACRONYMS, NameMapper, to_file_case};
pub use qualified_name::{DEFAULT_SCHEMA, QualifiedName, QualifiedNameError};
// Type mapping
pub use type_mapper::{MappedType, TypeMap, TypeMapping};
