// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod database;
mod error;
mod file;
mod manifest;
mod table;
mod validate;

pub use database::{DEFAULT_DATABASE_ENV, DatabaseConfig, PoolConfig};
pub use error::{Error, Result, SourceContext};
pub use file::ConfigFile;
pub use manifest::{DEFAULT_CONFIG_FILE, Manifest, NamingConfig, PackageConfig};
pub use table::{ColumnOverride, DEFAULT_PRIMARY_KEY, TableConfig};
pub use validate::{is_rust_keyword, validate_identifier};
