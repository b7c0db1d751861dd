use std::{fmt, time::Duration};

use miette::Diagnostic;
use pgdata_core::QualifiedNameError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which configured reference failed to match a catalog column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    PrimaryKey,
    FieldOverride,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::PrimaryKey => write!(f, "primary key"),
            ColumnRole::FieldOverride => write!(f, "field override"),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("invalid table name '{name}'")]
    #[diagnostic(
        code(pgdata::config),
        help("use 'table' or 'schema.table' with exactly one '.' separator")
    )]
    Config {
        name: String,
        #[source]
        source: QualifiedNameError,
    },

    #[error("{role} column '{column}' does not exist in table '{table}'")]
    #[diagnostic(
        code(pgdata::not_found),
        help("check the column names in pgdata.toml against the catalog")
    )]
    NotFound {
        table: String,
        column: String,
        role: ColumnRole,
    },

    #[error("table '{table}' has no columns in the catalog")]
    #[diagnostic(
        code(pgdata::table_not_found),
        help("make sure the table exists and the connected role can see it")
    )]
    TableNotFound { table: String },

    #[error("failed to connect to the catalog database")]
    #[diagnostic(code(pgdata::connect))]
    Connect {
        #[source]
        source: sqlx::Error,
    },

    #[error("catalog query for '{table}' failed")]
    #[diagnostic(code(pgdata::query))]
    Query {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("catalog query for '{table}' timed out after {after:?}")]
    #[diagnostic(
        code(pgdata::timeout),
        help("raise [database] query_timeout in pgdata.toml")
    )]
    Timeout { table: String, after: Duration },
}

impl Error {
    /// The table the failure is attributed to, when there is one.
    pub fn table(&self) -> Option<&str> {
        match self {
            Error::Config { name, .. } => Some(name.as_str()),
            Error::NotFound { table, .. }
            | Error::TableNotFound { table }
            | Error::Query { table, .. }
            | Error::Timeout { table, .. } => Some(table.as_str()),
            Error::Connect { .. } => None,
        }
    }
}
