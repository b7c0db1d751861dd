//! The catalog query seam and its PostgreSQL implementation.

use std::{future::Future, time::Duration};

use pgdata_core::QualifiedName;
use pgdata_manifest::PoolConfig;
use sqlx::{
    PgPool, Row,
    postgres::{PgPoolOptions, PgRow},
};
use tracing::debug;

use crate::{ColumnRow, ConstraintKind, ConstraintRow, Error, Result};

/// Columns of one table in ordinal order.
pub const COLUMNS_QUERY: &str = r#"
SELECT column_name::text AS column_name,
       data_type::text AS data_type,
       ordinal_position::int4 AS ordinal_position
FROM information_schema.columns
WHERE table_schema = $1
  AND table_name = $2
ORDER BY ordinal_position
"#;

/// Primary key and unique constraint columns of one table, ordered so
/// that each constraint's rows are contiguous and in key order.
pub const CONSTRAINTS_QUERY: &str = r#"
SELECT tc.constraint_type::text AS constraint_type,
       tc.constraint_name::text AS constraint_name,
       kcu.column_name::text AS column_name
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON kcu.constraint_schema = tc.constraint_schema
 AND kcu.constraint_name = tc.constraint_name
 AND kcu.table_schema = tc.table_schema
 AND kcu.table_name = tc.table_name
JOIN information_schema.columns c
  ON c.table_schema = kcu.table_schema
 AND c.table_name = kcu.table_name
 AND c.column_name = kcu.column_name
WHERE tc.table_schema = $1
  AND tc.table_name = $2
  AND tc.constraint_type IN ('PRIMARY KEY', 'UNIQUE')
ORDER BY tc.constraint_type, tc.constraint_name, kcu.ordinal_position
"#;

/// Read access to table structure.
///
/// Implementations return rows in the order the queries above define;
/// the key resolver depends on it.
pub trait Catalog: Sync {
    fn columns(
        &self,
        name: &QualifiedName,
    ) -> impl Future<Output = Result<Vec<ColumnRow>>> + Send;

    fn constraints(
        &self,
        name: &QualifiedName,
    ) -> impl Future<Output = Result<Vec<ConstraintRow>>> + Send;
}

/// [`Catalog`] backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
    query_timeout: Option<Duration>,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: None,
        }
    }

    /// Bound every catalog query by `timeout`.
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Open a pool sized by `[database]` settings.
    pub async fn connect(url: &str, config: &PoolConfig) -> Result<Self> {
        debug!(
            max_connections = config.max_connections(),
            acquire_timeout = ?config.acquire_timeout(),
            "connecting to catalog"
        );
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .acquire_timeout(config.acquire_timeout())
            .connect(url)
            .await
            .map_err(|source| Error::Connect { source })?;

        Ok(Self::new(pool).with_query_timeout(config.query_timeout()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch(&self, name: &QualifiedName, sql: &'static str) -> Result<Vec<PgRow>> {
        let query = sqlx::query(sql)
            .bind(name.schema())
            .bind(name.table())
            .fetch_all(&self.pool);

        let outcome = match self.query_timeout {
            Some(after) => tokio::time::timeout(after, query)
                .await
                .map_err(|_| Error::Timeout {
                    table: name.to_string(),
                    after,
                })?,
            None => query.await,
        };

        outcome.map_err(|source| query_error(name, source))
    }
}

fn query_error(name: &QualifiedName, source: sqlx::Error) -> Error {
    Error::Query {
        table: name.to_string(),
        source,
    }
}

fn column_row(row: &PgRow) -> std::result::Result<ColumnRow, sqlx::Error> {
    Ok(ColumnRow {
        column_name: row.try_get("column_name")?,
        data_type: row.try_get("data_type")?,
        ordinal_position: row.try_get("ordinal_position")?,
    })
}

fn constraint_row(row: &PgRow) -> std::result::Result<ConstraintRow, sqlx::Error> {
    let constraint_type: String = row.try_get("constraint_type")?;
    let kind = ConstraintKind::from_catalog(&constraint_type).ok_or_else(|| {
        sqlx::Error::Decode(format!("unexpected constraint type '{constraint_type}'").into())
    })?;

    Ok(ConstraintRow {
        kind,
        constraint_name: row.try_get("constraint_name")?,
        column_name: row.try_get("column_name")?,
    })
}

impl Catalog for PgCatalog {
    async fn columns(&self, name: &QualifiedName) -> Result<Vec<ColumnRow>> {
        let rows = self.fetch(name, COLUMNS_QUERY).await?;
        debug!(table = %name, count = rows.len(), "fetched columns");
        rows.iter()
            .map(column_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(|source| query_error(name, source))
    }

    async fn constraints(&self, name: &QualifiedName) -> Result<Vec<ConstraintRow>> {
        let rows = self.fetch(name, CONSTRAINTS_QUERY).await?;
        debug!(table = %name, count = rows.len(), "fetched key constraints");
        rows.iter()
            .map(constraint_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(|source| query_error(name, source))
    }
}
