use std::time::Duration;

use serde::Deserialize;

/// Environment variable read when `[database]` names none.
pub const DEFAULT_DATABASE_ENV: &str = "DATABASE_URL";

/// Connection settings for the catalog database.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Environment variable holding the connection URL
    pub env: Option<String>,

    /// Literal connection URL; takes precedence over `env`
    pub url: Option<String>,

    #[serde(flatten)]
    pub pool: PoolConfig,
}

impl DatabaseConfig {
    /// The environment variable consulted for the connection URL.
    pub fn env_var(&self) -> &str {
        self.env.as_deref().unwrap_or(DEFAULT_DATABASE_ENV)
    }

    /// Resolve the connection URL from `url`, then the environment.
    pub fn connection_url(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| std::env::var(self.env_var()).ok())
            .filter(|url| !url.is_empty())
    }
}

/// Database connection pool configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool (default: 4)
    pub max_connections: Option<u32>,

    /// Timeout for acquiring a connection from the pool, in seconds (default: 30)
    pub acquire_timeout: Option<u64>,

    /// Deadline for each catalog query, in seconds (default: none)
    pub query_timeout: Option<u64>,
}

impl PoolConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;
    pub const DEFAULT_ACQUIRE_TIMEOUT: u64 = 30;

    pub fn max_connections(&self) -> u32 {
        self.max_connections
            .unwrap_or(Self::DEFAULT_MAX_CONNECTIONS)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(
            self.acquire_timeout
                .unwrap_or(Self::DEFAULT_ACQUIRE_TIMEOUT),
        )
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout.map(Duration::from_secs)
    }

    /// Returns true if any pool option is configured
    pub fn has_config(&self) -> bool {
        self.max_connections.is_some()
            || self.acquire_timeout.is_some()
            || self.query_timeout.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> DatabaseConfig {
        toml::from_str(content).expect("Failed to parse TOML")
    }

    #[test]
    fn test_defaults() {
        let db = parse("");
        assert_eq!(db.env_var(), "DATABASE_URL");
        assert!(!db.pool.has_config());
        assert_eq!(db.pool.max_connections(), 4);
        assert_eq!(db.pool.acquire_timeout(), Duration::from_secs(30));
        assert_eq!(db.pool.query_timeout(), None);
    }

    #[test]
    fn test_pool_config_full() {
        let db = parse(
            r#"
            env = "PGDATA_URL"
            max_connections = 8
            acquire_timeout = 5
            query_timeout = 10
            "#,
        );
        assert_eq!(db.env_var(), "PGDATA_URL");
        assert!(db.pool.has_config());
        assert_eq!(db.pool.max_connections(), 8);
        assert_eq!(db.pool.acquire_timeout(), Duration::from_secs(5));
        assert_eq!(db.pool.query_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_literal_url_wins() {
        let db = parse(
            r#"
            env = "PGDATA_TEST_UNSET_VARIABLE"
            url = "postgres://localhost/crud"
            "#,
        );
        assert_eq!(
            db.connection_url().as_deref(),
            Some("postgres://localhost/crud")
        );
    }

    #[test]
    fn test_missing_url() {
        let db = parse(r#"env = "PGDATA_TEST_UNSET_VARIABLE""#);
        assert_eq!(db.connection_url(), None);
    }
}
