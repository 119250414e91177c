//! Database configuration and environment variable handling.

use std::env;

/// SQL Server connection settings.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQL Server hostname
    pub server: String,
    /// Database name
    pub database: String,
    /// SQL login
    pub username: String,
    /// SQL password
    pub password: String,
    /// SQL Server port (default: 1433)
    pub port: u16,
    /// Whether to trust the server certificate
    pub trust_cert: bool,
    /// Maximum pooled connections (default: 5)
    pub max_pool_size: u32,
    /// Seconds to wait for a pooled connection (default: 30)
    pub connect_timeout_secs: u64,
}

impl DbConfig {
    pub const DEFAULT_PORT: u16 = 1433;
    pub const DEFAULT_POOL_SIZE: u32 = 5;
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

    /// Create a new database configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DB_SERVER` (required): SQL Server hostname
    /// - `DB_NAME` (required): Database name
    /// - `DB_USER` (required): SQL login
    /// - `DB_PASSWORD` (required): SQL password
    /// - `DB_PORT` (optional, default: 1433): SQL Server port
    /// - `DB_TRUST_CERT` (optional, default: true): Trust server certificate
    /// - `DB_POOL_SIZE` (optional, default: 5): Maximum pooled connections
    /// - `DB_CONNECT_TIMEOUT_SECS` (optional, default: 30): Pool checkout timeout
    ///
    /// # Errors
    /// Returns an error if required variables are not set or malformed.
    pub fn from_env() -> Result<Self, String> {
        let server = required("DB_SERVER")?;
        let database = required("DB_NAME")?;
        let username = required("DB_USER")?;
        let password = required("DB_PASSWORD")?;
        let port = env::var("DB_PORT")
            .ok()
            .map(|v| {
                v.parse()
                    .map_err(|_| "DB_PORT must be a valid port number".to_string())
            })
            .transpose()?
            .unwrap_or(Self::DEFAULT_PORT);
        let trust_cert = env::var("DB_TRUST_CERT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);
        let max_pool_size = env::var("DB_POOL_SIZE")
            .ok()
            .map(|v| {
                v.parse()
                    .map_err(|_| "DB_POOL_SIZE must be a positive integer".to_string())
            })
            .transpose()?
            .unwrap_or(Self::DEFAULT_POOL_SIZE);
        let connect_timeout_secs = env::var("DB_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::DEFAULT_CONNECT_TIMEOUT_SECS);

        Ok(Self {
            server,
            database,
            username,
            password,
            port,
            trust_cert,
            max_pool_size,
            connect_timeout_secs,
        })
    }
}

fn required(key: &str) -> Result<String, String> {
    env::var(key).map_err(|_| format!("{} environment variable not set", key))
}
