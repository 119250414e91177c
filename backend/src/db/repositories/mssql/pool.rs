//! Database connection pool management.

use bb8::Pool;
use bb8_tiberius::ConnectionManager;
use std::time::Duration;
use tiberius::{AuthMethod, Config, EncryptionLevel};

use crate::db::config::DbConfig;

/// Type alias for the database connection pool.
pub type DbPool = Pool<ConnectionManager>;

/// Build a Tiberius config for SQL login authentication.
pub fn build_tiberius_config(config: &DbConfig) -> Config {
    let mut sql_config = Config::new();
    sql_config.host(&config.server);
    sql_config.port(config.port);
    sql_config.database(&config.database);
    sql_config.authentication(AuthMethod::sql_server(&config.username, &config.password));
    sql_config.encryption(EncryptionLevel::Required);

    if config.trust_cert {
        sql_config.trust_cert();
    }

    sql_config
}

/// Create a connection pool for the configured server.
///
/// The pool is owned by the caller; nothing is stored globally.
///
/// # Errors
/// Common errors:
/// - "Timed out in bb8": Firewall blocking connection or server unreachable
/// - "Login failed": Invalid credentials
/// - "Cannot open server": Server name incorrect or firewall blocking
pub async fn build_pool(config: &DbConfig) -> Result<DbPool, String> {
    let manager = ConnectionManager::new(build_tiberius_config(config));

    Pool::builder()
        .max_size(config.max_pool_size.max(1))
        .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build(manager)
        .await
        .map_err(|e| {
            let err_msg = format!("Failed to create connection pool: {}", e);
            if err_msg.to_lowercase().contains("timeout") {
                format!(
                    "{}\n\nPossible causes: firewall blocking port {}, wrong hostname, or invalid credentials.",
                    err_msg, config.port
                )
            } else {
                err_msg
            }
        })
}
