//! Repository configuration file support.
//!
//! This module provides utilities for reading repository configuration from
//! TOML configuration files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::config::DbConfig;
use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub local: LocalSettings,
    #[serde(default)]
    pub mssql: MssqlSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// In-memory repository settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalSettings {
    /// Optional JSON file of records to load at startup.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

/// SQL Server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MssqlSettings {
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_trust_cert")]
    pub trust_cert: bool,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for MssqlSettings {
    fn default() -> Self {
        Self {
            server: String::new(),
            database: String::new(),
            username: String::new(),
            password: String::new(),
            port: default_port(),
            trust_cert: default_trust_cert(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

fn default_port() -> u16 {
    DbConfig::DEFAULT_PORT
}

fn default_trust_cert() -> bool {
    true
}

fn default_max_connections() -> u32 {
    DbConfig::DEFAULT_POOL_SIZE
}

fn default_connect_timeout() -> u64 {
    DbConfig::DEFAULT_CONNECT_TIMEOUT_SECS
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `repository.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("repository.toml"),
            PathBuf::from("backend/repository.toml"),
            PathBuf::from("../repository.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No repository.toml found in standard locations",
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, RepositoryError> {
        self.repository.repo_type.parse().map_err(|e: String| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })
    }

    /// Convert the `[mssql]` section to a [`DbConfig`].
    ///
    /// Returns `Ok(None)` when the configured repository is not SQL Server.
    pub fn to_db_config(&self) -> Result<Option<DbConfig>, RepositoryError> {
        if self.repository_type()? != RepositoryType::Mssql {
            return Ok(None);
        }

        let settings = &self.mssql;
        let missing: Vec<&str> = [
            ("server", &settings.server),
            ("database", &settings.database),
            ("username", &settings.username),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key)
        .collect();

        if !missing.is_empty() {
            return Err(RepositoryError::configuration(format!(
                "SQL Server repository requires mssql.{}",
                missing.join(", mssql.")
            )));
        }

        Ok(Some(DbConfig {
            server: settings.server.clone(),
            database: settings.database.clone(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            port: settings.port,
            trust_cert: settings.trust_cert,
            max_pool_size: settings.max_connections,
            connect_timeout_secs: settings.connect_timeout,
        }))
    }
}
