//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use super::config::DbConfig;
use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "mssql-repo")]
use super::repositories::MssqlRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// SQL Server record view (production)
    Mssql,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("mssql", "sqlserver", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mssql" | "sqlserver" | "sql_server" => Ok(Self::Mssql),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Without it, defaults to SQL Server when
    /// `DB_SERVER` is present, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("DB_SERVER").is_ok() {
            Self::Mssql
        } else {
            Self::Local
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use oee_rust::db::{DbConfig, RepositoryFactory, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DbConfig::from_env()?;
///     let repo = RepositoryFactory::create(RepositoryType::Mssql, Some(&config)).await?;
///
///     let local_repo = RepositoryFactory::create_local();
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `config` - Database configuration (required for SQL Server)
    pub async fn create(
        repo_type: RepositoryType,
        config: Option<&DbConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Mssql => {
                let config = config.ok_or_else(|| {
                    RepositoryError::configuration("SQL Server repository requires DbConfig")
                })?;
                Self::create_mssql(config).await
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a SQL Server repository with its own connection pool.
    #[cfg(feature = "mssql-repo")]
    pub async fn create_mssql(config: &DbConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo = MssqlRepository::connect(config).await?;
        Ok(Arc::new(repo))
    }

    #[cfg(not(feature = "mssql-repo"))]
    pub async fn create_mssql(_config: &DbConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        Err(RepositoryError::configuration(
            "SQL Server repository feature not enabled (build with --features mssql-repo)",
        ))
    }

    /// Create an empty in-memory repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create an in-memory repository, optionally seeded from a JSON file.
    pub fn create_local_seeded(
        seed_file: Option<&Path>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match seed_file {
            Some(path) => Ok(Arc::new(LocalRepository::from_json_file(path)?)),
            None => Ok(Self::create_local()),
        }
    }

    /// Create a repository from a parsed configuration file.
    pub async fn from_config(config: &RepositoryConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        match config.repository_type()? {
            RepositoryType::Local => Self::create_local_seeded(config.local.seed_file.as_deref()),
            RepositoryType::Mssql => {
                let db_config = config.to_db_config()?;
                Self::create(RepositoryType::Mssql, db_config.as_ref()).await
            }
        }
    }

    /// Create repository from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` (see [`RepositoryType::from_env`]); SQL Server
    /// settings come from [`DbConfig::from_env`], and `LOCAL_SEED_FILE` may
    /// point the local repository at a JSON seed.
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryBuilder::new().from_env()?.build().await
    }
}

/// Builder for configuring repository creation.
///
/// # Example
/// ```ignore
/// let repo = RepositoryBuilder::new()
///     .repository_type(RepositoryType::Local)
///     .seed_file("fixtures/records.json")
///     .build()
///     .await?;
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    config: Option<DbConfig>,
    seed_file: Option<PathBuf>,
}

impl RepositoryBuilder {
    /// Create a new repository builder; defaults to the local repository.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::Local,
            config: None,
            seed_file: None,
        }
    }

    /// Set the repository type.
    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    /// Set the database configuration.
    pub fn config(mut self, config: DbConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Seed the local repository from a JSON file.
    pub fn seed_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_file = Some(path.into());
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, RepositoryError> {
        self.repo_type = RepositoryType::from_env();

        if self.repo_type == RepositoryType::Mssql {
            let config = DbConfig::from_env().map_err(RepositoryError::configuration)?;
            self.config = Some(config);
        }
        if let Ok(path) = std::env::var("LOCAL_SEED_FILE") {
            self.seed_file = Some(PathBuf::from(path));
        }

        Ok(self)
    }

    /// Build the repository instance.
    pub async fn build(self) -> RepositoryResult<Arc<dyn FullRepository>> {
        match self.repo_type {
            RepositoryType::Local => RepositoryFactory::create_local_seeded(self.seed_file.as_deref()),
            RepositoryType::Mssql => {
                RepositoryFactory::create(self.repo_type, self.config.as_ref()).await
            }
        }
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
