//! Data-store access for production records.
//!
//! This module provides abstractions for reading production records via the
//! Repository pattern, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Aggregation services / HTTP layer                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!          ┌──────────┴───────────┐
//!          │                      │
//!   ┌──────▼──────┐       ┌───────▼───────┐
//!   │    Local    │       │  SQL Server   │
//!   │ (in-memory) │       │ (tiberius+bb8)│
//!   └─────────────┘       └───────────────┘
//! ```
//!
//! # Usage
//! ```ignore
//! use oee_rust::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     let units = services::list_units(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```
//!
//! Repositories are created once at startup and handed around as
//! `Arc<dyn FullRepository>`; there is no process-wide instance.

pub mod config;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


pub use config::DbConfig;
pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "mssql-repo")]
pub use repositories::MssqlRepository;
pub use repository::{
    ErrorContext, FullRepository, RecordRepository, RepositoryError, RepositoryResult,
    UnitRepository,
};
pub use services::{fetch_records, health_check, list_units};
