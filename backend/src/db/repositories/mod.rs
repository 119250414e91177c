//! Repository implementations module.
//!
//! This module contains the implementations of the repository traits:
//! - `mssql`: SQL Server implementation for production use
//! - `local`: In-memory implementation for unit testing and local development

pub mod local;
#[cfg(feature = "mssql-repo")]
pub mod mssql;

pub use local::LocalRepository;
#[cfg(feature = "mssql-repo")]
pub use mssql::MssqlRepository;
