//! SQL Server implementation module.
//!
//! Reads production records from the `ProductRecordLogView` view through a
//! `bb8` pool of `tiberius` connections.

pub mod pool;
pub mod repository;

pub use pool::{build_pool, build_tiberius_config, DbPool};
pub use repository::MssqlRepository;
