//! Unit catalog trait.

use async_trait::async_trait;

use super::error::RepositoryResult;

/// Repository trait for the catalog of production units.
#[async_trait]
pub trait UnitRepository: Send + Sync {
    /// List every known production unit, sorted for stable display.
    async fn list_units(&self) -> RepositoryResult<Vec<String>>;
}
