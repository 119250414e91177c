//! Repository trait definitions for the production data store.
//!
//! The engine never talks to a database directly. It depends on two focused
//! collaborator traits:
//!
//! - [`RecordRepository`]: raw production records for a unit and time window
//! - [`UnitRepository`]: the catalog of known production units
//!
//! # Trait Composition
//!
//! A complete repository implements both:
//!
//! ```ignore
//! impl RecordRepository for MyRepo { ... }
//! impl UnitRepository for MyRepo { ... }
//! ```
//!
//! For code that needs every capability, use the [`FullRepository`] bound.

pub mod error;
pub mod records;
pub mod units;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use records::RecordRepository;
pub use units::UnitRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements both repository
/// traits.
pub trait FullRepository: RecordRepository + UnitRepository {}

// Blanket implementation: any type implementing both traits automatically implements FullRepository
impl<T> FullRepository for T where T: RecordRepository + UnitRepository {}
