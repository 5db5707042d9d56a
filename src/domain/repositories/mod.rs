//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UtilityRepository`] - Utility and ZIP code lookups
//! - [`ChlorineRepository`] - Chlorine data lookups
//! - [`RecordStore`] - Administrative upserts and deletes
//! - [`TokenRepository`] - API token authentication

pub mod chlorine_repository;
pub mod record_store;
pub mod token_repository;
pub mod utility_repository;

pub use chlorine_repository::ChlorineRepository;
pub use record_store::RecordStore;
pub use token_repository::{ApiToken, TokenRepository};
pub use utility_repository::UtilityRepository;

#[cfg(test)]
pub use chlorine_repository::MockChlorineRepository;
#[cfg(test)]
pub use record_store::MockRecordStore;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use utility_repository::MockUtilityRepository;
