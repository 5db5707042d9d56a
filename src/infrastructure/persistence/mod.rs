//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` row types.
//!
//! # Repositories
//!
//! - [`PgUtilityRepository`] - Utility and ZIP code lookups
//! - [`PgChlorineRepository`] - Chlorine data lookups
//! - [`PgRecordStore`] - Administrative upserts and deletes
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_chlorine_repository;
pub mod pg_record_store;
pub mod pg_token_repository;
pub mod pg_utility_repository;
mod rows;

pub use pg_chlorine_repository::PgChlorineRepository;
pub use pg_record_store::PgRecordStore;
pub use pg_token_repository::PgTokenRepository;
pub use pg_utility_repository::PgUtilityRepository;
