//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod audit;
pub mod calculate;
pub mod chlorine;
pub mod health;
pub mod record;
pub mod utility;
