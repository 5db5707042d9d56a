//! Domain layer containing business entities and logic.
//!
//! This module implements the core domain logic following Clean Architecture principles.
//! It defines entities, repository interfaces, and the pure calculations that do not
//! touch infrastructure.
//!
//! # Architecture
//!
//! - [`audit`] - Chlorine data freshness report
//! - [`entities`] - Core business data structures
//! - [`exposure`] - Chlorine exposure estimator (pure functions)
//! - [`repositories`] - Data access trait definitions
//! - [`validation`] - Quality scoring for chlorine data
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])

pub mod audit;
pub mod entities;
pub mod exposure;
pub mod repositories;
pub mod validation;
