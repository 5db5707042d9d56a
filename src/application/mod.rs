//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and caching, and give the
//! HTTP handlers and the `admin` CLI one API to call.
//!
//! # Available Services
//!
//! - [`services::UtilityService`] - ZIP code and PWSID lookups
//! - [`services::ChlorineService`] - Cached chlorine lookups and freshness audit
//! - [`services::CalculatorService`] - Exposure estimates
//! - [`services::RecordService`] - Validated administrative writes
//! - [`services::AuthService`] - API token authentication

pub mod services;
