//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod calculate;
pub mod health;
pub mod manual_entry;
pub mod utilities;

pub use admin::{
    audit_handler, cleanup_estimated_handler, delete_record_handler, upsert_record_handler,
    validate_chlorine_handler,
};
pub use calculate::{calculate_handler, estimate_handler};
pub use health::health_handler;
pub use manual_entry::manual_entry_handler;
pub use utilities::{utilities_by_zip_handler, utility_chlorine_handler, utility_handler};
