//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; persistence lives in
//! `crate::infrastructure::persistence`.
//!
//! # Entity Types
//!
//! - [`WaterUtility`] - A regulated public water system
//! - [`ZipCodeMapping`] - ZIP code to utility link
//! - [`ChlorineData`] - Aggregate chlorine statistics for a utility
//! - [`Record`] / [`RecordKey`] - Table-generic upsert and delete inputs
//!
//! # Design Pattern
//!
//! Stored rows have a `New*` counterpart used for writes:
//! `NewWaterUtility`, `NewZipCodeMapping`, `NewChlorineData`.

pub mod chlorine_data;
pub mod record;
pub mod water_utility;
pub mod zip_code_mapping;

pub use chlorine_data::{ChlorineData, MANUAL_ENTRY_SOURCE, NewChlorineData};
pub use record::{Record, RecordKey, StoredRecord, Table};
pub use water_utility::{DEFAULT_UTILITY_TYPE, NewWaterUtility, WaterUtility, pwsid_state};
pub use zip_code_mapping::{NewZipCodeMapping, ServedUtility, ZipCodeMapping};
