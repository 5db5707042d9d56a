//! Business logic services for the application layer.

pub mod auth_service;
pub mod calculator_service;
pub mod chlorine_service;
pub mod record_service;
pub mod utility_service;

pub use auth_service::{AuthService, hash_token};
pub use calculator_service::{CalculationOutcome, CalculationRequest, CalculatorService};
pub use chlorine_service::ChlorineService;
pub use record_service::{ManualAction, ManualMeasurement, ManualOutcome, RecordService, UpsertOutcome};
pub use utility_service::UtilityService;
