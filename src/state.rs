//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{
    AuthService, CalculatorService, ChlorineService, RecordService, UtilityService,
};
use crate::domain::repositories::{
    ChlorineRepository, RecordStore, TokenRepository, UtilityRepository,
};
use crate::infrastructure::cache::CacheService;

pub type DynUtilityService = UtilityService<dyn UtilityRepository>;
pub type DynChlorineService = ChlorineService<dyn ChlorineRepository, dyn UtilityRepository>;
pub type DynCalculatorService = CalculatorService<dyn UtilityRepository, dyn ChlorineRepository>;
pub type DynRecordService =
    RecordService<dyn RecordStore, dyn ChlorineRepository, dyn UtilityRepository>;
pub type DynAuthService = AuthService<dyn TokenRepository>;

/// Storage backends the services are built on.
///
/// Production wires the PostgreSQL implementations; tests swap in fakes.
#[derive(Clone)]
pub struct Repositories {
    pub utilities: Arc<dyn UtilityRepository>,
    pub chlorine: Arc<dyn ChlorineRepository>,
    pub records: Arc<dyn RecordStore>,
    pub tokens: Arc<dyn TokenRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub utility_service: Arc<DynUtilityService>,
    pub chlorine_service: Arc<DynChlorineService>,
    pub calculator_service: Arc<DynCalculatorService>,
    pub record_service: Arc<DynRecordService>,
    pub auth_service: Arc<DynAuthService>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    /// Builds all services on top of `repositories` and `cache`.
    ///
    /// `signing_secret` keys the HMAC used to hash API tokens.
    pub fn new(
        repositories: Repositories,
        cache: Arc<dyn CacheService>,
        signing_secret: String,
        default_glass_volume_liters: f64,
    ) -> Self {
        let Repositories {
            utilities,
            chlorine,
            records,
            tokens,
        } = repositories;

        let utility_service = Arc::new(UtilityService::new(utilities.clone()));
        let chlorine_service = Arc::new(ChlorineService::new(
            chlorine.clone(),
            utilities.clone(),
            cache.clone(),
        ));
        let calculator_service = Arc::new(CalculatorService::new(
            utility_service.clone(),
            chlorine_service.clone(),
            default_glass_volume_liters,
        ));
        let record_service = Arc::new(RecordService::new(
            records,
            chlorine,
            utilities,
            cache.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(tokens, signing_secret));

        Self {
            utility_service,
            chlorine_service,
            calculator_service,
            record_service,
            auth_service,
            cache,
        }
    }
}
