#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, middleware, routing::get};
use axum_test::TestServer;
use chlorine_calculator::api::handlers::health_handler;
use chlorine_calculator::api::middleware::auth;
use chlorine_calculator::api::routes::{admin_routes, public_routes, submission_routes};
use chlorine_calculator::domain::entities::{
    ChlorineData, Record, RecordKey, ServedUtility, StoredRecord, WaterUtility, ZipCodeMapping,
};
use chlorine_calculator::domain::exposure::constants::DEFAULT_GLASS_VOLUME_LITERS;
use chlorine_calculator::domain::repositories::{
    ApiToken, ChlorineRepository, RecordStore, TokenRepository, UtilityRepository,
};
use chlorine_calculator::error::AppError;
use chlorine_calculator::infrastructure::cache::NullCache;
use chlorine_calculator::state::{AppState, Repositories};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub const SIGNING_SECRET: &str = "test-signing-secret";

pub const NOLENSVILLE_PWSID: &str = "TN0000511";
pub const NOLENSVILLE_ZIP: &str = "37135";
/// Second utility mapped to the Nolensville ZIP code, without chlorine data.
pub const HARPETH_PWSID: &str = "TN0000700";

/// In-memory stand-in for the PostgreSQL tables.
///
/// Implements every repository trait so handler tests run without a database.
#[derive(Default)]
pub struct InMemoryStore {
    utilities: Mutex<BTreeMap<String, WaterUtility>>,
    mappings: Mutex<Vec<ZipCodeMapping>>,
    chlorine: Mutex<BTreeMap<String, ChlorineData>>,
    tokens: Mutex<Vec<ApiToken>>,
}

impl InMemoryStore {
    /// Nolensville (primary for 37135, with chlorine data) and Harpeth Valley
    /// (secondary for 37135, no chlorine data).
    pub fn seeded() -> Arc<Self> {
        let store = Arc::new(Self::default());
        store.insert_utility(utility(NOLENSVILLE_PWSID, "NOLENSVILLE-COLLEGE GROVE U.D.", 32_793));
        store.insert_utility(utility(HARPETH_PWSID, "HARPETH VALLEY U.D.", 18_000));
        store.insert_mapping(NOLENSVILLE_ZIP, NOLENSVILLE_PWSID, true);
        store.insert_mapping(NOLENSVILLE_ZIP, HARPETH_PWSID, false);
        store.insert_chlorine(nolensville_chlorine());
        store
    }

    pub fn insert_utility(&self, utility: WaterUtility) {
        self.utilities
            .lock()
            .unwrap()
            .insert(utility.pwsid.clone(), utility);
    }

    pub fn insert_mapping(&self, zip_code: &str, pwsid: &str, is_primary: bool) {
        let now = Utc::now();
        self.mappings.lock().unwrap().push(ZipCodeMapping {
            zip_code: zip_code.to_string(),
            pwsid: pwsid.to_string(),
            is_primary,
            created_at: now,
            updated_at: now,
        });
    }

    pub fn insert_chlorine(&self, data: ChlorineData) {
        self.chlorine
            .lock()
            .unwrap()
            .insert(data.pwsid.clone(), data);
    }

    pub fn chlorine(&self, pwsid: &str) -> Option<ChlorineData> {
        self.chlorine.lock().unwrap().get(pwsid).cloned()
    }
}

pub fn repositories(store: &Arc<InMemoryStore>) -> Repositories {
    Repositories {
        utilities: store.clone(),
        chlorine: store.clone(),
        records: store.clone(),
        tokens: store.clone(),
    }
}

pub fn utility(pwsid: &str, name: &str, population_served: i64) -> WaterUtility {
    let now = Utc::now();
    WaterUtility {
        pwsid: pwsid.to_string(),
        utility_name: name.to_string(),
        utility_type: "Community water system".to_string(),
        city: Some("Nolensville".to_string()),
        state: Some("TN".to_string()),
        county: Some("Williamson".to_string()),
        population_served,
        service_connections: population_served / 3,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// 2024 CCR figures, dated 30 days ago so audits report them as recent.
pub fn nolensville_chlorine() -> ChlorineData {
    let now = Utc::now();
    ChlorineData {
        pwsid: NOLENSVILLE_PWSID.to_string(),
        utility_name: Some("NOLENSVILLE-COLLEGE GROVE U.D.".to_string()),
        average_chlorine_ppm: 1.63,
        min_chlorine_ppm: Some(0.40),
        max_chlorine_ppm: Some(2.30),
        sample_count: Some(12),
        last_updated: days_ago(30),
        data_source: "2024 Consumer Confidence Report".to_string(),
        notes: None,
        source_url: Some("https://www.ncgud.com/wp-content/uploads/2025/05/CCR-2024-New.pdf".to_string()),
        confidence: Some(90),
        created_at: now,
        updated_at: now,
    }
}

pub fn days_ago(days: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(days)
}

#[async_trait]
impl UtilityRepository for InMemoryStore {
    async fn find_by_pwsid(&self, pwsid: &str) -> Result<Option<WaterUtility>, AppError> {
        Ok(self.utilities.lock().unwrap().get(pwsid).cloned())
    }

    async fn find_by_zip_code(&self, zip_code: &str) -> Result<Vec<ServedUtility>, AppError> {
        let utilities = self.utilities.lock().unwrap();
        let mut served: Vec<ServedUtility> = self
            .mappings
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.zip_code == zip_code)
            .filter_map(|m| {
                utilities.get(&m.pwsid).map(|u| ServedUtility {
                    utility: u.clone(),
                    is_primary: m.is_primary,
                })
            })
            .collect();

        served.sort_by(|a, b| {
            b.is_primary
                .cmp(&a.is_primary)
                .then(b.utility.population_served.cmp(&a.utility.population_served))
                .then(a.utility.pwsid.cmp(&b.utility.pwsid))
        });
        Ok(served)
    }

    async fn list(&self, only_active: bool) -> Result<Vec<WaterUtility>, AppError> {
        Ok(self
            .utilities
            .lock()
            .unwrap()
            .values()
            .filter(|u| !only_active || u.is_active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ChlorineRepository for InMemoryStore {
    async fn find_by_pwsid(&self, pwsid: &str) -> Result<Option<ChlorineData>, AppError> {
        Ok(self.chlorine(pwsid))
    }

    async fn list(&self) -> Result<Vec<ChlorineData>, AppError> {
        Ok(self.chlorine.lock().unwrap().values().cloned().collect())
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn upsert(&self, record: Record) -> Result<StoredRecord, AppError> {
        let now = Utc::now();
        let stored = match record {
            Record::Utility(u) => {
                let created_at = self
                    .utilities
                    .lock()
                    .unwrap()
                    .get(&u.pwsid)
                    .map_or(now, |e| e.created_at);
                let utility = WaterUtility {
                    pwsid: u.pwsid,
                    utility_name: u.utility_name,
                    utility_type: u.utility_type,
                    city: u.city,
                    state: u.state,
                    county: u.county,
                    population_served: u.population_served,
                    service_connections: u.service_connections,
                    is_active: u.is_active,
                    created_at,
                    updated_at: now,
                };
                self.insert_utility(utility.clone());
                StoredRecord::Utility(utility)
            }
            Record::Chlorine(c) => {
                if !self.utilities.lock().unwrap().contains_key(&c.pwsid) {
                    return Err(foreign_key_violation(&c.pwsid));
                }
                let data = ChlorineData {
                    pwsid: c.pwsid,
                    utility_name: c.utility_name,
                    average_chlorine_ppm: c.average_chlorine_ppm,
                    min_chlorine_ppm: c.min_chlorine_ppm,
                    max_chlorine_ppm: c.max_chlorine_ppm,
                    sample_count: c.sample_count,
                    last_updated: c.last_updated,
                    data_source: c.data_source,
                    notes: c.notes,
                    source_url: c.source_url,
                    confidence: c.confidence,
                    created_at: now,
                    updated_at: now,
                };
                self.insert_chlorine(data.clone());
                StoredRecord::Chlorine(data)
            }
            Record::ZipMapping(m) => {
                if !self.utilities.lock().unwrap().contains_key(&m.pwsid) {
                    return Err(foreign_key_violation(&m.pwsid));
                }
                let mut mappings = self.mappings.lock().unwrap();
                mappings.retain(|e| !(e.zip_code == m.zip_code && e.pwsid == m.pwsid));
                let mapping = ZipCodeMapping {
                    zip_code: m.zip_code,
                    pwsid: m.pwsid,
                    is_primary: m.is_primary,
                    created_at: now,
                    updated_at: now,
                };
                mappings.push(mapping.clone());
                StoredRecord::ZipMapping(mapping)
            }
        };
        Ok(stored)
    }

    async fn delete(&self, key: RecordKey) -> Result<u64, AppError> {
        let removed = match key {
            RecordKey::Utility { pwsid } => {
                let removed = self.utilities.lock().unwrap().remove(&pwsid).is_some();
                if removed {
                    self.mappings.lock().unwrap().retain(|m| m.pwsid != pwsid);
                    self.chlorine.lock().unwrap().remove(&pwsid);
                }
                removed
            }
            RecordKey::Chlorine { pwsid } => self.chlorine.lock().unwrap().remove(&pwsid).is_some(),
            RecordKey::ZipMapping { zip_code, pwsid } => {
                let mut mappings = self.mappings.lock().unwrap();
                let before = mappings.len();
                mappings.retain(|m| !(m.zip_code == zip_code && m.pwsid == pwsid));
                mappings.len() != before
            }
        };
        Ok(u64::from(removed))
    }

    async fn delete_estimated_chlorine(&self) -> Result<Vec<String>, AppError> {
        let mut chlorine = self.chlorine.lock().unwrap();
        let estimated: Vec<String> = chlorine
            .values()
            .filter(|c| c.is_estimated())
            .map(|c| c.pwsid.clone())
            .collect();
        for pwsid in &estimated {
            chlorine.remove(pwsid);
        }
        Ok(estimated)
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn validate_token(&self, token_hash: &str) -> Result<bool, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .any(|t| t.token_hash == token_hash && !t.is_revoked()))
    }

    async fn touch_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        for token in self.tokens.lock().unwrap().iter_mut() {
            if token.token_hash == token_hash {
                token.last_used_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        if tokens.iter().any(|t| t.name == name) {
            return Err(AppError::conflict(
                "Token name already exists",
                json!({ "name": name }),
            ));
        }
        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<bool, AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.iter_mut().find(|t| t.id == id && !t.is_revoked()) {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn foreign_key_violation(pwsid: &str) -> AppError {
    AppError::bad_request(
        "Referenced water utility does not exist",
        json!({ "pwsid": pwsid }),
    )
}

pub fn create_test_state(store: &Arc<InMemoryStore>) -> AppState {
    AppState::new(
        repositories(store),
        Arc::new(NullCache::new()),
        SIGNING_SECRET.to_string(),
        DEFAULT_GLASS_VOLUME_LITERS,
    )
}

/// Routes as mounted by the server, without rate limiting.
pub fn create_test_app(state: AppState) -> Router {
    let admin = admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::layer,
    ));
    let api = public_routes()
        .merge(submission_routes())
        .nest("/admin", admin);

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .with_state(state)
}

pub fn create_test_server(store: &Arc<InMemoryStore>) -> TestServer {
    TestServer::new(create_test_app(create_test_state(store))).unwrap()
}

/// Issues a token through the auth service and returns its raw value.
pub async fn issue_token(state: &AppState, name: &str) -> String {
    let (raw, _) = state.auth_service.issue_token(name).await.unwrap();
    raw
}
