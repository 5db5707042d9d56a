//! PostgreSQL repository tests.
//!
//! Each test gets a fresh database with `migrations/` applied (including the
//! Nolensville seed). They are ignored by default so the suite runs without a
//! server; run them with `DATABASE_URL` set and `cargo test -- --ignored`.

use chlorine_calculator::domain::repositories::{ChlorineRepository, UtilityRepository};
use chlorine_calculator::infrastructure::persistence::{
    PgChlorineRepository, PgUtilityRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

const NOLENSVILLE_PWSID: &str = "TN0000511";

async fn add_utility(pool: &PgPool, pwsid: &str, name: &str, population: i64, active: bool) {
    sqlx::query(
        "INSERT INTO water_utilities (pwsid, utility_name, state, population_served, is_active) \
         VALUES ($1, $2, 'TN', $3, $4)",
    )
    .bind(pwsid)
    .bind(name)
    .bind(population)
    .bind(active)
    .execute(pool)
    .await
    .unwrap();
}

async fn map_zip(pool: &PgPool, zip_code: &str, pwsid: &str, is_primary: bool) {
    sqlx::query("INSERT INTO zip_code_mapping (zip_code, pwsid, is_primary) VALUES ($1, $2, $3)")
        .bind(zip_code)
        .bind(pwsid)
        .bind(is_primary)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_seeded_utility(pool: PgPool) {
    let repo = PgUtilityRepository::new(Arc::new(pool));

    let utility = repo.find_by_pwsid(NOLENSVILLE_PWSID).await.unwrap().unwrap();

    assert_eq!(utility.utility_name, "NOLENSVILLE-COLLEGE GROVE U.D.");
    assert_eq!(utility.state.as_deref(), Some("TN"));
    assert_eq!(utility.population_served, 32_793);
    assert!(utility.is_active);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_missing_utility(pool: PgPool) {
    let repo = PgUtilityRepository::new(Arc::new(pool));

    let result = repo.find_by_pwsid("TN9999999").await.unwrap();

    assert!(result.is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_zip_orders_primary_first(pool: PgPool) {
    add_utility(&pool, "TN0000700", "HARPETH VALLEY U.D.", 90_000, true).await;
    map_zip(&pool, "37135", "TN0000700", false).await;

    let repo = PgUtilityRepository::new(Arc::new(pool));
    let served = repo.find_by_zip_code("37135").await.unwrap();

    let pwsids: Vec<_> = served.iter().map(|s| s.utility.pwsid.as_str()).collect();
    assert_eq!(pwsids, vec![NOLENSVILLE_PWSID, "TN0000700"]);
    assert!(served[0].is_primary);
    assert!(!served[1].is_primary);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_unknown_zip(pool: PgPool) {
    let repo = PgUtilityRepository::new(Arc::new(pool));

    let served = repo.find_by_zip_code("00000").await.unwrap();

    assert!(served.is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_only_active(pool: PgPool) {
    add_utility(&pool, "TN0000800", "RETIRED SYSTEM", 10, false).await;

    let repo = PgUtilityRepository::new(Arc::new(pool));

    let all = repo.list(false).await.unwrap();
    let active = repo.list(true).await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].pwsid, NOLENSVILLE_PWSID);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_seeded_chlorine_data(pool: PgPool) {
    let repo = PgChlorineRepository::new(Arc::new(pool));

    let data = repo.find_by_pwsid(NOLENSVILLE_PWSID).await.unwrap().unwrap();

    assert_eq!(data.average_chlorine_ppm, 1.63);
    assert_eq!(data.min_chlorine_ppm, Some(0.40));
    assert_eq!(data.max_chlorine_ppm, Some(2.30));
    assert_eq!(data.sample_count, Some(12));
    assert_eq!(data.confidence, Some(90));
    assert!(!data.is_estimated());

    assert_eq!(repo.list().await.unwrap().len(), 1);
    assert!(repo.find_by_pwsid("TN9999999").await.unwrap().is_none());
}
