//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wiring the router to an in-memory store and a test clock
//! - A Postgres-backed context for tests marked `#[ignore]`
//! - Header helpers for identifying a learner
//!
//! # Requirements
//! Database tests require a PostgreSQL database (set DATABASE_URL env var).

#![allow(dead_code)]

pub mod fixtures;

use std::sync::{Arc, Mutex};

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use hifz_core::{
    Clock, FeatureKey, InMemoryStore, MemorizationRecord, ProgressStore, ProgressTracker,
    UnitProgress, UnitStatus,
};
use uuid::Uuid;

use hifz_backend::db::Database;
use hifz_backend::routes::auth::USER_ID_HEADER;
use hifz_backend::{router, AppState};

/// Clock the tests can move forward.
#[derive(Debug)]
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// 08:00 UTC on 2024-03-01.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
}

/// Test context containing the router and its clock.
pub struct TestContext {
    pub clock: Arc<TestClock>,
    pub store: Arc<dyn ProgressStore>,
    pub db: Option<Arc<Database>>,
    app: Router,
}

impl TestContext {
    /// Create a context backed by the in-memory store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()), None)
    }

    /// Create a context backed by PostgreSQL.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn with_database() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);
        Self::with_store(db.clone(), Some(db))
    }

    fn with_store(store: Arc<dyn ProgressStore>, db: Option<Arc<Database>>) -> Self {
        let clock = Arc::new(TestClock::new(start_time()));
        let tracker = ProgressTracker::new(store.clone(), clock.clone());
        let app = router(AppState::new(tracker));

        Self {
            clock,
            store,
            db,
            app,
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Move the clock forward by whole days.
    pub fn advance_days(&self, days: i64) {
        self.clock.advance(Duration::days(days));
    }

    /// Header identifying a learner.
    pub fn user_header(user_id: Uuid) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&user_id.to_string()).unwrap(),
        )
    }

    /// Store a memorization record in which every unit in `units` has been
    /// reviewed once. Only valid for a learner with no saved progress.
    pub async fn seed_reviewed_units(&self, user_id: Uuid, units: impl IntoIterator<Item = u32>) {
        let now = self.clock.now();
        let mut record = MemorizationRecord::default();
        record.units = units
            .into_iter()
            .map(|unit_number| UnitProgress {
                unit_number,
                memorized_at: now,
                review_count: 1,
                next_review_at: Some(now + Duration::days(3)),
                last_reviewed_at: Some(now),
                status: UnitStatus::Reviewed,
            })
            .collect();

        self.store
            .save(
                user_id,
                FeatureKey::Memorization,
                serde_json::to_value(&record).unwrap(),
                None,
            )
            .await
            .expect("Failed to seed progress");
    }

    /// Remove a learner's rows from the database, if one is attached.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        if let Some(db) = &self.db {
            let _ = sqlx::query("DELETE FROM progress_records WHERE user_id = $1")
                .bind(user_id)
                .execute(db.pool())
                .await;
        }
    }
}
