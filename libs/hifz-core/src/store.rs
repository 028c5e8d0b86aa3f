//! Versioned per-user document storage.
//!
//! Each learner owns one JSON document per feature area. Writes carry the
//! version the caller read; a store rejects the write if another session has
//! saved in between, so concurrent tabs cannot silently overwrite each other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::clock::DayBoundary;
use crate::error::StoreError;
use crate::scheduler::rollover_if_needed;
use crate::types::{MemorizationRecord, SectionsRecord};

/// Feature area a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    Memorization,
    Sections,
}

impl FeatureKey {
    /// Get the feature name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memorization => "memorization",
            Self::Sections => "sections",
        }
    }
}

/// A document together with the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Document types persisted through a [`ProgressStore`].
pub trait Record: Serialize + DeserializeOwned + Default + Send {
    const FEATURE: FeatureKey;

    /// Bring day-scoped state up to date after loading.
    fn roll_over(&mut self, _now: DateTime<Utc>) {}
}

impl Record for MemorizationRecord {
    const FEATURE: FeatureKey = FeatureKey::Memorization;

    fn roll_over(&mut self, now: DateTime<Utc>) {
        let boundary = DayBoundary::new(
            self.settings.daily_reset_hour,
            self.settings.utc_offset_minutes,
        );
        self.counters = rollover_if_needed(&self.counters, boundary.day_of(now));
    }
}

impl Record for SectionsRecord {
    const FEATURE: FeatureKey = FeatureKey::Sections;
}

/// Storage capability for progress documents.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load a document, or `None` if the learner has never saved one.
    async fn load(
        &self,
        user_id: Uuid,
        feature: FeatureKey,
    ) -> Result<Option<Versioned<Value>>, StoreError>;

    /// Save a document if its current version is `expected_version`
    /// (`None` meaning "must not exist yet"). Returns the new version.
    async fn save(
        &self,
        user_id: Uuid,
        feature: FeatureKey,
        data: Value,
        expected_version: Option<u64>,
    ) -> Result<u64, StoreError>;
}

/// Process-local store, used for tests and when no database is configured.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<(Uuid, FeatureKey), Versioned<Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("in-memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl ProgressStore for InMemoryStore {
    async fn load(
        &self,
        user_id: Uuid,
        feature: FeatureKey,
    ) -> Result<Option<Versioned<Value>>, StoreError> {
        let documents = self.documents.read().map_err(|_| Self::poisoned())?;
        Ok(documents.get(&(user_id, feature)).cloned())
    }

    async fn save(
        &self,
        user_id: Uuid,
        feature: FeatureKey,
        data: Value,
        expected_version: Option<u64>,
    ) -> Result<u64, StoreError> {
        let mut documents = self.documents.write().map_err(|_| Self::poisoned())?;
        let key = (user_id, feature);
        let actual = documents.get(&key).map(|doc| doc.version);

        if actual != expected_version {
            return Err(StoreError::Conflict {
                expected: expected_version,
                actual,
            });
        }

        let version = actual.map_or(1, |v| v + 1);
        documents.insert(key, Versioned { data, version });
        Ok(version)
    }
}
