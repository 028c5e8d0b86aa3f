//! API request and response types

use serde::{Deserialize, Serialize};

// Re-export shared types from hifz-core
pub use hifz_core::{
    AssessmentOutcome, DailyPlan, LearnerSettings, MemorizationRecord, MemorizeOutcome, Quality,
    ReviewOutcome, SectionDef, SectionId, SectionOverview, SettingsPatch, SettingsUpdate,
};

// === Memorization ===

/// POST /api/memorization/memorize
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorizeRequest {
    /// Unit to memorize; the next suggested unit when absent.
    #[serde(default)]
    pub unit: Option<u32>,
}

/// POST /api/memorization/review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub unit: u32,
    pub quality: Quality,
}

// === Sections ===

#[derive(Debug, Clone, Serialize)]
pub struct SectionListResponse {
    pub sections: Vec<SectionOverview>,
}

/// POST /api/sections/{id}/assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub answers: Vec<bool>,
}

// === Units ===

#[derive(Debug, Clone, Serialize)]
pub struct UnitSectionResponse {
    pub unit: u32,
    pub section: SectionDef,
}
