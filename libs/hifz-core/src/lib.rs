//! Core memorization library shared by the backend and any other front end.
//!
//! Provides:
//! - Pure scheduling functions (new-unit selection, fixed-table spaced
//!   repetition, due reviews, daily goals, section gating)
//! - Shared types (UnitProgress, LearnerSettings, DailyCounters, etc.)
//! - A versioned document store capability and an in-memory implementation
//! - ProgressTracker, which runs the load/update/save cycle against a store

pub mod clock;
pub mod config;
pub mod error;
pub mod layout;
pub mod scheduler;
pub mod store;
pub mod tracker;
pub mod types;

pub use clock::{Clock, DayBoundary, FixedClock, SystemClock};
pub use config::{DueOrder, PointTable, SchedulerConfig};
pub use error::{Result, StoreError, TrackerError};
pub use layout::{SectionDef, SectionId, SectionLayout};
pub use scheduler::{
    AssessmentOutcome, AssessmentSession, GoalEvaluation, GoalStatus, SectionCompletion,
};
pub use store::{FeatureKey, InMemoryStore, ProgressStore, Record, Versioned};
pub use tracker::{
    DailyPlan, MemorizeOutcome, ProgressTracker, ReviewOutcome, SectionOverview, SettingsPatch,
    SettingsUpdate,
};
pub use types::{
    Assessment, DailyCounters, LearnerSettings, MemorizationRecord, Quality, Rewards,
    SectionState, SectionsRecord, SettingsAdjustment, UnitProgress, UnitStatus,
};
