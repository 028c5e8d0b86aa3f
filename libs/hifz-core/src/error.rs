//! Error types for hifz-core.

use thiserror::Error;

use crate::layout::SectionId;

/// Result type alias using TrackerError.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors reported by a progress store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("version conflict: expected {expected:?}, found {actual:?}")]
    Conflict {
        expected: Option<u64>,
        actual: Option<u64>,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while loading, updating or saving progress.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("stored record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("unit {unit} is outside 1..={max_unit}")]
    UnitOutOfRange { unit: u32, max_unit: u32 },

    #[error("unit {0} has not been memorized")]
    UnknownUnit(u32),

    #[error("no units left to memorize")]
    NothingToMemorize,

    #[error("unknown section {0}")]
    UnknownSection(SectionId),

    #[error("section {0} is locked")]
    SectionLocked(SectionId),

    #[error("section {section} is {percent}% reviewed, {required}% required")]
    SectionIncomplete {
        section: SectionId,
        percent: u32,
        required: u32,
    },

    #[error("assessment has no answers")]
    EmptyAssessment,
}
