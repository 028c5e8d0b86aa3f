//! Core types for memorization progress.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::layout::{SectionId, SectionLayout};

/// Unit learning status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Memorized,
    Reviewed,
    Mastered,
}

impl Default for UnitStatus {
    fn default() -> Self {
        Self::Memorized
    }
}

/// Self-assessed recall quality for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Hard,
    Good,
    Easy,
}

impl Quality {
    /// Get the quality name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

/// Progress on a single memorized unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitProgress {
    pub unit_number: u32,
    pub memorized_at: DateTime<Utc>,
    pub review_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub status: UnitStatus,
}

impl UnitProgress {
    /// Whether the unit has been reviewed at least once.
    pub fn is_reviewed(&self) -> bool {
        matches!(self.status, UnitStatus::Reviewed | UnitStatus::Mastered)
    }

    /// Whether the unit is due at `as_of`.
    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        self.next_review_at.is_some_and(|due| due <= as_of)
    }
}

/// Per-learner targets and position in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerSettings {
    pub daily_new_units_target: u32,
    pub daily_review_units_target: u32,
    pub cursor_unit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Hour of day (0-23) when a new study day begins.
    #[serde(default)]
    pub daily_reset_hour: u32,
    /// Learner's offset from UTC in minutes.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for LearnerSettings {
    fn default() -> Self {
        Self {
            daily_new_units_target: 1,
            daily_review_units_target: 5,
            cursor_unit: 1,
            started_at: None,
            daily_reset_hour: 0,
            utc_offset_minutes: 0,
        }
    }
}

/// A settings value that was clamped into its allowed range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsAdjustment {
    pub field: String,
    pub requested: i64,
    pub applied: i64,
}

/// Allowed range for `utc_offset_minutes`.
pub const UTC_OFFSET_RANGE_MINUTES: (i64, i64) = (-14 * 60, 14 * 60);

/// Clamp `value` into `low..=high`, recording an adjustment if it moved.
pub fn clamp_setting(
    field: &str,
    value: i64,
    low: i64,
    high: i64,
    adjustments: &mut Vec<SettingsAdjustment>,
) -> i64 {
    let applied = value.clamp(low, high);
    if applied != value {
        adjustments.push(SettingsAdjustment {
            field: field.to_string(),
            requested: value,
            applied,
        });
    }
    applied
}

impl LearnerSettings {
    /// Clamp targets and day-boundary fields into their allowed ranges.
    ///
    /// Out-of-range values are never rejected; each clamp is reported instead.
    pub fn normalize(&mut self, max_unit: u32) -> Vec<SettingsAdjustment> {
        let max_unit = max_unit.max(1) as i64;
        let (offset_low, offset_high) = UTC_OFFSET_RANGE_MINUTES;
        let mut adjustments = Vec::new();

        self.daily_new_units_target = clamp_setting(
            "daily_new_units_target",
            self.daily_new_units_target as i64,
            1,
            max_unit,
            &mut adjustments,
        ) as u32;
        self.daily_review_units_target = clamp_setting(
            "daily_review_units_target",
            self.daily_review_units_target as i64,
            1,
            max_unit,
            &mut adjustments,
        ) as u32;
        self.daily_reset_hour = clamp_setting(
            "daily_reset_hour",
            self.daily_reset_hour as i64,
            0,
            23,
            &mut adjustments,
        ) as u32;
        self.utc_offset_minutes = clamp_setting(
            "utc_offset_minutes",
            self.utc_offset_minutes as i64,
            offset_low,
            offset_high,
            &mut adjustments,
        ) as i32;

        adjustments
    }
}

/// Per-day activity counters, reset lazily on the first action of a new day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounters {
    pub new_units_done_today: u32,
    pub review_units_done_today: u32,
    pub last_active_date: NaiveDate,
    #[serde(default)]
    pub goal_reached_today: bool,
}

impl DailyCounters {
    /// Fresh counters for `today`.
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            new_units_done_today: 0,
            review_units_done_today: 0,
            last_active_date: today,
            goal_reached_today: false,
        }
    }

    /// Whether `today` is a later study day than the counters'.
    pub fn is_behind(&self, today: NaiveDate) -> bool {
        self.last_active_date < today
    }
}

impl Default for DailyCounters {
    fn default() -> Self {
        Self::fresh(NaiveDate::MIN)
    }
}

/// Points and streak accumulated by a learner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    pub points: u64,
    pub streak: u32,
}

/// Result of a section assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub completed: bool,
    pub passed: bool,
    pub score: u32,
    pub total: u32,
    pub taken_at: DateTime<Utc>,
}

/// Lock state for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionState {
    pub id: SectionId,
    pub unlocked: bool,
}

/// Memorization and revision document for one learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorizationRecord {
    pub settings: LearnerSettings,
    pub counters: DailyCounters,
    pub rewards: Rewards,
    /// Memorized units in insertion order; unit numbers are unique.
    pub units: Vec<UnitProgress>,
}

impl Default for MemorizationRecord {
    fn default() -> Self {
        Self {
            settings: LearnerSettings::default(),
            counters: DailyCounters::default(),
            rewards: Rewards::default(),
            units: Vec::new(),
        }
    }
}

impl MemorizationRecord {
    /// Look up a unit's progress.
    pub fn unit(&self, unit_number: u32) -> Option<&UnitProgress> {
        self.units.iter().find(|u| u.unit_number == unit_number)
    }

    /// Look up a unit's progress mutably.
    pub fn unit_mut(&mut self, unit_number: u32) -> Option<&mut UnitProgress> {
        self.units.iter_mut().find(|u| u.unit_number == unit_number)
    }

    /// Whether a unit has been memorized.
    pub fn contains(&self, unit_number: u32) -> bool {
        self.unit(unit_number).is_some()
    }
}

/// Section gating document for one learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionsRecord {
    pub sections: Vec<SectionState>,
    #[serde(default)]
    pub assessments: BTreeMap<SectionId, Assessment>,
}

impl SectionsRecord {
    /// Initial state for a layout: only the first section is unlocked.
    pub fn for_layout(layout: &SectionLayout) -> Self {
        let sections = layout
            .sections()
            .iter()
            .enumerate()
            .map(|(i, def)| SectionState {
                id: def.id,
                unlocked: i == 0,
            })
            .collect();
        Self {
            sections,
            assessments: BTreeMap::new(),
        }
    }

    /// Whether the given section is unlocked.
    pub fn is_unlocked(&self, id: SectionId) -> bool {
        self.sections.iter().any(|s| s.id == id && s.unlocked)
    }
}

impl Default for SectionsRecord {
    fn default() -> Self {
        Self::for_layout(&SectionLayout::default())
    }
}
