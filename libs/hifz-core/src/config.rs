//! Scheduler constants and tunables.

use serde::{Deserialize, Serialize};

/// Number of pages in the Madani mushaf.
pub const TOTAL_PAGES: u32 = 604;

/// Review intervals in days, indexed by review count (capped at the last entry).
pub const REVIEW_INTERVALS_DAYS: [i64; 6] = [1, 3, 7, 14, 30, 60];

/// Review count at which a unit is considered mastered.
pub const MASTERY_THRESHOLD: u32 = 5;

/// Minimum assessment score, in percent, to pass a section.
pub const ASSESSMENT_PASS_PERCENT: u32 = 70;

/// Minimum reviewed share of a section, in percent, before its assessment opens.
pub const SECTION_COMPLETION_PERCENT: u32 = 80;

/// Points awarded per event.
pub const POINTS_MEMORIZED: u64 = 50;
pub const POINTS_REVIEW_EASY: u64 = 30;
pub const POINTS_REVIEW_GOOD: u64 = 20;
pub const POINTS_REVIEW_HARD: u64 = 10;
pub const POINTS_DAILY_GOAL_BONUS: u64 = 100;

/// Order in which due reviews are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueOrder {
    /// Order in which units were memorized.
    Insertion,
    /// Earliest `next_review_at` first; ties keep insertion order.
    OldestFirst,
}

impl Default for DueOrder {
    fn default() -> Self {
        Self::Insertion
    }
}

/// Point values for the rewarded events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTable {
    pub memorized: u64,
    pub review_easy: u64,
    pub review_good: u64,
    pub review_hard: u64,
    pub daily_goal_bonus: u64,
}

impl Default for PointTable {
    fn default() -> Self {
        Self {
            memorized: POINTS_MEMORIZED,
            review_easy: POINTS_REVIEW_EASY,
            review_good: POINTS_REVIEW_GOOD,
            review_hard: POINTS_REVIEW_HARD,
            daily_goal_bonus: POINTS_DAILY_GOAL_BONUS,
        }
    }
}

/// Everything the scheduler functions need besides the record itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub max_unit: u32,
    pub review_intervals_days: Vec<i64>,
    pub mastery_threshold: u32,
    pub pass_percent: u32,
    pub completion_percent: u32,
    pub points: PointTable,
    pub due_order: DueOrder,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_unit: TOTAL_PAGES,
            review_intervals_days: REVIEW_INTERVALS_DAYS.to_vec(),
            mastery_threshold: MASTERY_THRESHOLD,
            pass_percent: ASSESSMENT_PASS_PERCENT,
            completion_percent: SECTION_COMPLETION_PERCENT,
            points: PointTable::default(),
            due_order: DueOrder::default(),
        }
    }
}

impl SchedulerConfig {
    /// Interval in days for the given review count.
    ///
    /// An empty table falls back to a single day.
    pub fn interval_days(&self, review_count: u32) -> i64 {
        match self.review_intervals_days.len() {
            0 => 1,
            len => {
                let index = (review_count as usize).min(len - 1);
                self.review_intervals_days[index]
            }
        }
    }
}
