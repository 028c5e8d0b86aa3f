//! Fixed-table spaced repetition.
//!
//! Intervals come from [`SchedulerConfig::review_intervals_days`], indexed by
//! review count and capped at the last entry. Quality moves the review count:
//! - Easy: +2
//! - Good: +1
//! - Hard: -1, floored at zero

use chrono::{DateTime, Duration, Utc};

use crate::config::{PointTable, SchedulerConfig};
use crate::types::{MemorizationRecord, Quality, UnitProgress, UnitStatus};

/// When a unit with `review_count` reviews is next due.
pub fn next_review_date(
    now: DateTime<Utc>,
    review_count: u32,
    config: &SchedulerConfig,
) -> DateTime<Utc> {
    now + Duration::days(config.interval_days(review_count))
}

/// Review count after a review of the given quality.
pub fn next_review_count(review_count: u32, quality: Quality) -> u32 {
    match quality {
        Quality::Easy => review_count.saturating_add(2),
        Quality::Good => review_count.saturating_add(1),
        Quality::Hard => review_count.saturating_sub(1),
    }
}

/// Points awarded for a review. Poor recall is never penalized.
pub fn review_points(quality: Quality, points: &PointTable) -> u64 {
    match quality {
        Quality::Easy => points.review_easy,
        Quality::Good => points.review_good,
        Quality::Hard => points.review_hard,
    }
}

/// Apply a review to a unit.
pub fn apply_review_quality(
    unit: &UnitProgress,
    quality: Quality,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> UnitProgress {
    let review_count = next_review_count(unit.review_count, quality);
    let status = if review_count >= config.mastery_threshold {
        UnitStatus::Mastered
    } else {
        UnitStatus::Reviewed
    };

    UnitProgress {
        unit_number: unit.unit_number,
        memorized_at: unit.memorized_at,
        review_count,
        next_review_at: Some(next_review_date(now, review_count, config)),
        last_reviewed_at: Some(now),
        status,
    }
}

/// Outcome of reviewing a unit inside a record.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewApplied {
    pub unit: UnitProgress,
    pub points_awarded: u64,
}

/// Review `unit_number` in place, bumping today's review counter and points.
///
/// Returns `None` if the unit was never memorized.
pub fn review_unit(
    record: &mut MemorizationRecord,
    unit_number: u32,
    quality: Quality,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> Option<ReviewApplied> {
    let unit = record.unit_mut(unit_number)?;
    *unit = apply_review_quality(unit, quality, now, config);
    let updated = unit.clone();

    let points_awarded = review_points(quality, &config.points);
    record.counters.review_units_done_today += 1;
    record.rewards.points += points_awarded;

    Some(ReviewApplied {
        unit: updated,
        points_awarded,
    })
}
