//! Picking the next unseen units to memorize.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

use crate::config::SchedulerConfig;
use crate::types::{MemorizationRecord, UnitProgress, UnitStatus};

/// Collect up to `count` units at or above `cursor` that are not in `units`.
///
/// The scan stops after `max_unit`. Returning fewer than `count` units (even
/// none) means the remaining range is already memorized.
pub fn select_next_new_units(
    units: &[UnitProgress],
    cursor: u32,
    count: u32,
    max_unit: u32,
) -> Vec<u32> {
    let seen: HashSet<u32> = units.iter().map(|u| u.unit_number).collect();
    let count = count.max(1) as usize;

    (cursor.max(1)..=max_unit)
        .filter(|unit| !seen.contains(unit))
        .take(count)
        .collect()
}

/// Lowest unit in `1..=max_unit` not yet memorized.
///
/// When every unit is memorized the cursor rests on `max_unit`.
pub fn lowest_unseen_unit(units: &[UnitProgress], max_unit: u32) -> u32 {
    let max_unit = max_unit.max(1);
    select_next_new_units(units, 1, 1, max_unit)
        .first()
        .copied()
        .unwrap_or(max_unit)
}

/// Record `unit` as freshly memorized.
///
/// Returns `false` without touching the record when the unit is already
/// present. On acceptance the first review is scheduled, the cursor is
/// re-scanned, today's new-unit counter is bumped and points are awarded.
pub fn accept_new_unit(
    record: &mut MemorizationRecord,
    unit: u32,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> bool {
    if record.contains(unit) {
        return false;
    }

    record.units.push(UnitProgress {
        unit_number: unit,
        memorized_at: now,
        review_count: 0,
        next_review_at: Some(now + Duration::days(config.interval_days(0))),
        last_reviewed_at: None,
        status: UnitStatus::Memorized,
    });

    record.settings.cursor_unit = lowest_unseen_unit(&record.units, config.max_unit);
    if record.settings.started_at.is_none() {
        record.settings.started_at = Some(now);
    }
    record.counters.new_units_done_today += 1;
    record.rewards.points += config.points.memorized;

    true
}
