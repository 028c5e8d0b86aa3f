//! Time source and study-day boundaries.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Maps instants to the learner's study day.
///
/// A study day starts at `reset_hour` local time. Before that hour the
/// previous calendar day is still in progress, so late-night sessions count
/// toward it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    reset_hour: u32,
    offset: FixedOffset,
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc()
    }
}

impl DayBoundary {
    /// Midnight UTC.
    pub fn utc() -> Self {
        Self {
            reset_hour: 0,
            offset: Utc.fix(),
        }
    }

    /// Build a boundary from settings values, clamping out-of-range input.
    pub fn new(reset_hour: u32, utc_offset_minutes: i32) -> Self {
        let seconds = utc_offset_minutes.clamp(-14 * 60, 14 * 60) * 60;
        let offset = FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix());
        Self {
            reset_hour: reset_hour.min(23),
            offset,
        }
    }

    /// The study day `instant` belongs to.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        let local = instant.with_timezone(&self.offset);
        (local - Duration::hours(self.reset_hour as i64)).date_naive()
    }
}
