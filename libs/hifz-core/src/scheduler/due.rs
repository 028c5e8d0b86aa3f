//! Selecting units due for review.

use chrono::{DateTime, Utc};

use crate::config::DueOrder;
use crate::types::UnitProgress;

/// Units whose next review is at or before `as_of`, at most `limit` of them.
///
/// With [`DueOrder::Insertion`] units come back in memorization order, so an
/// overdue backlog larger than `limit` carries over to the next day
/// unchanged. [`DueOrder::OldestFirst`] surfaces the longest-waiting units
/// first.
pub fn select_due_reviews(
    units: &[UnitProgress],
    as_of: DateTime<Utc>,
    limit: u32,
    order: DueOrder,
) -> Vec<UnitProgress> {
    let mut due: Vec<&UnitProgress> = units.iter().filter(|u| u.is_due(as_of)).collect();

    if order == DueOrder::OldestFirst {
        // Stable, so ties keep insertion order.
        due.sort_by_key(|u| u.next_review_at);
    }

    due.into_iter().take(limit.max(1) as usize).cloned().collect()
}

/// Number of units due at `as_of`, ignoring any limit.
pub fn count_due(units: &[UnitProgress], as_of: DateTime<Utc>) -> usize {
    units.iter().filter(|u| u.is_due(as_of)).count()
}
