//! Daily goal, streak and lazy day rollover.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::types::{DailyCounters, LearnerSettings, MemorizationRecord};

/// Result of checking today's goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEvaluation {
    pub goal_met: bool,
    pub new_streak: u32,
    pub bonus_awarded: bool,
}

/// Goal state as of now, without awarding anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalStatus {
    pub goal_met: bool,
    pub goal_reached_today: bool,
    pub streak: u32,
}

/// Counters for `today`, resetting them if they belong to an earlier day.
///
/// Study days only move forward. If a day-boundary change puts `today`
/// before the counters' day, the counters are kept as they are.
pub fn rollover_if_needed(counters: &DailyCounters, today: NaiveDate) -> DailyCounters {
    if counters.is_behind(today) {
        DailyCounters::fresh(today)
    } else {
        counters.clone()
    }
}

/// Report whether today's goal is met and whether its bonus was already given.
pub fn goal_status(
    counters: &DailyCounters,
    settings: &LearnerSettings,
    streak: u32,
) -> GoalStatus {
    GoalStatus {
        goal_met: evaluate_daily_goal(counters, settings, streak).goal_met,
        goal_reached_today: counters.goal_reached_today,
        streak,
    }
}

/// Check both daily targets against today's counters.
///
/// `counters` must already be rolled over to today. The streak grows by one
/// only on the first evaluation of the day that meets the goal; later calls
/// return `prior_streak` unchanged. Missed days never reset the streak.
pub fn evaluate_daily_goal(
    counters: &DailyCounters,
    settings: &LearnerSettings,
    prior_streak: u32,
) -> GoalEvaluation {
    let goal_met = counters.new_units_done_today >= settings.daily_new_units_target.max(1)
        && counters.review_units_done_today >= settings.daily_review_units_target.max(1);
    let bonus_awarded = goal_met && !counters.goal_reached_today;
    let new_streak = if bonus_awarded {
        prior_streak.saturating_add(1)
    } else {
        prior_streak
    };

    GoalEvaluation {
        goal_met,
        new_streak,
        bonus_awarded,
    }
}

/// Evaluate the goal on a record and apply any streak and bonus.
pub fn apply_daily_goal(
    record: &mut MemorizationRecord,
    config: &SchedulerConfig,
) -> GoalEvaluation {
    let prior_streak = record.rewards.streak;
    let evaluation = evaluate_daily_goal(&record.counters, &record.settings, prior_streak);

    if evaluation.bonus_awarded && evaluation.new_streak != prior_streak {
        record.counters.goal_reached_today = true;
        record.rewards.streak = evaluation.new_streak;
        record.rewards.points += config.points.daily_goal_bonus;
    }

    evaluation
}
