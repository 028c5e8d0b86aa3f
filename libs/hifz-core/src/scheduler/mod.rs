//! Scheduling functions over a learner's progress record.
//!
//! Everything here is pure: callers load the record, call in, and persist
//! the result themselves.

pub mod due;
pub mod gating;
pub mod goal;
pub mod interval;
pub mod selection;

pub use due::{count_due, select_due_reviews};
pub use gating::{
    check_attempt, finalize_assessment, record_assessment, section_completion, AssessmentOutcome,
    AssessmentSession, AttemptBlocked, SectionCompletion,
};
pub use goal::{
    apply_daily_goal, evaluate_daily_goal, goal_status, rollover_if_needed, GoalEvaluation,
    GoalStatus,
};
pub use interval::{apply_review_quality, next_review_date, review_unit, ReviewApplied};
pub use selection::{accept_new_unit, lowest_unseen_unit, select_next_new_units};
