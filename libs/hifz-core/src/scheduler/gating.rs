//! Section gating behind assessments.
//!
//! A section is LOCKED until the one before it is passed, then UNLOCKED.
//! Its assessment opens once enough of its units have been reviewed and can
//! be retaken any number of times. Passing unlocks the next section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::layout::{SectionDef, SectionId, SectionLayout};
use crate::types::{Assessment, SectionsRecord, UnitProgress};

/// How much of a section has been reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionCompletion {
    pub reviewed: u32,
    pub total: u32,
    pub percent: u32,
}

/// Reviewed share of `section`, counting reviewed and mastered units.
pub fn section_completion(units: &[UnitProgress], section: &SectionDef) -> SectionCompletion {
    let reviewed = units
        .iter()
        .filter(|u| section.contains(u.unit_number) && u.is_reviewed())
        .count() as u32;
    let total = section.len();
    let percent = if total == 0 { 0 } else { reviewed * 100 / total };

    SectionCompletion {
        reviewed,
        total,
        percent,
    }
}

/// Whether the section's own completion allows an assessment attempt.
pub fn meets_completion_gate(completion: &SectionCompletion, config: &SchedulerConfig) -> bool {
    completion.total > 0
        && completion.reviewed * 100 >= completion.total * config.completion_percent
}

/// Why an assessment cannot be attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum AttemptBlocked {
    Locked,
    Incomplete { percent: u32 },
}

/// Check the preconditions for attempting `section`'s assessment.
pub fn check_attempt(
    sections: &SectionsRecord,
    units: &[UnitProgress],
    section: &SectionDef,
    config: &SchedulerConfig,
) -> Result<SectionCompletion, AttemptBlocked> {
    if !sections.is_unlocked(section.id) {
        return Err(AttemptBlocked::Locked);
    }
    let completion = section_completion(units, section);
    if !meets_completion_gate(&completion, config) {
        return Err(AttemptBlocked::Incomplete {
            percent: completion.percent,
        });
    }
    Ok(completion)
}

/// Running tally of an assessment in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSession {
    pub section: SectionId,
    pub answered: u32,
    pub correct: u32,
}

impl AssessmentSession {
    pub fn new(section: SectionId) -> Self {
        Self {
            section,
            answered: 0,
            correct: 0,
        }
    }

    /// Record one answer.
    pub fn record_answer(mut self, correct: bool) -> Self {
        self.answered += 1;
        if correct {
            self.correct += 1;
        }
        self
    }

    /// Fold a batch of answers.
    pub fn record_answers(self, answers: &[bool]) -> Self {
        answers.iter().fold(self, |session, &correct| session.record_answer(correct))
    }
}

/// Outcome of a finished assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    pub passed: bool,
    pub score: u32,
    pub total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked: Option<SectionId>,
}

/// Pass iff `score / total` reaches the pass threshold. An empty
/// assessment never passes.
pub fn finalize_assessment(score: u32, total: u32, config: &SchedulerConfig) -> AssessmentOutcome {
    let score = score.min(total);
    let passed = total > 0 && score * 100 >= total * config.pass_percent;
    AssessmentOutcome {
        passed,
        score,
        total,
        unlocked: None,
    }
}

/// Store an assessment result and unlock the next section on a pass.
///
/// The next section only unlocks when `section` itself is unlocked.
pub fn record_assessment(
    sections: &mut SectionsRecord,
    layout: &SectionLayout,
    session: AssessmentSession,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> AssessmentOutcome {
    let mut outcome = finalize_assessment(session.correct, session.answered, config);

    sections.assessments.insert(
        session.section,
        Assessment {
            completed: true,
            passed: outcome.passed,
            score: outcome.score,
            total: outcome.total,
            taken_at: now,
        },
    );

    if outcome.passed && sections.is_unlocked(session.section) {
        if let Some(next) = layout.next_after(session.section) {
            if let Some(state) = sections.sections.iter_mut().find(|s| s.id == next.id) {
                if !state.unlocked {
                    state.unlocked = true;
                    outcome.unlocked = Some(next.id);
                }
            }
        }
    }

    outcome
}
