//! Read-modify-write orchestration around the scheduler.
//!
//! Every operation loads the learner's documents from the injected store,
//! rolls the daily counters over to the learner's current study day, applies
//! a scheduler function, and saves with the version it read. On a version
//! conflict the whole cycle is retried against the fresh document.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::SchedulerConfig;
use crate::error::{Result, StoreError, TrackerError};
use crate::layout::{SectionDef, SectionId, SectionLayout};
use crate::scheduler::{
    self, AssessmentOutcome, AssessmentSession, AttemptBlocked, GoalEvaluation, GoalStatus,
    ReviewApplied, SectionCompletion,
};
use crate::store::{ProgressStore, Record};
use crate::types::{
    clamp_setting, Assessment, DailyCounters, LearnerSettings, MemorizationRecord, Quality,
    Rewards, SectionsRecord, SettingsAdjustment, UnitProgress, UTC_OFFSET_RANGE_MINUTES,
};

/// Attempts per write before a conflict is reported to the caller.
pub const MAX_WRITE_ATTEMPTS: usize = 3;

/// What the learner should work on today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlan {
    pub today: NaiveDate,
    pub new_units: Vec<u32>,
    pub due_reviews: Vec<UnitProgress>,
    pub due_total: usize,
    pub new_remaining: u32,
    pub review_remaining: u32,
    pub counters: DailyCounters,
    pub settings: LearnerSettings,
    pub rewards: Rewards,
    pub goal: GoalStatus,
}

/// Result of memorizing a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorizeOutcome {
    pub unit: UnitProgress,
    pub newly_memorized: bool,
    pub cursor_unit: u32,
    pub counters: DailyCounters,
    pub rewards: Rewards,
    pub goal: GoalEvaluation,
}

/// Result of reviewing a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub unit: UnitProgress,
    pub points_awarded: u64,
    pub counters: DailyCounters,
    pub rewards: Rewards,
    pub goal: GoalEvaluation,
}

/// Partial settings update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub daily_new_units_target: Option<i64>,
    pub daily_review_units_target: Option<i64>,
    pub daily_reset_hour: Option<i64>,
    pub utc_offset_minutes: Option<i64>,
}

/// Settings after an update, with any clamped values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub settings: LearnerSettings,
    pub adjustments: Vec<SettingsAdjustment>,
    pub rewards: Rewards,
    pub goal: GoalEvaluation,
}

/// One section as seen by the learner.
#[derive(Debug, Clone, Serialize)]
pub struct SectionOverview {
    pub section: SectionDef,
    pub unlocked: bool,
    pub completion: SectionCompletion,
    pub can_attempt: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
}

/// Progress tracker bound to a store and a clock.
pub struct ProgressTracker {
    store: Arc<dyn ProgressStore>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
    layout: SectionLayout,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn ProgressStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(store, clock, SchedulerConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn ProgressStore>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            layout: SectionLayout::default(),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn layout(&self) -> &SectionLayout {
        &self.layout
    }

    /// Today's new units and due reviews. Nothing is written.
    pub async fn daily_plan(&self, user_id: Uuid) -> Result<DailyPlan> {
        let now = self.clock.now();
        let record = self.load_current::<MemorizationRecord>(user_id, now).await?.data;
        let settings = &record.settings;
        let counters = &record.counters;

        let new_remaining = settings
            .daily_new_units_target
            .saturating_sub(counters.new_units_done_today);
        let review_remaining = settings
            .daily_review_units_target
            .saturating_sub(counters.review_units_done_today);

        let new_units = if new_remaining == 0 {
            Vec::new()
        } else {
            scheduler::select_next_new_units(
                &record.units,
                settings.cursor_unit,
                new_remaining,
                self.config.max_unit,
            )
        };
        // Overdue units beyond the target stay due for later days.
        let due_reviews = scheduler::select_due_reviews(
            &record.units,
            now,
            settings.daily_review_units_target,
            self.config.due_order,
        );

        Ok(DailyPlan {
            today: counters.last_active_date,
            new_units,
            due_total: scheduler::count_due(&record.units, now),
            due_reviews,
            new_remaining,
            review_remaining,
            goal: scheduler::goal_status(counters, settings, record.rewards.streak),
            counters: record.counters.clone(),
            settings: record.settings.clone(),
            rewards: record.rewards,
        })
    }

    /// The full memorization document, rolled over to today.
    pub async fn progress(&self, user_id: Uuid) -> Result<MemorizationRecord> {
        let now = self.clock.now();
        Ok(self.load_current::<MemorizationRecord>(user_id, now).await?.data)
    }

    /// Memorize `unit`, or the next suggested unit when `None`.
    pub async fn memorize(&self, user_id: Uuid, unit: Option<u32>) -> Result<MemorizeOutcome> {
        if let Some(unit) = unit {
            self.check_unit(unit)?;
        }
        let config = &self.config;

        self.update::<MemorizationRecord, _, _>(user_id, |record, now| {
            let unit = match unit {
                Some(unit) => unit,
                None => scheduler::select_next_new_units(
                    &record.units,
                    record.settings.cursor_unit,
                    1,
                    config.max_unit,
                )
                .first()
                .copied()
                .ok_or(TrackerError::NothingToMemorize)?,
            };

            let newly_memorized = scheduler::accept_new_unit(record, unit, now, config);
            let goal = scheduler::apply_daily_goal(record, config);
            let progress = record
                .unit(unit)
                .cloned()
                .ok_or(TrackerError::UnknownUnit(unit))?;

            if newly_memorized {
                tracing::info!("Memorized unit {} for {}", unit, user_id);
            }

            Ok(MemorizeOutcome {
                unit: progress,
                newly_memorized,
                cursor_unit: record.settings.cursor_unit,
                counters: record.counters.clone(),
                rewards: record.rewards,
                goal,
            })
        })
        .await
    }

    /// Review a memorized unit.
    pub async fn review(
        &self,
        user_id: Uuid,
        unit: u32,
        quality: Quality,
    ) -> Result<ReviewOutcome> {
        self.check_unit(unit)?;
        let config = &self.config;

        self.update::<MemorizationRecord, _, _>(user_id, |record, now| {
            let ReviewApplied {
                unit: progress,
                points_awarded,
            } = scheduler::review_unit(record, unit, quality, now, config)
                .ok_or(TrackerError::UnknownUnit(unit))?;
            let goal = scheduler::apply_daily_goal(record, config);

            tracing::debug!(
                "Reviewed unit {} as {} for {} (review count {})",
                unit,
                quality.as_str(),
                user_id,
                progress.review_count
            );

            Ok(ReviewOutcome {
                unit: progress,
                points_awarded,
                counters: record.counters.clone(),
                rewards: record.rewards,
                goal,
            })
        })
        .await
    }

    /// Apply a settings patch, clamping out-of-range values.
    pub async fn update_settings(
        &self,
        user_id: Uuid,
        patch: SettingsPatch,
    ) -> Result<SettingsUpdate> {
        let max_unit = self.config.max_unit.max(1) as i64;
        let config = &self.config;

        self.update::<MemorizationRecord, _, _>(user_id, |record, _now| {
            let mut adjustments = Vec::new();
            let settings = &mut record.settings;

            if let Some(value) = patch.daily_new_units_target {
                let field = "daily_new_units_target";
                settings.daily_new_units_target =
                    clamp_setting(field, value, 1, max_unit, &mut adjustments) as u32;
            }
            if let Some(value) = patch.daily_review_units_target {
                let field = "daily_review_units_target";
                settings.daily_review_units_target =
                    clamp_setting(field, value, 1, max_unit, &mut adjustments) as u32;
            }
            if let Some(value) = patch.daily_reset_hour {
                settings.daily_reset_hour =
                    clamp_setting("daily_reset_hour", value, 0, 23, &mut adjustments) as u32;
            }
            if let Some(value) = patch.utc_offset_minutes {
                let (low, high) = UTC_OFFSET_RANGE_MINUTES;
                settings.utc_offset_minutes =
                    clamp_setting("utc_offset_minutes", value, low, high, &mut adjustments) as i32;
            }
            adjustments.extend(settings.normalize(max_unit as u32));
            // Lowering a target can complete a goal already worked toward today.
            let goal = scheduler::apply_daily_goal(record, config);

            for adjustment in &adjustments {
                tracing::warn!(
                    "Clamped {} from {} to {} for {}",
                    adjustment.field,
                    adjustment.requested,
                    adjustment.applied,
                    user_id
                );
            }

            Ok(SettingsUpdate {
                settings: record.settings.clone(),
                adjustments,
                rewards: record.rewards,
                goal,
            })
        })
        .await
    }

    /// Lock state, completion and last assessment for every section.
    pub async fn sections(&self, user_id: Uuid) -> Result<Vec<SectionOverview>> {
        let now = self.clock.now();
        let memorization = self.load_current::<MemorizationRecord>(user_id, now).await?.data;
        let sections = self.load_current::<SectionsRecord>(user_id, now).await?.data;

        Ok(self
            .layout
            .sections()
            .iter()
            .map(|def| {
                let completion = scheduler::section_completion(&memorization.units, def);
                let attempt =
                    scheduler::check_attempt(&sections, &memorization.units, def, &self.config);
                SectionOverview {
                    section: *def,
                    unlocked: sections.is_unlocked(def.id),
                    completion,
                    can_attempt: attempt.is_ok(),
                    assessment: sections.assessments.get(&def.id).cloned(),
                }
            })
            .collect())
    }

    /// Score a finished assessment for `section` and unlock the next one on a pass.
    pub async fn submit_assessment(
        &self,
        user_id: Uuid,
        section: SectionId,
        answers: &[bool],
    ) -> Result<AssessmentOutcome> {
        let def = *self
            .layout
            .get(section)
            .ok_or(TrackerError::UnknownSection(section))?;
        if answers.is_empty() {
            return Err(TrackerError::EmptyAssessment);
        }

        let now = self.clock.now();
        let units = self
            .load_current::<MemorizationRecord>(user_id, now)
            .await?
            .data
            .units;
        let session = AssessmentSession::new(section).record_answers(answers);
        let (config, layout) = (&self.config, &self.layout);

        let outcome = self
            .update::<SectionsRecord, _, _>(user_id, |sections, now| {
                scheduler::check_attempt(sections, &units, &def, config).map_err(
                    |blocked| match blocked {
                        AttemptBlocked::Locked => TrackerError::SectionLocked(section),
                        AttemptBlocked::Incomplete { percent } => TrackerError::SectionIncomplete {
                            section,
                            percent,
                            required: config.completion_percent,
                        },
                    },
                )?;
                Ok(scheduler::record_assessment(sections, layout, session, now, config))
            })
            .await?;

        tracing::info!(
            "Assessment for section {} by {}: {}/{} ({})",
            section,
            user_id,
            outcome.score,
            outcome.total,
            if outcome.passed { "passed" } else { "failed" }
        );

        Ok(outcome)
    }

    /// Section a unit belongs to.
    pub fn resolve(&self, unit: u32) -> Result<SectionId> {
        self.check_unit(unit)?;
        self.layout.resolve(unit).ok_or(TrackerError::UnitOutOfRange {
            unit,
            max_unit: self.config.max_unit,
        })
    }

    fn check_unit(&self, unit: u32) -> Result<()> {
        if unit == 0 || unit > self.config.max_unit {
            return Err(TrackerError::UnitOutOfRange {
                unit,
                max_unit: self.config.max_unit,
            });
        }
        Ok(())
    }

    /// Load a document (default if absent) with its counters rolled over.
    async fn load_current<R: Record>(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Loaded<R>> {
        let (mut data, version) = match self.store.load(user_id, R::FEATURE).await? {
            Some(doc) => (serde_json::from_value::<R>(doc.data)?, Some(doc.version)),
            None => (R::default(), None),
        };
        data.roll_over(now);
        Ok(Loaded { data, version })
    }

    /// Load, mutate and save with compare-and-swap, retrying on conflicts.
    async fn update<R, T, F>(&self, user_id: Uuid, mut mutate: F) -> Result<T>
    where
        R: Record,
        F: FnMut(&mut R, DateTime<Utc>) -> Result<T>,
    {
        let mut last_conflict = None;

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let now = self.clock.now();
            let Loaded { mut data, version } = self.load_current::<R>(user_id, now).await?;
            let result = mutate(&mut data, now)?;
            let value = serde_json::to_value(&data)?;

            match self.store.save(user_id, R::FEATURE, value, version).await {
                Ok(_) => return Ok(result),
                Err(conflict @ StoreError::Conflict { .. }) => {
                    tracing::debug!(
                        "Write conflict on {} for {} (attempt {}/{})",
                        R::FEATURE.as_str(),
                        user_id,
                        attempt,
                        MAX_WRITE_ATTEMPTS
                    );
                    last_conflict = Some(conflict);
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(last_conflict
            .unwrap_or(StoreError::Conflict {
                expected: None,
                actual: None,
            })
            .into())
    }
}

/// A document as loaded, with the version to write back against.
struct Loaded<R> {
    data: R,
    version: Option<u64>,
}
