use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{ItemKey, OptionId, PracticeSettings, QuizDefinition, QuizId};

use super::answers::{Column, PairBoard, ToggleOutcome, UserAnswer, record_choice};
use super::countdown::{Countdown, CountdownTick};
use super::grading::{StepResult, grade_step};
use super::observer::{NoopObserver, PracticeObserver};
use super::plan::{PlanBuilder, PracticePlan, Step, StepKey, StepKind};
use super::progress::PracticeProgress;
use super::scoring::{PracticeSummary, ScoreSnapshot};
use crate::error::PracticeError;

/// What one call to `PracticeSession::tick` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown running, or the current step is already graded.
    Idle,
    Ticked { remaining_secs: u32 },
    /// Time ran out and the current step was graded with whatever was recorded.
    Expired(StepResult),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory practice run over one quiz.
///
/// The step sequence is fixed when the session starts. The session is driven
/// from a single event loop: UI commands and one-second `tick` calls.
pub struct PracticeSession {
    quiz_id: QuizId,
    matching_time_limit_secs: u32,
    settings: PracticeSettings,
    plan: PracticePlan,
    current: usize,
    answers: HashMap<StepKey, UserAnswer>,
    results: HashMap<StepKey, StepResult>,
    countdown: Countdown,
    observer: Arc<dyn PracticeObserver>,
    clock: Clock,
    started_at: DateTime<Utc>,
    summary: Option<PracticeSummary>,
}

impl PracticeSession {
    /// Build the step sequence and enter the first step.
    ///
    /// A quiz without questions yields an empty session; check `is_empty`
    /// before presenting a player.
    #[must_use]
    pub fn start(quiz: &QuizDefinition, settings: PracticeSettings) -> Self {
        let plan = PlanBuilder::new(quiz)
            .with_shuffle(settings.shuffle())
            .build();
        let clock = Clock::default();

        let mut session = Self {
            quiz_id: quiz.id(),
            matching_time_limit_secs: quiz.matching_time_limit_secs(),
            settings,
            plan,
            current: 0,
            answers: HashMap::new(),
            results: HashMap::new(),
            countdown: Countdown::default(),
            observer: Arc::new(NoopObserver),
            clock,
            started_at: clock.now(),
            summary: None,
        };

        if session.plan.is_empty() {
            warn!("quiz {} has no questions to practice", session.quiz_id);
        } else {
            info!(
                "practice started for quiz {}: {} steps ({} multiple choice, {} matching groups)",
                session.quiz_id,
                session.plan.len(),
                session.plan.multiple_choice_count(),
                session.plan.matching_group_count()
            );
            session.enter_current();
        }
        session
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PracticeObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Use `clock` for the start and completion timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self.started_at = clock.now();
        self
    }

    // ─── Queries ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn settings(&self) -> &PracticeSettings {
        &self.settings
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// True when the quiz had nothing to practice.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.summary.is_some()
    }

    #[must_use]
    pub fn plan(&self) -> &PracticePlan {
        &self.plan
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.plan.steps
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.plan.steps.get(self.current)
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.countdown.is_running()
    }

    #[must_use]
    pub fn result_for(&self, key: &StepKey) -> Option<&StepResult> {
        self.results.get(key)
    }

    #[must_use]
    pub fn answer_for(&self, key: &StepKey) -> Option<&UserAnswer> {
        self.answers.get(key)
    }

    #[must_use]
    pub fn current_result(&self) -> Option<&StepResult> {
        self.current_step().and_then(|s| self.results.get(&s.key()))
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<&UserAnswer> {
        self.current_step().and_then(|s| self.answers.get(&s.key()))
    }

    #[must_use]
    pub fn is_current_graded(&self) -> bool {
        self.current_result().is_some()
    }

    /// Running score over the steps graded so far.
    #[must_use]
    pub fn score(&self) -> ScoreSnapshot {
        ScoreSnapshot::from_results(&self.plan.steps, &self.results)
    }

    #[must_use]
    pub fn progress(&self) -> PracticeProgress {
        let score = self.score();
        PracticeProgress {
            total_steps: self.plan.len(),
            position: if self.plan.is_empty() { 0 } else { self.current + 1 },
            scoreable_steps: score.scoreable_steps,
            graded_steps: score.graded_steps,
            is_finished: self.is_finished(),
        }
    }

    /// Final report, available once `finish` has run.
    #[must_use]
    pub fn summary(&self) -> Option<&PracticeSummary> {
        self.summary.as_ref()
    }

    // ─── Commands ─────────────────────────────────────────────────────────────

    fn ensure_active(&self) -> Result<(), PracticeError> {
        if self.plan.is_empty() {
            return Err(PracticeError::NoContent);
        }
        if self.is_finished() {
            return Err(PracticeError::Completed);
        }
        Ok(())
    }

    /// Record an option click on the current multiple-choice step.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::WrongStep` off a multiple-choice step,
    /// `UnknownOption` for a foreign option and `StepGraded` once graded.
    pub fn select_option(&mut self, option: OptionId) -> Result<&UserAnswer, PracticeError> {
        self.ensure_active()?;
        let (key, allow_multiple) = match self.current_step() {
            Some(Step::MultipleChoice(step)) => {
                if !step.question.has_option(option) {
                    return Err(PracticeError::UnknownOption(option));
                }
                (
                    StepKey::Question(step.question.id),
                    step.question.allow_multiple,
                )
            }
            Some(other) => {
                return Err(PracticeError::WrongStep {
                    expected: StepKind::MultipleChoice,
                    found: other.kind(),
                });
            }
            None => return Err(PracticeError::NoContent),
        };
        if self.results.contains_key(&key) {
            return Err(PracticeError::StepGraded);
        }

        debug!("option {option} clicked on {key:?}");
        let answer = self
            .answers
            .entry(key)
            .or_insert_with(|| UserAnswer::Choice(BTreeSet::new()));
        if let UserAnswer::Choice(selected) = answer {
            record_choice(selected, option, allow_multiple);
        }
        Ok(&*answer)
    }

    /// Record a click on a matching item of the current group.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::WrongStep` off a matching step, `UnknownItem`
    /// for a key not in `column` and `StepGraded` once graded.
    pub fn toggle_matching_item(
        &mut self,
        column: Column,
        item: ItemKey,
    ) -> Result<ToggleOutcome, PracticeError> {
        self.ensure_active()?;
        let key = match self.current_step() {
            Some(Step::MatchingGroup(group)) => {
                if group.columns.entry(column, item).is_none() {
                    return Err(PracticeError::UnknownItem { column, key: item });
                }
                StepKey::MatchingGroup(group.type_pair)
            }
            Some(other) => {
                return Err(PracticeError::WrongStep {
                    expected: StepKind::Matching,
                    found: other.kind(),
                });
            }
            None => return Err(PracticeError::NoContent),
        };
        if self.results.contains_key(&key) {
            return Err(PracticeError::StepGraded);
        }

        let answer = self
            .answers
            .entry(key)
            .or_insert_with(|| UserAnswer::Matching(PairBoard::default()));
        let UserAnswer::Matching(board) = answer else {
            return Err(PracticeError::WrongStep {
                expected: StepKind::Matching,
                found: StepKind::MultipleChoice,
            });
        };
        let outcome = board.toggle(column, item);
        debug!("{column} item {item} on {key:?}: {outcome:?}");
        Ok(outcome)
    }

    /// Grade the current step. On the intro this just moves on.
    ///
    /// Grading again before anything changes returns the same result.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NoContent` or `Completed`.
    pub fn submit_current(&mut self) -> Result<StepResult, PracticeError> {
        self.ensure_active()?;
        let result = self.grade_current(false)?;
        if matches!(self.current_step(), Some(Step::Intro)) && self.current + 1 < self.plan.len() {
            self.move_to(self.current + 1);
        }
        Ok(result)
    }

    /// Move to the next step.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::AtLastStep` on the last step.
    pub fn advance(&mut self) -> Result<&Step, PracticeError> {
        self.ensure_active()?;
        let next = self.current + 1;
        if next >= self.plan.len() {
            return Err(PracticeError::AtLastStep);
        }
        self.move_to(next);
        self.current_step().ok_or(PracticeError::NoContent)
    }

    /// Move to the previous step. Graded steps stay graded.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::AtFirstStep` on the first step.
    pub fn go_back(&mut self) -> Result<&Step, PracticeError> {
        self.ensure_active()?;
        if self.current == 0 {
            return Err(PracticeError::AtFirstStep);
        }
        self.move_to(self.current - 1);
        self.current_step().ok_or(PracticeError::NoContent)
    }

    /// One-second timer callback.
    ///
    /// Does nothing once the current step is graded, so a tick racing a manual
    /// submit never grades twice.
    pub fn tick(&mut self) -> TickOutcome {
        if self.ensure_active().is_err() || self.is_current_graded() {
            return TickOutcome::Idle;
        }
        match self.countdown.tick(self.settings.time_low_secs()) {
            CountdownTick::Idle => TickOutcome::Idle,
            CountdownTick::Ticked {
                remaining_secs,
                time_low,
            } => {
                if time_low {
                    if let Some(step) = self.plan.steps.get(self.current) {
                        debug!("time low on {:?}: {remaining_secs}s left", step.key());
                        self.observer.on_time_low(step.key(), remaining_secs);
                    }
                }
                TickOutcome::Ticked { remaining_secs }
            }
            CountdownTick::Expired => match self.grade_current(true) {
                Ok(result) => TickOutcome::Expired(result),
                Err(_) => TickOutcome::Idle,
            },
        }
    }

    /// Grade every remaining scoreable step and build the summary.
    ///
    /// Unanswered steps count as incorrect. Calling it again returns the same
    /// summary.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NoContent` for an empty session.
    pub fn finish(&mut self) -> Result<&PracticeSummary, PracticeError> {
        if self.plan.is_empty() {
            return Err(PracticeError::NoContent);
        }
        if self.summary.is_none() {
            self.countdown.stop();
            for step in self.plan.steps.iter().filter(|s| s.is_scoreable()) {
                let key = step.key();
                if !self.results.contains_key(&key) {
                    debug!("grading {key:?} at finish");
                    self.results.insert(key, grade_step(step, self.answers.get(&key)));
                }
            }

            let summary = PracticeSummary::from_results(
                self.quiz_id,
                &self.plan.steps,
                &self.results,
                self.started_at,
                self.clock.now(),
            );
            info!(
                "practice finished for quiz {}: {}/{} points, {}% ({})",
                self.quiz_id,
                summary.earned_points,
                summary.total_points,
                summary.percentage,
                summary.tier
            );
            self.observer.on_finished(&summary);
            self.summary = Some(summary);
        }
        self.summary.as_ref().ok_or(PracticeError::Completed)
    }

    // ─── Internals ────────────────────────────────────────────────────────────

    fn move_to(&mut self, index: usize) {
        self.countdown.stop();
        self.current = index;
        debug!("entering step {} of {}", index + 1, self.plan.len());
        self.enter_current();
    }

    fn enter_current(&mut self) {
        let graded = self.is_current_graded();
        let expired_on_entry = match self.plan.steps.get(self.current) {
            None | Some(Step::Intro) => {
                self.countdown.clear();
                false
            }
            Some(Step::MultipleChoice(step)) => {
                if graded {
                    self.countdown.clear();
                } else {
                    self.countdown.start(step.question.time_limit_secs);
                }
                false
            }
            Some(Step::MatchingGroup(_)) => {
                if graded {
                    self.countdown.clear();
                    false
                } else if self.countdown.start_matching(self.matching_time_limit_secs) {
                    false
                } else {
                    self.countdown.resume_matching();
                    !self.countdown.is_running()
                }
            }
        };

        if expired_on_entry {
            if let Err(err) = self.grade_current(true) {
                warn!("could not grade step after shared matching time ran out: {err}");
            }
        }
    }

    fn grade_current(&mut self, expired: bool) -> Result<StepResult, PracticeError> {
        let step = self
            .plan
            .steps
            .get(self.current)
            .ok_or(PracticeError::NoContent)?;
        let key = step.key();
        let result = grade_step(step, self.answers.get(&key));
        self.countdown.stop();
        let first = self.results.insert(key, result.clone()).is_none();

        if first && step.is_scoreable() {
            if expired {
                info!("time expired on {key:?}");
                self.observer.on_time_expired(key);
            }
            debug!(
                "graded {key:?}: correct={} points={}/{}",
                result.is_correct, result.points_earned, result.points_possible
            );
            if result.is_correct {
                self.observer.on_correct(&result);
            } else {
                self.observer.on_incorrect(&result);
            }
        }
        Ok(result)
    }
}

impl fmt::Debug for PracticeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeSession")
            .field("quiz_id", &self.quiz_id)
            .field("steps_len", &self.plan.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("results_len", &self.results.len())
            .field("countdown", &self.countdown)
            .field("started_at", &self.started_at)
            .field("finished", &self.summary.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
