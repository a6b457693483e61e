use super::grading::StepResult;
use super::plan::StepKey;
use super::scoring::PracticeSummary;

/// Receives session events for audio cues, animations and the like.
///
/// Every method defaults to doing nothing. Grading callbacks fire once per
/// step, the first time it is graded.
pub trait PracticeObserver: Send + Sync {
    fn on_correct(&self, _result: &StepResult) {}

    fn on_incorrect(&self, _result: &StepResult) {}

    fn on_time_low(&self, _step: StepKey, _remaining_secs: u32) {}

    /// Called before the grading callback of a step whose time ran out.
    fn on_time_expired(&self, _step: StepKey) {}

    fn on_finished(&self, _summary: &PracticeSummary) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PracticeObserver for NoopObserver {}
