mod answers;
mod countdown;
mod grading;
mod observer;
mod plan;
mod progress;
mod scoring;
mod service;
mod ticker;

#[cfg(test)]
pub(crate) mod test_support;

// Public API of the practice subsystem.
pub use crate::error::PracticeError;
pub use answers::{Column, ItemPair, PairBoard, ToggleOutcome, UserAnswer};
pub use countdown::{Countdown, CountdownTick};
pub use grading::{StepDetail, StepResult, grade_matching, grade_multiple_choice, grade_step};
pub use observer::{NoopObserver, PracticeObserver};
pub use plan::{
    ColumnEntry, MatchingColumns, MatchingGroupStep, MultipleChoiceStep, PlanBuilder,
    PracticePlan, Step, StepKey, StepKind,
};
pub use progress::PracticeProgress;
pub use scoring::{PerformanceTier, PracticeSummary, ScoreSnapshot, StepReview, percentage};
pub use service::{PracticeSession, TickOutcome};
pub use ticker::{SecondTicker, TICK_PERIOD, run_until_settled};
