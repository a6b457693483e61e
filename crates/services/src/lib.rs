#![forbid(unsafe_code)]

pub mod error;
pub mod practice;

pub use quiz_core::Clock;

pub use error::PracticeError;
pub use practice::{
    Column, PracticeObserver, PracticeProgress, PracticeSession, PracticeSummary, SecondTicker,
    Step, StepKey, StepKind, StepResult, TickOutcome, ToggleOutcome, UserAnswer,
    run_until_settled,
};
