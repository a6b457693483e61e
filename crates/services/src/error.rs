//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{ItemKey, OptionId};

use crate::practice::{Column, StepKind};

/// Errors emitted by `PracticeSession` commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("quiz has no questions to practice")]
    NoContent,
    #[error("practice session already finished")]
    Completed,
    #[error("current step is {found}, expected {expected}")]
    WrongStep { expected: StepKind, found: StepKind },
    #[error("option {0} does not belong to the current question")]
    UnknownOption(OptionId),
    #[error("item {key} is not in the {column} column")]
    UnknownItem { column: Column, key: ItemKey },
    #[error("current step is already graded")]
    StepGraded,
    #[error("already at the last step")]
    AtLastStep,
    #[error("already at the first step")]
    AtFirstStep,
}
