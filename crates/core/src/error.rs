use thiserror::Error;

use crate::model::{ContentError, QuestionError, QuizError, SettingsError};

/// Umbrella error for callers that do not care which model rule failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
