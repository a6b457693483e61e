use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::content::{ContentError, ContentKind, ContentRef};
use crate::model::ids::{MatchingQuestionId, OptionId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("time limit must be > 0 seconds")]
    InvalidTimeLimit,

    #[error("points must be > 0")]
    InvalidPoints,

    #[error("a question needs at least two options, got {count}")]
    TooFewOptions { count: usize },

    #[error("option text cannot be empty (option {0})")]
    EmptyOptionText(OptionId),

    #[error("option id {0} is used more than once")]
    DuplicateOption(OptionId),

    #[error("at least one option must be marked correct")]
    NoCorrectOption,

    #[error("single-answer questions need exactly one correct option, got {count}")]
    AmbiguousSingleAnswer { count: usize },

    #[error("invalid item content: {0}")]
    Content(#[from] ContentError),
}

//
// ─── MULTIPLE CHOICE ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl AnswerOption {
    pub fn new(id: OptionId, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            is_correct,
        }
    }
}

/// A timed question answered by picking one or more options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoiceQuestion {
    pub id: QuestionId,
    pub text: String,
    #[serde(default)]
    pub hint: Option<String>,
    pub time_limit_secs: u32,
    #[serde(default)]
    pub allow_multiple: bool,
    pub points: u32,
    pub options: Vec<AnswerOption>,
}

impl MultipleChoiceQuestion {
    /// Check the authoring rules a question must satisfy before it can be played.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` found.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if self.time_limit_secs == 0 {
            return Err(QuestionError::InvalidTimeLimit);
        }
        if self.points == 0 {
            return Err(QuestionError::InvalidPoints);
        }
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                count: self.options.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for option in &self.options {
            if option.text.trim().is_empty() {
                return Err(QuestionError::EmptyOptionText(option.id));
            }
            if !seen.insert(option.id) {
                return Err(QuestionError::DuplicateOption(option.id));
            }
        }

        let correct = self.options.iter().filter(|o| o.is_correct).count();
        if correct == 0 {
            return Err(QuestionError::NoCorrectOption);
        }
        if !self.allow_multiple && correct != 1 {
            return Err(QuestionError::AmbiguousSingleAnswer { count: correct });
        }
        Ok(())
    }

    /// Ids of the options flagged correct.
    #[must_use]
    pub fn correct_option_ids(&self) -> BTreeSet<OptionId> {
        self.options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id)
            .collect()
    }

    #[must_use]
    pub fn has_option(&self, id: OptionId) -> bool {
        self.options.iter().any(|o| o.id == id)
    }
}

//
// ─── MATCHING ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingItem {
    pub content: ContentRef,
}

impl MatchingItem {
    #[must_use]
    pub fn new(content: ContentRef) -> Self {
        Self { content }
    }

    #[must_use]
    pub fn content_type(&self) -> ContentKind {
        self.content.kind()
    }
}

/// Grouping key of matching questions: the content kinds of the A and B sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypePair {
    pub left: ContentKind,
    pub right: ContentKind,
}

impl TypePair {
    #[must_use]
    pub fn new(left: ContentKind, right: ContentKind) -> Self {
        Self { left, right }
    }
}

impl std::fmt::Display for TypePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.left.label(), self.right.label())
    }
}

/// One ground-truth pair: `item_a` belongs with `item_b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingQuestion {
    pub id: MatchingQuestionId,
    pub item_a: MatchingItem,
    pub item_b: MatchingItem,
    pub points: u32,
}

impl MatchingQuestion {
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidPoints` or a content error.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.points == 0 {
            return Err(QuestionError::InvalidPoints);
        }
        self.item_a.content.validate()?;
        self.item_b.content.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn type_pair(&self) -> TypePair {
        TypePair::new(self.item_a.content_type(), self.item_b.content_type())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
