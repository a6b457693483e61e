use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::model::ids::{MatchingQuestionId, QuestionId, QuizId};
use crate::model::question::{MatchingQuestion, MultipleChoiceQuestion, QuestionError, TypePair};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("multiple-choice question {id} is invalid: {source}")]
    InvalidQuestion {
        id: QuestionId,
        #[source]
        source: QuestionError,
    },

    #[error("matching question {id} is invalid: {source}")]
    InvalidMatching {
        id: MatchingQuestionId,
        #[source]
        source: QuestionError,
    },

    #[error("question id {0} is used more than once")]
    DuplicateQuestion(QuestionId),

    #[error("matching question id {0} is used more than once")]
    DuplicateMatching(MatchingQuestionId),

    #[error("matching questions need a matching time limit > 0")]
    MissingMatchingTimeLimit,

    #[error("quiz json is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Quiz as delivered by the backend, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDraft {
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub multiple_choice: Vec<MultipleChoiceQuestion>,
    #[serde(default)]
    pub matching: Vec<MatchingQuestion>,
    #[serde(default)]
    pub matching_time_limit_secs: u32,
}

impl QuizDraft {
    /// Validate every question and the quiz-level rules.
    ///
    /// A quiz with no questions at all is accepted; callers check
    /// `QuizDefinition::is_empty` before presenting a player.
    ///
    /// # Errors
    ///
    /// Returns the first `QuizError` found.
    pub fn validate(self) -> Result<QuizDefinition, QuizError> {
        if self.title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }

        let mut seen = BTreeSet::new();
        for question in &self.multiple_choice {
            question
                .validate()
                .map_err(|source| QuizError::InvalidQuestion {
                    id: question.id,
                    source,
                })?;
            if !seen.insert(question.id) {
                return Err(QuizError::DuplicateQuestion(question.id));
            }
        }

        let mut seen = BTreeSet::new();
        for question in &self.matching {
            question
                .validate()
                .map_err(|source| QuizError::InvalidMatching {
                    id: question.id,
                    source,
                })?;
            if !seen.insert(question.id) {
                return Err(QuizError::DuplicateMatching(question.id));
            }
        }

        if !self.matching.is_empty() && self.matching_time_limit_secs == 0 {
            return Err(QuizError::MissingMatchingTimeLimit);
        }

        Ok(QuizDefinition {
            id: self.id,
            title: self.title,
            multiple_choice: self.multiple_choice,
            matching: self.matching,
            matching_time_limit_secs: self.matching_time_limit_secs,
        })
    }
}

//
// ─── DEFINITION ────────────────────────────────────────────────────────────────
//

/// Validated, immutable quiz handed to a practice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDefinition {
    id: QuizId,
    title: String,
    multiple_choice: Vec<MultipleChoiceQuestion>,
    matching: Vec<MatchingQuestion>,
    matching_time_limit_secs: u32,
}

impl QuizDefinition {
    /// Parse and validate a quiz from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Json` for malformed input or a validation error.
    pub fn from_json(raw: &str) -> Result<Self, QuizError> {
        let draft: QuizDraft = serde_json::from_str(raw)?;
        draft.validate()
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn multiple_choice(&self) -> &[MultipleChoiceQuestion] {
        &self.multiple_choice
    }

    #[must_use]
    pub fn matching(&self) -> &[MatchingQuestion] {
        &self.matching
    }

    #[must_use]
    pub fn matching_time_limit_secs(&self) -> u32 {
        self.matching_time_limit_secs
    }

    /// True when the quiz has nothing to practice.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.multiple_choice.is_empty() && self.matching.is_empty()
    }

    /// Matching questions partitioned by their A/B content kinds, in key order.
    #[must_use]
    pub fn matching_groups(&self) -> BTreeMap<TypePair, Vec<MatchingQuestion>> {
        let mut groups: BTreeMap<TypePair, Vec<MatchingQuestion>> = BTreeMap::new();
        for question in &self.matching {
            groups
                .entry(question.type_pair())
                .or_default()
                .push(question.clone());
        }
        groups
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::content::{ContentKind, ContentRef};
    use crate::model::ids::OptionId;
    use crate::model::question::{AnswerOption, MatchingItem};

    fn mc(id: u64) -> MultipleChoiceQuestion {
        MultipleChoiceQuestion {
            id: QuestionId::new(id),
            text: format!("Q{id}"),
            hint: Some("think".into()),
            time_limit_secs: 20,
            allow_multiple: false,
            points: 1,
            options: vec![
                AnswerOption::new(OptionId::new(id * 10), "yes", true),
                AnswerOption::new(OptionId::new(id * 10 + 1), "no", false),
            ],
        }
    }

    fn matching(id: u64, a: ContentRef, b: ContentRef) -> MatchingQuestion {
        MatchingQuestion {
            id: MatchingQuestionId::new(id),
            item_a: MatchingItem::new(a),
            item_b: MatchingItem::new(b),
            points: 2,
        }
    }

    fn draft() -> QuizDraft {
        QuizDraft {
            id: QuizId::new(1),
            title: "Animals".into(),
            multiple_choice: vec![mc(1), mc(2)],
            matching: Vec::new(),
            matching_time_limit_secs: 0,
        }
    }

    #[test]
    fn empty_quiz_is_valid_but_reports_empty() {
        let mut d = draft();
        d.multiple_choice.clear();
        let quiz = d.validate().unwrap();
        assert!(quiz.is_empty());
    }

    #[test]
    fn duplicate_question_ids_fail() {
        let mut d = draft();
        d.multiple_choice.push(mc(1));
        assert!(matches!(
            d.validate().unwrap_err(),
            QuizError::DuplicateQuestion(id) if id == QuestionId::new(1)
        ));
    }

    #[test]
    fn invalid_question_reports_its_id() {
        let mut d = draft();
        d.multiple_choice[1].points = 0;
        let err = d.validate().unwrap_err();
        assert!(matches!(
            err,
            QuizError::InvalidQuestion { id, source: QuestionError::InvalidPoints }
                if id == QuestionId::new(2)
        ));
    }

    #[test]
    fn matching_requires_time_limit() {
        let mut d = draft();
        d.matching.push(matching(
            1,
            ContentRef::text("a").unwrap(),
            ContentRef::text("b").unwrap(),
        ));
        assert!(matches!(
            d.validate().unwrap_err(),
            QuizError::MissingMatchingTimeLimit
        ));
    }

    #[test]
    fn matching_groups_are_keyed_by_type_pair() {
        let mut d = draft();
        d.matching_time_limit_secs = 60;
        let img = || ContentRef::existing_image("https://cdn.example.com/x.png").unwrap();
        d.matching.push(matching(1, ContentRef::text("a").unwrap(), img()));
        d.matching.push(matching(
            2,
            ContentRef::text("b").unwrap(),
            ContentRef::text("c").unwrap(),
        ));
        d.matching.push(matching(3, ContentRef::text("d").unwrap(), img()));
        let quiz = d.validate().unwrap();

        let groups = quiz.matching_groups();
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                TypePair::new(ContentKind::Text, ContentKind::Text),
                TypePair::new(ContentKind::Text, ContentKind::Image),
            ]
        );
        assert_eq!(
            groups[&TypePair::new(ContentKind::Text, ContentKind::Image)].len(),
            2
        );
    }

    #[test]
    fn quiz_parses_from_json() {
        let raw = r#"{
            "id": 3,
            "title": "Colors",
            "multiple_choice": [{
                "id": 1, "text": "Sky?", "time_limit_secs": 10, "points": 5,
                "options": [
                    {"id": 1, "text": "blue", "is_correct": true},
                    {"id": 2, "text": "green"}
                ]
            }],
            "matching": [{
                "id": 1, "points": 2,
                "item_a": {"content": {"text": "red"}},
                "item_b": {"content": {"text": "rouge"}}
            }],
            "matching_time_limit_secs": 45
        }"#;
        let quiz = QuizDefinition::from_json(raw).unwrap();
        assert_eq!(quiz.title(), "Colors");
        assert_eq!(quiz.multiple_choice().len(), 1);
        assert_eq!(quiz.matching_time_limit_secs(), 45);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = QuizDefinition::from_json("{").unwrap_err();
        assert!(matches!(err, QuizError::Json(_)));
    }
}
