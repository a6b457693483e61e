use rand::rng;
use rand::seq::SliceRandom;
use std::fmt;

use quiz_core::model::{
    ContentRef, ItemKey, MatchingQuestion, MatchingQuestionId, MultipleChoiceQuestion, QuestionId,
    QuizDefinition, TypePair,
};

use super::answers::Column;

//
// ─── STEP IDENTITY ─────────────────────────────────────────────────────────────
//

/// Stable identity of a step; answers and results are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepKey {
    Intro,
    Question(QuestionId),
    MatchingGroup(TypePair),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Intro,
    MultipleChoice,
    Matching,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Intro => f.write_str("intro"),
            StepKind::MultipleChoice => f.write_str("multiple choice"),
            StepKind::Matching => f.write_str("matching"),
        }
    }
}

//
// ─── STEPS ─────────────────────────────────────────────────────────────────────
//

/// A question with its options in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleChoiceStep {
    pub question: MultipleChoiceQuestion,
}

/// One entry of a matching column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEntry {
    pub key: ItemKey,
    pub question_id: MatchingQuestionId,
    pub content: ContentRef,
}

/// Left (A items) and right (B items) columns of a matching group, each in its
/// own presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingColumns {
    pub left: Vec<ColumnEntry>,
    pub right: Vec<ColumnEntry>,
}

impl MatchingColumns {
    #[must_use]
    pub fn column(&self, column: Column) -> &[ColumnEntry] {
        match column {
            Column::Left => &self.left,
            Column::Right => &self.right,
        }
    }

    #[must_use]
    pub fn entry(&self, column: Column, key: ItemKey) -> Option<&ColumnEntry> {
        self.column(column).iter().find(|entry| entry.key == key)
    }
}

/// All matching questions sharing one type pair, played and timed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingGroupStep {
    pub type_pair: TypePair,
    pub questions: Vec<MatchingQuestion>,
    pub columns: MatchingColumns,
}

impl MatchingGroupStep {
    #[must_use]
    pub fn points(&self) -> u32 {
        self.questions
            .iter()
            .fold(0_u32, |acc, q| acc.saturating_add(q.points))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Shown once before the matching groups; never scored.
    Intro,
    MultipleChoice(MultipleChoiceStep),
    MatchingGroup(MatchingGroupStep),
}

impl Step {
    #[must_use]
    pub fn key(&self) -> StepKey {
        match self {
            Step::Intro => StepKey::Intro,
            Step::MultipleChoice(step) => StepKey::Question(step.question.id),
            Step::MatchingGroup(step) => StepKey::MatchingGroup(step.type_pair),
        }
    }

    #[must_use]
    pub fn kind(&self) -> StepKind {
        match self {
            Step::Intro => StepKind::Intro,
            Step::MultipleChoice(_) => StepKind::MultipleChoice,
            Step::MatchingGroup(_) => StepKind::Matching,
        }
    }

    #[must_use]
    pub fn is_scoreable(&self) -> bool {
        !matches!(self, Step::Intro)
    }

    /// Configured point value; zero for the intro.
    #[must_use]
    pub fn points(&self) -> u32 {
        match self {
            Step::Intro => 0,
            Step::MultipleChoice(step) => step.question.points,
            Step::MatchingGroup(step) => step.points(),
        }
    }
}

//
// ─── PLAN ──────────────────────────────────────────────────────────────────────
//

/// The fixed, ordered step sequence of one practice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticePlan {
    pub steps: Vec<Step>,
}

impl PracticePlan {
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Shuffled columns of the matching group keyed by `type_pair`.
    #[must_use]
    pub fn columns(&self, type_pair: &TypePair) -> Option<&MatchingColumns> {
        self.steps.iter().find_map(|step| match step {
            Step::MatchingGroup(group) if group.type_pair == *type_pair => Some(&group.columns),
            _ => None,
        })
    }

    #[must_use]
    pub fn multiple_choice_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::MultipleChoice(_)))
            .count()
    }

    #[must_use]
    pub fn matching_group_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::MatchingGroup(_)))
            .count()
    }
}

/// Linearizes a quiz: multiple-choice steps first, then an intro and one step
/// per matching group.
///
/// Shuffling is unseeded; two builds of the same quiz almost never produce
/// the same order.
pub struct PlanBuilder<'a> {
    quiz: &'a QuizDefinition,
    shuffle: bool,
}

impl<'a> PlanBuilder<'a> {
    #[must_use]
    pub fn new(quiz: &'a QuizDefinition) -> Self {
        Self { quiz, shuffle: true }
    }

    /// Disable to keep authored order for questions, options and columns.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn build(self) -> PracticePlan {
        let mut rng = rng();
        let mut steps = Vec::new();

        let mut questions: Vec<MultipleChoiceQuestion> = self.quiz.multiple_choice().to_vec();
        if self.shuffle {
            questions.shuffle(&mut rng);
        }
        for mut question in questions {
            if self.shuffle {
                question.options.shuffle(&mut rng);
            }
            steps.push(Step::MultipleChoice(MultipleChoiceStep { question }));
        }

        let groups = self.quiz.matching_groups();
        if !groups.is_empty() {
            steps.push(Step::Intro);
        }
        for (type_pair, questions) in groups {
            let mut left: Vec<ColumnEntry> = questions
                .iter()
                .map(|q| ColumnEntry {
                    key: ItemKey::random(),
                    question_id: q.id,
                    content: q.item_a.content.clone(),
                })
                .collect();
            let mut right: Vec<ColumnEntry> = questions
                .iter()
                .map(|q| ColumnEntry {
                    key: ItemKey::random(),
                    question_id: q.id,
                    content: q.item_b.content.clone(),
                })
                .collect();
            if self.shuffle {
                left.shuffle(&mut rng);
                right.shuffle(&mut rng);
            }
            steps.push(Step::MatchingGroup(MatchingGroupStep {
                type_pair,
                questions,
                columns: MatchingColumns { left, right },
            }));
        }

        PracticePlan { steps }
    }
}
