use std::collections::BTreeSet;

use quiz_core::model::{ContentRef, OptionId};

use super::answers::{ItemPair, UserAnswer};
use super::plan::{MatchingGroupStep, MultipleChoiceStep, Step, StepKey};

//
// ─── RESULT TYPES ──────────────────────────────────────────────────────────────
//

/// Ground truth a step was compared against, plus what the user gave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepDetail {
    Intro,
    MultipleChoice {
        selected: BTreeSet<OptionId>,
        correct: BTreeSet<OptionId>,
    },
    Matching {
        pairs: Vec<ItemPair>,
        /// Committed pairs that match a ground-truth pair.
        correct_pairs: usize,
        /// Number of questions in the group.
        total_pairs: usize,
        expected: Vec<(ContentRef, ContentRef)>,
    },
}

/// Grading outcome of one step. At most one exists per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub step: StepKey,
    pub is_correct: bool,
    pub points_possible: u32,
    pub points_earned: u32,
    pub answer: Option<UserAnswer>,
    pub detail: StepDetail,
}

impl StepResult {
    /// `(correct, total)` pairs for matching steps.
    #[must_use]
    pub fn pair_score(&self) -> Option<(usize, usize)> {
        match &self.detail {
            StepDetail::Matching {
                correct_pairs,
                total_pairs,
                ..
            } => Some((*correct_pairs, *total_pairs)),
            _ => None,
        }
    }
}

//
// ─── GRADERS ───────────────────────────────────────────────────────────────────
//

/// Grade any step against its recorded answer (`None` counts as wrong).
#[must_use]
pub fn grade_step(step: &Step, answer: Option<&UserAnswer>) -> StepResult {
    match step {
        Step::Intro => StepResult {
            step: StepKey::Intro,
            is_correct: false,
            points_possible: 0,
            points_earned: 0,
            answer: None,
            detail: StepDetail::Intro,
        },
        Step::MultipleChoice(step) => grade_multiple_choice(step, answer),
        Step::MatchingGroup(step) => grade_matching(step, answer),
    }
}

/// Exact set equality, no partial credit.
#[must_use]
pub fn grade_multiple_choice(step: &MultipleChoiceStep, answer: Option<&UserAnswer>) -> StepResult {
    let selected = answer
        .and_then(UserAnswer::selected_options)
        .cloned()
        .unwrap_or_default();
    let correct = step.question.correct_option_ids();
    let is_correct = selected == correct;
    let points_possible = step.question.points;

    StepResult {
        step: StepKey::Question(step.question.id),
        is_correct,
        points_possible,
        points_earned: if is_correct { points_possible } else { 0 },
        answer: answer.cloned(),
        detail: StepDetail::MultipleChoice { selected, correct },
    }
}

/// A group is correct only when every question is paired and every pair is
/// right. Pairs are compared by content, so repeated content is interchangeable.
///
/// Points are all-or-nothing; `correct_pairs` is kept for review.
#[must_use]
pub fn grade_matching(step: &MatchingGroupStep, answer: Option<&UserAnswer>) -> StepResult {
    let expected: Vec<(ContentRef, ContentRef)> = step
        .questions
        .iter()
        .map(|q| (q.item_a.content.clone(), q.item_b.content.clone()))
        .collect();
    let pairs: Vec<ItemPair> = answer
        .and_then(UserAnswer::board)
        .map(|board| board.pairs().to_vec())
        .unwrap_or_default();

    let mut unclaimed: Vec<&(ContentRef, ContentRef)> = expected.iter().collect();
    let mut correct_pairs = 0;
    for pair in &pairs {
        let left = step.columns.left.iter().find(|e| e.key == pair.left);
        let right = step.columns.right.iter().find(|e| e.key == pair.right);
        let (Some(left), Some(right)) = (left, right) else {
            continue;
        };
        if let Some(index) = unclaimed
            .iter()
            .position(|(a, b)| *a == left.content && *b == right.content)
        {
            unclaimed.swap_remove(index);
            correct_pairs += 1;
        }
    }

    let total_pairs = step.questions.len();
    let is_correct = pairs.len() == total_pairs && correct_pairs == total_pairs;
    let points_possible = step.points();

    StepResult {
        step: StepKey::MatchingGroup(step.type_pair),
        is_correct,
        points_possible,
        points_earned: if is_correct { points_possible } else { 0 },
        answer: answer.cloned(),
        detail: StepDetail::Matching {
            pairs,
            correct_pairs,
            total_pairs,
            expected,
        },
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice::answers::{Column, PairBoard};
    use crate::practice::plan::PlanBuilder;
    use crate::practice::test_support::{
        build_matching, build_quiz, correct_option, multi_question, text, wrong_option,
    };
    use quiz_core::model::MatchingQuestionId;

    fn choice(ids: &[OptionId]) -> UserAnswer {
        UserAnswer::Choice(ids.iter().copied().collect())
    }

    fn mc_step() -> MultipleChoiceStep {
        let quiz = build_quiz(vec![multi_question(1, 4)], Vec::new());
        let plan = PlanBuilder::new(&quiz).build();
        match &plan.steps[0] {
            Step::MultipleChoice(step) => step.clone(),
            other => panic!("unexpected step {other:?}"),
        }
    }

    fn matching_step() -> MatchingGroupStep {
        let quiz = build_quiz(
            Vec::new(),
            vec![
                build_matching(1, text("dog"), text("chien")),
                build_matching(2, text("cat"), text("chat")),
                build_matching(3, text("cow"), text("vache")),
            ],
        );
        let plan = PlanBuilder::new(&quiz).build();
        match &plan.steps[1] {
            Step::MatchingGroup(step) => step.clone(),
            other => panic!("unexpected step {other:?}"),
        }
    }

    fn key_of(step: &MatchingGroupStep, column: Column, id: u64) -> quiz_core::model::ItemKey {
        step.columns
            .column(column)
            .iter()
            .find(|e| e.question_id == MatchingQuestionId::new(id))
            .map(|e| e.key)
            .unwrap()
    }

    fn pair(board: &mut PairBoard, step: &MatchingGroupStep, left: u64, right: u64) {
        board.toggle(Column::Left, key_of(step, Column::Left, left));
        board.toggle(Column::Right, key_of(step, Column::Right, right));
    }

    #[test]
    fn multi_select_needs_exact_set() {
        let step = mc_step();
        let both = [correct_option(1), OptionId::new(13)];

        let full = grade_multiple_choice(&step, Some(&choice(&both)));
        assert!(full.is_correct);
        assert_eq!(full.points_earned, 4);

        let partial = grade_multiple_choice(&step, Some(&choice(&both[..1])));
        assert!(!partial.is_correct);
        assert_eq!(partial.points_earned, 0);

        let extra = grade_multiple_choice(
            &step,
            Some(&choice(&[correct_option(1), OptionId::new(13), wrong_option(1)])),
        );
        assert!(!extra.is_correct);
    }

    #[test]
    fn missing_answer_is_incorrect() {
        let result = grade_multiple_choice(&mc_step(), None);
        assert!(!result.is_correct);
        assert!(result.answer.is_none());
    }

    #[test]
    fn grading_is_repeatable() {
        let step = mc_step();
        let answer = choice(&[correct_option(1)]);
        assert_eq!(
            grade_multiple_choice(&step, Some(&answer)),
            grade_multiple_choice(&step, Some(&answer))
        );
    }

    #[test]
    fn all_pairs_right_is_correct() {
        let step = matching_step();
        let mut board = PairBoard::default();
        for id in 1..=3 {
            pair(&mut board, &step, id, id);
        }
        let result = grade_matching(&step, Some(&UserAnswer::Matching(board)));
        assert!(result.is_correct);
        assert_eq!(result.points_earned, 6);
        assert_eq!(result.pair_score(), Some((3, 3)));
    }

    #[test]
    fn partial_pairs_keep_count_but_earn_nothing() {
        let step = matching_step();
        let mut board = PairBoard::default();
        pair(&mut board, &step, 1, 1);
        pair(&mut board, &step, 2, 3);
        pair(&mut board, &step, 3, 2);
        let result = grade_matching(&step, Some(&UserAnswer::Matching(board)));
        assert!(!result.is_correct);
        assert_eq!(result.points_earned, 0);
        assert_eq!(result.points_possible, 6);
        assert_eq!(result.pair_score(), Some((1, 3)));
    }

    #[test]
    fn incomplete_board_is_incorrect() {
        let step = matching_step();
        let mut board = PairBoard::default();
        pair(&mut board, &step, 1, 1);
        pair(&mut board, &step, 2, 2);
        let result = grade_matching(&step, Some(&UserAnswer::Matching(board)));
        assert!(!result.is_correct);
        assert_eq!(result.pair_score(), Some((2, 3)));
    }

    #[test]
    fn repeated_content_matches_either_entry() {
        let quiz = build_quiz(
            Vec::new(),
            vec![
                build_matching(1, text("same"), text("x")),
                build_matching(2, text("same"), text("x")),
            ],
        );
        let plan = PlanBuilder::new(&quiz).build();
        let Step::MatchingGroup(step) = &plan.steps[1] else {
            panic!("expected matching group");
        };
        let mut board = PairBoard::default();
        pair(&mut board, step, 1, 2);
        pair(&mut board, step, 2, 1);
        let result = grade_matching(step, Some(&UserAnswer::Matching(board)));
        assert!(result.is_correct);
    }

    #[test]
    fn intro_grades_with_zero_weight() {
        let result = grade_step(&Step::Intro, None);
        assert!(!result.is_correct);
        assert_eq!(result.points_possible, 0);
        assert_eq!(result.detail, StepDetail::Intro);
    }
}
