use quiz_core::model::{
    AnswerOption, ContentRef, MatchingItem, MatchingQuestion, MatchingQuestionId,
    MultipleChoiceQuestion, OptionId, QuestionId, QuizDefinition, QuizDraft, QuizId,
};

pub(crate) const QUESTION_TIME_SECS: u32 = 10;
pub(crate) const MATCHING_TIME_SECS: u32 = 30;

pub(crate) fn correct_option(question: u64) -> OptionId {
    OptionId::new(question * 10 + 1)
}

pub(crate) fn wrong_option(question: u64) -> OptionId {
    OptionId::new(question * 10 + 2)
}

/// Single-answer question whose correct option is `correct_option(id)`.
pub(crate) fn build_question(id: u64, points: u32) -> MultipleChoiceQuestion {
    MultipleChoiceQuestion {
        id: QuestionId::new(id),
        text: format!("Question {id}"),
        hint: None,
        time_limit_secs: QUESTION_TIME_SECS,
        allow_multiple: false,
        points,
        options: vec![
            AnswerOption::new(correct_option(id), "right", true),
            AnswerOption::new(wrong_option(id), "wrong", false),
            AnswerOption::new(OptionId::new(id * 10 + 3), "also wrong", false),
        ],
    }
}

/// Multi-answer question; options `id*10+1` and `id*10+3` are correct.
pub(crate) fn multi_question(id: u64, points: u32) -> MultipleChoiceQuestion {
    let mut question = build_question(id, points);
    question.allow_multiple = true;
    question.options[2].is_correct = true;
    question
}

pub(crate) fn text(raw: &str) -> ContentRef {
    ContentRef::text(raw).unwrap()
}

pub(crate) fn image(name: &str) -> ContentRef {
    ContentRef::existing_image(format!("https://cdn.example.com/{name}.png")).unwrap()
}

pub(crate) fn build_matching(id: u64, a: ContentRef, b: ContentRef) -> MatchingQuestion {
    MatchingQuestion {
        id: MatchingQuestionId::new(id),
        item_a: MatchingItem::new(a),
        item_b: MatchingItem::new(b),
        points: 2,
    }
}

pub(crate) fn build_quiz(
    multiple_choice: Vec<MultipleChoiceQuestion>,
    matching: Vec<MatchingQuestion>,
) -> QuizDefinition {
    QuizDraft {
        id: QuizId::new(1),
        title: "Practice".into(),
        multiple_choice,
        matching,
        matching_time_limit_secs: MATCHING_TIME_SECS,
    }
    .validate()
    .unwrap()
}
