mod content;
mod ids;
mod question;
mod quiz;
mod settings;

pub use content::{ContentError, ContentKind, ContentRef};
pub use ids::{ItemKey, MatchingQuestionId, OptionId, ParseIdError, QuestionId, QuizId};
pub use question::{
    AnswerOption, MatchingItem, MatchingQuestion, MultipleChoiceQuestion, QuestionError, TypePair,
};
pub use quiz::{QuizDefinition, QuizDraft, QuizError};
pub use settings::{PracticeSettings, SettingsError};
