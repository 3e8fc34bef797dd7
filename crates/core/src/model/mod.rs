mod document;
mod ids;
mod lesson;
mod level;
mod question;
mod quiz;
mod result;

pub use document::{ContentFile, FileMetadata};
pub use ids::{LessonId, QuestionId};
pub use lesson::{LessonGroup, LessonGroupMetadata, LessonItem, LessonType};
pub use level::{Level, LevelError};
pub use question::{
    BLANK_MARKER, BLANK_TOKEN, Blank, ChoiceQuestion, FillBlankQuestion, MultiBlankQuestion,
    Question, QuestionError, QuestionKind, StoryQuestion,
};
pub use quiz::Quiz;
pub use result::{PerformanceTier, QuizResult, percentage};
