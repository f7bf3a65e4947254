mod course;
mod ids;
mod profile;
mod progress;
mod quiz;
mod selection;

pub use ids::{LessonId, ModuleId, ParseIdError};

pub use course::{Course, CourseError, Lesson, Module};
pub use profile::Profile;
pub use progress::ProgressRecord;
pub use quiz::{PASS_THRESHOLD, Question, QuizError, QuizScore};
pub use selection::Selection;
