use thiserror::Error;

use crate::model::{CourseError, ParseIdError, QuizError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}
