//! Shared error types for the services crate.

use thiserror::Error;

use course_core::model::{LessonId, QuizError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CourseViewer` event handlers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ViewerError {
    #[error("complete every lesson to unlock the certificate ({percent}% done)")]
    NotEligible { percent: u8 },
    #[error("no lesson is selected")]
    NoActiveLesson,
    #[error("lesson {0} is not part of this course")]
    UnknownLesson(LessonId),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] course_core::Error),
}
