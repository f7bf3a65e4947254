#![forbid(unsafe_code)]

pub mod app_services;
pub mod course_editor;
pub mod error;
pub mod outline;
pub mod progress_service;
pub mod viewer;

pub use course_core::Clock;

pub use app_services::AppServices;
pub use course_editor::CourseEditor;
pub use error::{AppServicesError, ProgressServiceError, ViewerError};
pub use outline::{CourseOutline, LessonOutline, ModuleOutline};
pub use progress_service::ProgressService;
pub use viewer::{CourseViewer, QuizSubmission};
