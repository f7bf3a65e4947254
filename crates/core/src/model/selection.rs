use crate::model::course::{Course, Lesson};
use crate::model::ids::{LessonId, ModuleId};

/// The module/lesson pair the learner is looking at.
///
/// Transient: never persisted, rebuilt from the course on startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    module_id: ModuleId,
    lesson_id: LessonId,
}

impl Selection {
    #[must_use]
    pub fn new(module_id: ModuleId, lesson_id: LessonId) -> Self {
        Self {
            module_id,
            lesson_id,
        }
    }

    /// First lesson of the first module that has any lessons.
    ///
    /// Returns `None` only when the course has no lessons at all.
    #[must_use]
    pub fn first(course: &Course) -> Option<Self> {
        course.modules().iter().find_map(|module| {
            module
                .lessons()
                .first()
                .map(|lesson| Self::new(module.id().clone(), lesson.id().clone()))
        })
    }

    #[must_use]
    pub fn module_id(&self) -> &ModuleId {
        &self.module_id
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    /// Resolves the lesson inside the selected module.
    ///
    /// A lesson id that exists elsewhere in the course does not match; both
    /// lookups have to hit.
    #[must_use]
    pub fn resolve<'a>(&self, course: &'a Course) -> Option<&'a Lesson> {
        course.module(&self.module_id)?.lesson(&self.lesson_id)
    }
}
