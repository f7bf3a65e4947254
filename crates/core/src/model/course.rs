use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::model::ids::{LessonId, ModuleId};
use crate::model::quiz::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("module title cannot be empty")]
    EmptyModuleTitle,

    #[error("lesson title cannot be empty")]
    EmptyLessonTitle,

    #[error("duplicate module id: {0}")]
    DuplicateModuleId(ModuleId),

    #[error("duplicate lesson id: {0}")]
    DuplicateLessonId(LessonId),

    #[error("invalid video URL: {0}")]
    InvalidVideoUrl(String),
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A single unit of study: text content, an optional video and an optional quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    content: String,
    video: Option<Url>,
    quiz: Vec<Question>,
}

impl Lesson {
    /// Creates a lesson without video or quiz.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyLessonTitle` if the title is blank.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyLessonTitle);
        }
        Ok(Self {
            id,
            title: title.trim().to_owned(),
            content: content.into(),
            video: None,
            quiz: Vec::new(),
        })
    }

    /// Attaches a video by URI.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::InvalidVideoUrl` if `uri` does not parse.
    pub fn with_video(mut self, uri: &str) -> Result<Self, CourseError> {
        let url = Url::parse(uri.trim()).map_err(|_| CourseError::InvalidVideoUrl(uri.into()))?;
        self.video = Some(url);
        Ok(self)
    }

    #[must_use]
    pub fn with_quiz(mut self, quiz: Vec<Question>) -> Self {
        self.quiz = quiz;
        self
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn video(&self) -> Option<&Url> {
        self.video.as_ref()
    }

    #[must_use]
    pub fn quiz(&self) -> &[Question] {
        &self.quiz
    }

    /// Lessons without questions offer no submission.
    #[must_use]
    pub fn has_quiz(&self) -> bool {
        !self.quiz.is_empty()
    }
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// An ordered group of lessons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    id: ModuleId,
    title: String,
    lessons: Vec<Lesson>,
}

impl Module {
    /// # Errors
    ///
    /// Returns `CourseError::EmptyModuleTitle` if the title is blank.
    pub fn new(
        id: ModuleId,
        title: impl Into<String>,
        lessons: Vec<Lesson>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyModuleTitle);
        }
        Ok(Self {
            id,
            title: title.trim().to_owned(),
            lessons,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id() == id)
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

const FRESH_MODULE_PREFIX: &str = "module-";

/// The course tree shown to the learner.
///
/// A `Course` is a value: edits return a new course and leave the receiver
/// untouched, so whoever owns the current course swaps in the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: String,
    title: String,
    subtitle: String,
    description: String,
    modules: Vec<Module>,
}

impl Course {
    /// Creates a course, checking id uniqueness across the whole tree.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` for a blank title, or a duplicate-id
    /// error when two modules (or two lessons anywhere in the course) share an id.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        description: impl Into<String>,
        modules: Vec<Module>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }

        let mut module_ids = HashSet::new();
        let mut lesson_ids = HashSet::new();
        for module in &modules {
            if !module_ids.insert(module.id()) {
                return Err(CourseError::DuplicateModuleId(module.id().clone()));
            }
            for lesson in module.lessons() {
                if !lesson_ids.insert(lesson.id()) {
                    return Err(CourseError::DuplicateLessonId(lesson.id().clone()));
                }
            }
        }

        Ok(Self {
            id: id.into(),
            title: title.trim().to_owned(),
            subtitle: subtitle.into(),
            description: description.into(),
            modules,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.iter().find(|module| module.id() == id)
    }

    /// Every lesson in course order.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|module| module.lessons().iter())
    }

    /// Looks a lesson up anywhere in the tree.
    #[must_use]
    pub fn find_lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons().find(|lesson| lesson.id() == id)
    }

    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|module| module.lessons().len()).sum()
    }

    //
    // ─── EDITS ─────────────────────────────────────────────────────────────────
    //

    /// Returns a copy with a new, empty module appended.
    ///
    /// The title is trimmed like every constructor title; a blank title
    /// yields an unchanged copy.
    #[must_use]
    pub fn add_module(&self, title: &str) -> Self {
        let title = title.trim();
        if title.is_empty() {
            return self.clone();
        }

        let mut next = self.clone();
        next.modules.push(Module {
            id: self.fresh_module_id(),
            title: title.to_owned(),
            lessons: Vec::new(),
        });
        next
    }

    /// Returns a copy with the title replaced.
    ///
    /// The title is taken as typed; the editor updates it on every keystroke,
    /// so a transiently blank title is allowed here.
    #[must_use]
    pub fn with_title(&self, title: &str) -> Self {
        let mut next = self.clone();
        next.title = title.to_owned();
        next
    }

    /// `module-<n>` with `n` one past the highest suffix already in use.
    fn fresh_module_id(&self) -> ModuleId {
        let mut n = self
            .modules
            .iter()
            .filter_map(|module| {
                module
                    .id()
                    .as_str()
                    .strip_prefix(FRESH_MODULE_PREFIX)?
                    .parse::<u64>()
                    .ok()
            })
            .max()
            .map_or(1, |max| max.saturating_add(1));

        loop {
            let candidate = ModuleId::new(format!("{FRESH_MODULE_PREFIX}{n}"));
            if self.module(&candidate).is_none() {
                return candidate;
            }
            n = n.wrapping_add(1);
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: &str) -> Lesson {
        Lesson::new(LessonId::new(id), format!("Lesson {id}"), "body").unwrap()
    }

    fn module(id: &str, lessons: Vec<Lesson>) -> Module {
        Module::new(ModuleId::new(id), format!("Module {id}"), lessons).unwrap()
    }

    fn course(modules: Vec<Module>) -> Course {
        Course::new("c1", "Course", "sub", "desc", modules).unwrap()
    }

    #[test]
    fn course_rejects_duplicate_lesson_ids_across_modules() {
        let err = Course::new(
            "c1",
            "Course",
            "",
            "",
            vec![
                module("m1", vec![lesson("l1")]),
                module("m2", vec![lesson("l1")]),
            ],
        )
        .unwrap_err();
        assert_eq!(err, CourseError::DuplicateLessonId(LessonId::new("l1")));
    }

    #[test]
    fn course_rejects_duplicate_module_ids() {
        let err = Course::new(
            "c1",
            "Course",
            "",
            "",
            vec![module("m1", Vec::new()), module("m1", Vec::new())],
        )
        .unwrap_err();
        assert_eq!(err, CourseError::DuplicateModuleId(ModuleId::new("m1")));
    }

    #[test]
    fn course_rejects_blank_title() {
        let err = Course::new("c1", "  ", "", "", Vec::new()).unwrap_err();
        assert_eq!(err, CourseError::EmptyTitle);
    }

    #[test]
    fn lesson_rejects_invalid_video() {
        let err = lesson("l1").with_video("not a url").unwrap_err();
        assert!(matches!(err, CourseError::InvalidVideoUrl(_)));
    }

    #[test]
    fn lesson_accepts_video_url() {
        let l = lesson("l1")
            .with_video("https://www.youtube.com/embed/abc")
            .unwrap();
        assert_eq!(
            l.video().map(Url::as_str),
            Some("https://www.youtube.com/embed/abc")
        );
    }

    #[test]
    fn counts_and_finds_lessons() {
        let c = course(vec![
            module("m1", vec![lesson("l1"), lesson("l2")]),
            module("m2", vec![lesson("l3")]),
        ]);
        assert_eq!(c.total_lessons(), 3);
        assert_eq!(
            c.find_lesson(&LessonId::new("l3")).map(Lesson::title),
            Some("Lesson l3")
        );
        assert!(c.find_lesson(&LessonId::new("missing")).is_none());
    }

    #[test]
    fn add_module_with_empty_title_is_noop() {
        let c = course(vec![module("m1", vec![lesson("l1")])]);
        assert_eq!(c.add_module(""), c);
        assert_eq!(c.add_module("   "), c);
    }

    #[test]
    fn add_module_appends_one_empty_module() {
        let c = course(vec![module("m1", vec![lesson("l1")])]);
        let next = c.add_module("New");

        assert_eq!(next.modules().len(), 2);
        let added = &next.modules()[1];
        assert_eq!(added.title(), "New");
        assert!(added.lessons().is_empty());
        // original untouched
        assert_eq!(c.modules().len(), 1);
    }

    #[test]
    fn add_module_trims_title() {
        let c = course(vec![module("m1", vec![lesson("l1")])]);
        let next = c.add_module("  New ");
        assert_eq!(next.modules()[1].title(), "New");
    }

    #[test]
    fn fresh_module_ids_are_unique() {
        let c = course(vec![module("module-4", Vec::new())]);
        let next = c.add_module("A").add_module("B");
        let ids: Vec<_> = next.modules().iter().map(|m| m.id().as_str()).collect();
        assert_eq!(ids, vec!["module-4", "module-5", "module-6"]);
    }

    #[test]
    fn with_title_replaces_title_only() {
        let c = course(vec![module("m1", vec![lesson("l1")])]);
        let next = c.with_title("Renamed");
        assert_eq!(next.title(), "Renamed");
        assert_eq!(next.modules(), c.modules());
        assert_eq!(c.title(), "Course");
    }
}
