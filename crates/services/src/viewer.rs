use course_core::certificate::{Certificate, CertificateRenderer};
use course_core::grading::{QuizAnswers, grade};
use course_core::model::{
    Course, Lesson, LessonId, ModuleId, Profile, ProgressRecord, QuizScore, Selection,
};
use storage::ProgressAdapter;
use tracing::{debug, info};

use crate::Clock;
use crate::course_editor::CourseEditor;
use crate::error::ViewerError;
use crate::outline::CourseOutline;
use crate::progress_service::ProgressService;

/// Outcome of submitting a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSubmission {
    pub score: QuizScore,
    /// True when this submission is what completed the lesson.
    pub newly_completed: bool,
}

/// Everything one learner session holds, and the events the screen can send.
///
/// The course, selection, answer draft and profile are transient; only the
/// progress record is persisted, through `ProgressService`.
pub struct CourseViewer {
    clock: Clock,
    editor: CourseEditor,
    progress: ProgressService,
    selection: Option<Selection>,
    answers: QuizAnswers,
    profile: Profile,
}

impl CourseViewer {
    /// Load stored progress and select the first lesson.
    pub async fn open(course: Course, adapter: ProgressAdapter, clock: Clock) -> Self {
        let progress = ProgressService::load(adapter).await;
        let selection = Selection::first(&course);
        debug!(
            course = course.id(),
            lessons = course.total_lessons(),
            selected = ?selection.as_ref().map(Selection::lesson_id),
            "viewer opened"
        );
        Self {
            clock,
            editor: CourseEditor::new(course),
            progress,
            selection,
            answers: QuizAnswers::new(),
            profile: Profile::default(),
        }
    }

    // Accessors
    #[must_use]
    pub fn course(&self) -> &Course {
        self.editor.course()
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressRecord {
        self.progress.record()
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    #[must_use]
    pub fn answers(&self) -> &QuizAnswers {
        &self.answers
    }

    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// The lesson on screen, or `None` when the selection no longer resolves.
    #[must_use]
    pub fn active_lesson(&self) -> Option<&Lesson> {
        self.selection.as_ref()?.resolve(self.course())
    }

    #[must_use]
    pub fn completion_percent(&self) -> u8 {
        self.progress.completion_percent(self.course())
    }

    #[must_use]
    pub fn is_certificate_eligible(&self) -> bool {
        self.progress.is_certificate_eligible(self.course())
    }

    #[must_use]
    pub fn outline(&self) -> CourseOutline {
        CourseOutline::build(self.course(), self.progress(), self.selection.as_ref())
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Show another lesson. Moving to a different lesson drops unsubmitted answers.
    ///
    /// Ids are trusted; a pair that does not resolve leaves `active_lesson`
    /// empty rather than failing.
    pub fn select_lesson(&mut self, module_id: ModuleId, lesson_id: LessonId) {
        let next = Selection::new(module_id, lesson_id);
        if self.selection.as_ref() != Some(&next) {
            self.answers.clear();
        }
        debug!(module = %next.module_id(), lesson = %next.lesson_id(), "lesson selected");
        self.selection = Some(next);
    }

    /// Pick an option for a question of the active lesson.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::NoActiveLesson` if nothing is selected.
    pub fn choose_answer(&mut self, question: usize, option: usize) -> Result<(), ViewerError> {
        if self.active_lesson().is_none() {
            return Err(ViewerError::NoActiveLesson);
        }
        self.answers.choose(question, option);
        Ok(())
    }

    //
    // ─── PROGRESS ──────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `ViewerError::Progress` if the record cannot be saved.
    pub async fn mark_complete(&mut self, lesson_id: LessonId) -> Result<bool, ViewerError> {
        Ok(self.progress.mark_complete(lesson_id).await?)
    }

    /// Grade `answers` against a lesson's quiz and record the score.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::UnknownLesson` if the lesson is not in the course,
    /// `ViewerError::Quiz` if it has no questions, or `ViewerError::Progress`
    /// if the record cannot be saved.
    pub async fn submit_quiz(
        &mut self,
        lesson_id: &LessonId,
        answers: &QuizAnswers,
    ) -> Result<QuizSubmission, ViewerError> {
        let lesson = self
            .course()
            .find_lesson(lesson_id)
            .ok_or_else(|| ViewerError::UnknownLesson(lesson_id.clone()))?;
        let score = grade(lesson.quiz(), answers)?;
        let newly_completed = self
            .progress
            .record_quiz_score(lesson_id.clone(), score)
            .await?;
        Ok(QuizSubmission {
            score,
            newly_completed,
        })
    }

    /// Grade the answer draft for the active lesson.
    ///
    /// The draft stays in place afterwards so the result can be shown next to
    /// the picked options.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::NoActiveLesson` if nothing resolves, otherwise
    /// the errors of [`CourseViewer::submit_quiz`].
    pub async fn submit_active_quiz(&mut self) -> Result<QuizSubmission, ViewerError> {
        let lesson_id = self
            .active_lesson()
            .map(|lesson| lesson.id().clone())
            .ok_or(ViewerError::NoActiveLesson)?;
        let answers = self.answers.clone();
        self.submit_quiz(&lesson_id, &answers).await
    }

    /// # Errors
    ///
    /// Returns `ViewerError::Progress` if the stored record cannot be removed.
    pub async fn reset_progress(&mut self) -> Result<(), ViewerError> {
        self.progress.reset().await?;
        self.answers.clear();
        Ok(())
    }

    //
    // ─── ADMIN ─────────────────────────────────────────────────────────────────
    //

    /// Returns `true` if a module was added.
    pub fn add_module(&mut self, title: &str) -> bool {
        self.editor.add_module(title)
    }

    pub fn set_course_title(&mut self, title: &str) {
        self.editor.set_course_title(title);
    }

    //
    // ─── CERTIFICATE ───────────────────────────────────────────────────────────
    //

    pub fn set_profile_name(&mut self, name: impl Into<String>) {
        self.profile.set_name(name);
    }

    /// Issue and render the certificate, dated today by the viewer's clock.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::NotEligible` while any lesson is incomplete;
    /// nothing changes in that case.
    pub fn print_certificate<R: CertificateRenderer>(
        &self,
        renderer: &R,
    ) -> Result<R::Output, ViewerError> {
        if !self.is_certificate_eligible() {
            return Err(ViewerError::NotEligible {
                percent: self.completion_percent(),
            });
        }
        let certificate = Certificate::issue(&self.profile, self.course(), self.clock.today());
        info!(
            student = certificate.student_name(),
            course = certificate.course_title(),
            "certificate issued"
        );
        Ok(renderer.render(&certificate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::catalog::default_course;
    use course_core::certificate::PlainTextRenderer;
    use course_core::time::fixed_clock;
    use storage::repository::Storage;

    async fn viewer() -> CourseViewer {
        let storage = Storage::in_memory();
        CourseViewer::open(default_course().unwrap(), storage.progress(), fixed_clock()).await
    }

    #[tokio::test]
    async fn opens_on_first_lesson() {
        let viewer = viewer().await;
        assert_eq!(
            viewer.active_lesson().map(|l| l.id().as_str()),
            Some("l1")
        );
        assert_eq!(viewer.completion_percent(), 0);
    }

    #[tokio::test]
    async fn switching_lessons_drops_draft_answers() {
        let mut viewer = viewer().await;
        viewer.select_lesson(ModuleId::new("m1"), LessonId::new("l2"));
        viewer.choose_answer(0, 1).unwrap();

        // re-selecting the same lesson keeps the draft
        viewer.select_lesson(ModuleId::new("m1"), LessonId::new("l2"));
        assert_eq!(viewer.answers().selected(0), Some(1));

        viewer.select_lesson(ModuleId::new("m2"), LessonId::new("l3"));
        assert!(viewer.answers().is_empty());
    }

    #[tokio::test]
    async fn unresolved_selection_degrades_to_no_lesson() {
        let mut viewer = viewer().await;
        viewer.select_lesson(ModuleId::new("m1"), LessonId::new("l3"));
        assert!(viewer.active_lesson().is_none());
        assert!(matches!(
            viewer.choose_answer(0, 0),
            Err(ViewerError::NoActiveLesson)
        ));
        assert!(matches!(
            viewer.submit_active_quiz().await,
            Err(ViewerError::NoActiveLesson)
        ));
    }

    #[tokio::test]
    async fn submitting_lesson_without_quiz_is_rejected() {
        let mut viewer = viewer().await;
        let err = viewer
            .submit_quiz(&LessonId::new("l1"), &QuizAnswers::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ViewerError::Quiz(_)));
        assert!(viewer.progress().quiz_scores().is_empty());
    }

    #[tokio::test]
    async fn submitting_unknown_lesson_is_rejected() {
        let mut viewer = viewer().await;
        let err = viewer
            .submit_quiz(&LessonId::new("nope"), &QuizAnswers::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ViewerError::UnknownLesson(_)));
    }

    #[tokio::test]
    async fn certificate_is_blocked_until_complete() {
        let mut viewer = viewer().await;
        viewer.mark_complete(LessonId::new("l1")).await.unwrap();

        let err = viewer
            .print_certificate(&PlainTextRenderer::default())
            .unwrap_err();
        assert!(matches!(err, ViewerError::NotEligible { percent: 17 }));
    }

    #[tokio::test]
    async fn adding_module_keeps_selection() {
        let mut viewer = viewer().await;
        assert!(viewer.add_module("Bonus"));
        assert!(!viewer.add_module("  "));
        assert_eq!(viewer.course().modules().len(), 4);
        assert_eq!(
            viewer.active_lesson().map(|l| l.id().as_str()),
            Some("l1")
        );
    }
}
