use course_core::model::{Course, LessonId, ProgressRecord, QuizScore};
use storage::ProgressAdapter;
use tracing::{debug, info};

use crate::error::ProgressServiceError;

/// Owns the learner's progress record and writes it through on every change.
///
/// Each mutating call updates the in-memory record, then awaits the save
/// before returning, so what the caller reads next is what is stored.
pub struct ProgressService {
    adapter: ProgressAdapter,
    record: ProgressRecord,
}

impl ProgressService {
    /// Load the stored record (or an empty one) through `adapter`.
    pub async fn load(adapter: ProgressAdapter) -> Self {
        let record = adapter.load().await;
        debug!(
            completed = record.completed_lessons().len(),
            scores = record.quiz_scores().len(),
            "progress loaded"
        );
        Self { adapter, record }
    }

    #[must_use]
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    /// Mark a lesson complete and persist.
    ///
    /// Returns `true` if the lesson was not complete before.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the write fails. The
    /// in-memory record keeps the change.
    pub async fn mark_complete(&mut self, lesson_id: LessonId) -> Result<bool, ProgressServiceError> {
        let newly = self.record.mark_complete(lesson_id.clone());
        debug!(lesson = %lesson_id, newly, "lesson marked complete");
        self.persist().await?;
        Ok(newly)
    }

    /// Store a quiz score, auto-completing the lesson on a pass, and persist.
    ///
    /// Returns `true` if the score completed the lesson.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the write fails.
    pub async fn record_quiz_score(
        &mut self,
        lesson_id: LessonId,
        score: QuizScore,
    ) -> Result<bool, ProgressServiceError> {
        let completed = self.record.record_quiz_score(lesson_id.clone(), score);
        debug!(
            lesson = %lesson_id,
            score = score.score(),
            out_of = score.out_of(),
            passed = score.is_passing(),
            completed,
            "quiz score recorded"
        );
        self.persist().await?;
        Ok(completed)
    }

    #[must_use]
    pub fn completion_percent(&self, course: &Course) -> u8 {
        self.record.completion_percent(course)
    }

    #[must_use]
    pub fn is_certificate_eligible(&self, course: &Course) -> bool {
        self.record.is_certificate_eligible(course)
    }

    /// Forget all progress, in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the stored record cannot be removed.
    pub async fn reset(&mut self) -> Result<(), ProgressServiceError> {
        self.record.clear();
        self.adapter.clear().await?;
        info!("progress reset");
        Ok(())
    }

    async fn persist(&self) -> Result<(), ProgressServiceError> {
        self.adapter.save(&self.record).await?;
        Ok(())
    }
}
