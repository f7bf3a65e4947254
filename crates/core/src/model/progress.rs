use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::course::Course;
use crate::model::ids::LessonId;
use crate::model::quiz::QuizScore;

/// Learner progress: completed lessons and the latest quiz score per lesson.
///
/// Ids of lessons that no longer exist in the course are kept as-is; every
/// derived figure is computed against the course passed in, so stale entries
/// never count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(
        default,
        serialize_with = "serialize_lesson_flags",
        deserialize_with = "deserialize_lesson_flags"
    )]
    completed_lessons: BTreeSet<LessonId>,
    #[serde(default)]
    quiz_scores: BTreeMap<LessonId, QuizScore>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeSet<LessonId> {
        &self.completed_lessons
    }

    #[must_use]
    pub fn quiz_scores(&self) -> &BTreeMap<LessonId, QuizScore> {
        &self.quiz_scores
    }

    #[must_use]
    pub fn is_complete(&self, lesson_id: &LessonId) -> bool {
        self.completed_lessons.contains(lesson_id)
    }

    #[must_use]
    pub fn quiz_score(&self, lesson_id: &LessonId) -> Option<QuizScore> {
        self.quiz_scores.get(lesson_id).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed_lessons.is_empty() && self.quiz_scores.is_empty()
    }

    /// Marks a lesson complete. Returns `false` if it already was.
    pub fn mark_complete(&mut self, lesson_id: LessonId) -> bool {
        self.completed_lessons.insert(lesson_id)
    }

    /// Stores the score, replacing any earlier attempt, and completes the
    /// lesson when the score passes. Returns whether the lesson was newly
    /// completed by this call.
    ///
    /// A failing score never removes an existing completion.
    pub fn record_quiz_score(&mut self, lesson_id: LessonId, score: QuizScore) -> bool {
        self.quiz_scores.insert(lesson_id.clone(), score);
        if score.is_passing() {
            self.mark_complete(lesson_id)
        } else {
            false
        }
    }

    /// Number of the course's lessons that are complete.
    #[must_use]
    pub fn completed_in(&self, course: &Course) -> usize {
        course
            .lessons()
            .filter(|lesson| self.completed_lessons.contains(lesson.id()))
            .count()
    }

    /// Whole-number percentage of the course completed, `0` for a course
    /// without lessons.
    ///
    /// Only a fully completed course reports 100; a near-complete large
    /// course that would round up to 100 reports 99 instead.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn completion_percent(&self, course: &Course) -> u8 {
        let total = course.total_lessons();
        if total == 0 {
            return 0;
        }
        let done = self.completed_in(course);
        if done >= total {
            return 100;
        }
        let percent = (100.0 * done as f64 / total as f64).round();
        percent.clamp(0.0, 99.0) as u8
    }

    /// True when every lesson of the course is complete.
    ///
    /// A course without lessons is vacuously complete even though it reports
    /// 0 percent.
    #[must_use]
    pub fn is_certificate_eligible(&self, course: &Course) -> bool {
        course
            .lessons()
            .all(|lesson| self.completed_lessons.contains(lesson.id()))
    }

    pub fn clear(&mut self) {
        self.completed_lessons.clear();
        self.quiz_scores.clear();
    }
}

//
// ─── PERSISTED SHAPE ───────────────────────────────────────────────────────────
//
// Completed lessons are stored as `{ "<lessonId>": true }`. Entries set to
// `false` are read as not completed.

fn serialize_lesson_flags<S>(set: &BTreeSet<LessonId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(set.iter().map(|id| (id, true)))
}

fn deserialize_lesson_flags<'de, D>(deserializer: D) -> Result<BTreeSet<LessonId>, D::Error>
where
    D: Deserializer<'de>,
{
    let flags = BTreeMap::<LessonId, bool>::deserialize(deserializer)?;
    Ok(flags
        .into_iter()
        .filter_map(|(id, done)| done.then_some(id))
        .collect())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
