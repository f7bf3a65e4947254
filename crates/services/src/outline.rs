use serde::Serialize;

use course_core::model::{Course, LessonId, ModuleId, ProgressRecord, QuizScore, Selection};

/// Presentation-agnostic snapshot of the course tree with progress overlaid.
///
/// This is what a sidebar renders: no formatting, just flags and numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOutline {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub completion_percent: u8,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub certificate_eligible: bool,
    pub modules: Vec<ModuleOutline>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOutline {
    pub id: ModuleId,
    pub title: String,
    pub lessons: Vec<LessonOutline>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonOutline {
    pub id: LessonId,
    pub title: String,
    pub completed: bool,
    pub active: bool,
    pub question_count: usize,
    pub quiz_score: Option<QuizScore>,
}

impl CourseOutline {
    #[must_use]
    pub fn build(course: &Course, record: &ProgressRecord, selection: Option<&Selection>) -> Self {
        let modules = course
            .modules()
            .iter()
            .map(|module| ModuleOutline {
                id: module.id().clone(),
                title: module.title().to_owned(),
                lessons: module
                    .lessons()
                    .iter()
                    .map(|lesson| LessonOutline {
                        id: lesson.id().clone(),
                        title: lesson.title().to_owned(),
                        completed: record.is_complete(lesson.id()),
                        active: selection.is_some_and(|s| {
                            s.module_id() == module.id() && s.lesson_id() == lesson.id()
                        }),
                        question_count: lesson.quiz().len(),
                        quiz_score: record.quiz_score(lesson.id()),
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: course.title().to_owned(),
            subtitle: course.subtitle().to_owned(),
            description: course.description().to_owned(),
            completion_percent: record.completion_percent(course),
            completed_lessons: record.completed_in(course),
            total_lessons: course.total_lessons(),
            certificate_eligible: record.is_certificate_eligible(course),
            modules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::catalog::default_course;

    #[test]
    fn outline_overlays_progress_and_selection() {
        let course = default_course().unwrap();
        let mut record = ProgressRecord::new();
        record.mark_complete(LessonId::new("l1"));
        record.record_quiz_score(LessonId::new("l3"), QuizScore::new(0, 2).unwrap());
        let selection = Selection::new(ModuleId::new("m2"), LessonId::new("l3"));

        let outline = CourseOutline::build(&course, &record, Some(&selection));

        assert_eq!(outline.total_lessons, 6);
        assert_eq!(outline.completed_lessons, 1);
        assert_eq!(outline.completion_percent, 17);
        assert!(!outline.certificate_eligible);

        let first = &outline.modules[0].lessons[0];
        assert!(first.completed);
        assert!(!first.active);

        let l3 = &outline.modules[1].lessons[0];
        assert!(l3.active);
        assert!(!l3.completed);
        assert_eq!(l3.question_count, 2);
        assert_eq!(l3.quiz_score, Some(QuizScore::new(0, 2).unwrap()));
    }

    #[test]
    fn serializes_camel_case_for_presenters() {
        let course = default_course().unwrap();
        let outline = CourseOutline::build(&course, &ProgressRecord::new(), None);
        let value = serde_json::to_value(&outline).unwrap();

        assert_eq!(value["completionPercent"], 0);
        assert_eq!(value["certificateEligible"], false);
        let lesson = &value["modules"][0]["lessons"][0];
        assert_eq!(lesson["id"], "l1");
        assert_eq!(lesson["questionCount"], 0);
        assert!(lesson["quizScore"].is_null());
    }
}
