use std::collections::BTreeMap;

use crate::model::{Question, QuizError, QuizScore};

//
// ─── ANSWER DRAFT ──────────────────────────────────────────────────────────────
//

/// Options picked so far for the lesson on screen, keyed by question index.
///
/// Nothing here is graded until the learner submits; the draft is thrown
/// away when they move to another lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizAnswers {
    selected: BTreeMap<usize, usize>,
}

impl QuizAnswers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `option` for `question`, replacing an earlier pick.
    pub fn choose(&mut self, question: usize, option: usize) {
        self.selected.insert(question, option);
    }

    #[must_use]
    pub fn selected(&self, question: usize) -> Option<usize> {
        self.selected.get(&question).copied()
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

impl FromIterator<(usize, usize)> for QuizAnswers {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

/// Grades a whole submission in one pass.
///
/// `out_of` is the number of questions; a question counts only when the
/// picked option is its correct one. Unanswered questions count as wrong.
///
/// # Errors
///
/// Returns `QuizError::EmptyQuiz` for a quiz without questions.
///
/// # Examples
///
/// ```
/// # use course_core::grading::{grade, QuizAnswers};
/// # use course_core::model::Question;
/// let quiz = vec![
///     Question::new("2 + 2?", vec!["3".into(), "4".into()], 1).unwrap(),
///     Question::new("Rust mascot?", vec!["Ferris".into(), "Gopher".into()], 0).unwrap(),
/// ];
/// let answers: QuizAnswers = [(0, 1)].into_iter().collect();
/// let score = grade(&quiz, &answers).unwrap();
/// assert_eq!((score.score(), score.out_of()), (1, 2));
/// ```
pub fn grade(quiz: &[Question], answers: &QuizAnswers) -> Result<QuizScore, QuizError> {
    let correct = quiz
        .iter()
        .enumerate()
        .filter(|(index, question)| {
            answers
                .selected(*index)
                .is_some_and(|picked| question.is_correct(picked))
        })
        .count();

    let out_of = u32::try_from(quiz.len()).unwrap_or(u32::MAX);
    let score = u32::try_from(correct).unwrap_or(u32::MAX);
    QuizScore::new(score, out_of)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
