use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("question must offer at least one option")]
    NoOptions,

    #[error("correct index {index} is out of range for {options} options")]
    CorrectIndexOutOfRange { index: usize, options: usize },

    #[error("quiz has no questions")]
    EmptyQuiz,

    #[error("score {score} exceeds question count {out_of}")]
    ScoreAboveTotal { score: u32, out_of: u32 },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question attached to a lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_index: usize,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the text is blank, there are no options, or
    /// `correct_index` does not point at an option.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
    ) -> Result<Self, QuizError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuizError::EmptyQuestion);
        }
        if options.is_empty() {
            return Err(QuizError::NoOptions);
        }
        if correct_index >= options.len() {
            return Err(QuizError::CorrectIndexOutOfRange {
                index: correct_index,
                options: options.len(),
            });
        }

        Ok(Self {
            text: text.trim().to_owned(),
            options,
            correct_index,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index
    }
}

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Minimum ratio of correct answers for a quiz submission to complete its lesson.
pub const PASS_THRESHOLD: f64 = 0.5;

/// Result of one graded quiz submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawQuizScore")]
pub struct QuizScore {
    score: u32,
    out_of: u32,
}

/// Unvalidated persisted shape; routed through `QuizScore::new` on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuizScore {
    score: u32,
    out_of: u32,
}

impl TryFrom<RawQuizScore> for QuizScore {
    type Error = QuizError;

    fn try_from(raw: RawQuizScore) -> Result<Self, Self::Error> {
        Self::new(raw.score, raw.out_of)
    }
}

impl QuizScore {
    /// # Errors
    ///
    /// Returns `QuizError::EmptyQuiz` when `out_of` is zero and
    /// `QuizError::ScoreAboveTotal` when `score > out_of`.
    pub fn new(score: u32, out_of: u32) -> Result<Self, QuizError> {
        if out_of == 0 {
            return Err(QuizError::EmptyQuiz);
        }
        if score > out_of {
            return Err(QuizError::ScoreAboveTotal { score, out_of });
        }
        Ok(Self { score, out_of })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn out_of(&self) -> u32 {
        self.out_of
    }

    #[must_use]
    pub fn ratio(&self) -> f64 {
        f64::from(self.score) / f64::from(self.out_of)
    }

    /// Inclusive: exactly half counts as a pass.
    #[must_use]
    pub fn is_passing(&self) -> bool {
        self.ratio() >= PASS_THRESHOLD
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
