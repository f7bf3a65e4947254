//! The built-in course loaded at startup.
//!
//! There is no file or network source for course content; this tree is the
//! whole catalog. Edits made through the admin editor live only in memory.

use crate::error::Error;
use crate::model::{Course, Lesson, LessonId, Module, ModuleId, Question};

fn question(text: &str, options: &[&str], correct: usize) -> Result<Question, Error> {
    let options = options.iter().map(|o| (*o).to_owned()).collect();
    Ok(Question::new(text, options, correct)?)
}

fn lesson(id: &str, title: &str, content: &str) -> Result<Lesson, Error> {
    Ok(Lesson::new(LessonId::new(id), title, content)?)
}

/// Builds the default course.
///
/// # Errors
///
/// Returns `Error` if the hard-coded tree fails validation.
pub fn default_course() -> Result<Course, Error> {
    let getting_started = Module::new(
        ModuleId::new("m1"),
        "Getting Started",
        vec![
            lesson(
                "l1",
                "Welcome to the Course",
                "This course walks through the fundamentals of writing safe, fast \
                 programs in Rust. Each module ends with a short quiz; pass it to \
                 mark the lesson complete, or mark lessons complete yourself as you go.",
            )?
            .with_video("https://www.youtube.com/embed/5C_HPTJg5ek")?,
            lesson(
                "l2",
                "Installing the Toolchain",
                "Install rustup, then use it to manage compiler versions. `cargo new` \
                 creates a project and `cargo run` builds and runs it.",
            )?
            .with_quiz(vec![
                question(
                    "Which tool installs and updates the Rust compiler?",
                    &["npm", "rustup", "make"],
                    1,
                )?,
                question(
                    "Which command builds and runs a Cargo project?",
                    &["cargo run", "cargo new", "rustc --help"],
                    0,
                )?,
            ]),
        ],
    )?;

    let ownership = Module::new(
        ModuleId::new("m2"),
        "Ownership and Borrowing",
        vec![
            lesson(
                "l3",
                "Ownership Rules",
                "Every value has a single owner. When the owner goes out of scope \
                 the value is dropped. Assigning a non-Copy value moves it.",
            )?
            .with_quiz(vec![
                question(
                    "How many owners can a value have at a time?",
                    &["One", "Two", "Unlimited"],
                    0,
                )?,
                question(
                    "What happens when the owner goes out of scope?",
                    &["Nothing", "The value is dropped", "The program panics"],
                    1,
                )?,
            ]),
            lesson(
                "l4",
                "References and Borrowing",
                "Borrow with `&T` for shared access or `&mut T` for exclusive access. \
                 You may have many shared borrows or one mutable borrow, never both.",
            )?
            .with_quiz(vec![question(
                "How many mutable references to a value may exist at once?",
                &["Zero", "One", "As many as needed"],
                1,
            )?]),
        ],
    )?;

    let types = Module::new(
        ModuleId::new("m3"),
        "Structs and Enums",
        vec![
            lesson(
                "l5",
                "Defining Structs",
                "Structs group related data under named fields. Methods live in \
                 `impl` blocks.",
            )?,
            lesson(
                "l6",
                "Pattern Matching",
                "`match` must cover every variant of an enum. `Option` and `Result` \
                 are enums you will match on constantly.",
            )?
            .with_quiz(vec![
                question(
                    "Which enum represents an optional value?",
                    &["Result", "Option", "Either"],
                    1,
                )?,
                question(
                    "A `match` on an enum must be...",
                    &["exhaustive", "sorted", "nested"],
                    0,
                )?,
            ]),
        ],
    )?;

    Ok(Course::new(
        "rust-fundamentals",
        "Rust Fundamentals",
        "From first program to fearless code",
        "A self-paced introduction to Rust: tooling, ownership, and the type system.",
        vec![getting_started, ownership, types],
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Selection;

    #[test]
    fn default_course_builds() {
        let course = default_course().unwrap();
        assert_eq!(course.title(), "Rust Fundamentals");
        assert_eq!(course.modules().len(), 3);
        assert_eq!(course.total_lessons(), 6);
    }

    #[test]
    fn default_selection_is_first_lesson() {
        let course = default_course().unwrap();
        let selection = Selection::first(&course).unwrap();
        assert_eq!(selection.module_id().as_str(), "m1");
        assert_eq!(selection.lesson_id().as_str(), "l1");
    }
}
