use course_core::model::Course;
use tracing::debug;

/// The single owned slot holding the current course.
///
/// Edits never touch the held value in place: each one builds a new `Course`
/// and swaps it in, so anything that cloned the previous course keeps a
/// consistent snapshot.
#[derive(Debug, Clone)]
pub struct CourseEditor {
    course: Course,
}

impl CourseEditor {
    #[must_use]
    pub fn new(course: Course) -> Self {
        Self { course }
    }

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    /// Append an empty module. Blank titles are ignored.
    ///
    /// Returns `true` if a module was added.
    pub fn add_module(&mut self, title: &str) -> bool {
        let next = self.course.add_module(title);
        let added = next.modules().len() > self.course.modules().len();
        if added {
            debug!(
                title = title.trim(),
                modules = next.modules().len(),
                "module added"
            );
        }
        self.course = next;
        added
    }

    pub fn set_course_title(&mut self, title: &str) {
        self.course = self.course.with_title(title);
        debug!(title, "course title changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::catalog::default_course;

    #[test]
    fn blank_title_leaves_course_unchanged() {
        let mut editor = CourseEditor::new(default_course().unwrap());
        let before = editor.course().clone();
        assert!(!editor.add_module(""));
        assert_eq!(editor.course(), &before);
    }

    #[test]
    fn add_module_swaps_in_new_course() {
        let mut editor = CourseEditor::new(default_course().unwrap());
        let snapshot = editor.course().clone();

        assert!(editor.add_module("New"));
        assert_eq!(editor.course().modules().len(), snapshot.modules().len() + 1);
        let last = editor.course().modules().last().unwrap();
        assert_eq!(last.title(), "New");
        assert!(last.lessons().is_empty());
        assert_eq!(snapshot.modules().len(), 3);
    }

    #[test]
    fn set_title_replaces_title() {
        let mut editor = CourseEditor::new(default_course().unwrap());
        editor.set_course_title("Advanced Rust");
        assert_eq!(editor.course().title(), "Advanced Rust");
    }
}
