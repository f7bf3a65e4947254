use chrono::NaiveDate;

use crate::model::{Course, Profile};

/// Name used when the learner has not entered one.
pub const DEFAULT_STUDENT_NAME: &str = "Student";

/// Contents of a completion certificate.
///
/// Issuing does not check eligibility; callers gate on
/// `ProgressRecord::is_certificate_eligible` first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    student_name: String,
    course_title: String,
    date: NaiveDate,
}

impl Certificate {
    #[must_use]
    pub fn issue(profile: &Profile, course: &Course, date: NaiveDate) -> Self {
        Self {
            student_name: profile
                .display_name()
                .unwrap_or(DEFAULT_STUDENT_NAME)
                .to_owned(),
            course_title: course.title().to_owned(),
            date,
        }
    }

    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    #[must_use]
    pub fn course_title(&self) -> &str {
        &self.course_title
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Turns a certificate into something a printer or screen can take.
pub trait CertificateRenderer {
    type Output;

    fn render(&self, certificate: &Certificate) -> Self::Output;
}

/// Centered plain-text layout.
#[derive(Debug, Clone, Copy)]
pub struct PlainTextRenderer {
    width: usize,
}

impl PlainTextRenderer {
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new(60)
    }
}

impl CertificateRenderer for PlainTextRenderer {
    type Output = String;

    fn render(&self, certificate: &Certificate) -> String {
        let date = certificate.date().format("%B %-d, %Y").to_string();
        let lines = [
            "CERTIFICATE OF COMPLETION",
            "",
            "This certifies that",
            certificate.student_name(),
            "has successfully completed",
            certificate.course_title(),
            "",
            date.as_str(),
        ];

        let rule = "=".repeat(self.width);
        let mut out = format!("{rule}\n");
        for line in lines {
            out.push_str(&format!("{line:^width$}\n", width = self.width));
        }
        out.push_str(&format!("{rule}\n"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        Course::new("c", "Rust Basics", "", "", Vec::new()).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn issue_uses_profile_name() {
        let cert = Certificate::issue(&Profile::new("  Ada Lovelace "), &course(), date());
        assert_eq!(cert.student_name(), "Ada Lovelace");
        assert_eq!(cert.course_title(), "Rust Basics");
        assert_eq!(cert.date(), date());
    }

    #[test]
    fn blank_name_falls_back_to_student() {
        let cert = Certificate::issue(&Profile::new("   "), &course(), date());
        assert_eq!(cert.student_name(), DEFAULT_STUDENT_NAME);
    }

    #[test]
    fn plain_text_contains_fields() {
        let cert = Certificate::issue(&Profile::new("Ada"), &course(), date());
        let text = PlainTextRenderer::default().render(&cert);
        assert!(text.contains("CERTIFICATE OF COMPLETION"));
        assert!(text.contains("Ada"));
        assert!(text.contains("Rust Basics"));
        assert!(text.contains("March 9, 2024"));
    }

    #[test]
    fn plain_text_is_framed_at_fixed_width() {
        let cert = Certificate::issue(&Profile::new("Ada"), &course(), date());
        let text = PlainTextRenderer::default().render(&cert);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "=".repeat(60));
        assert_eq!(lines[9], "=".repeat(60));
        assert!(lines.iter().all(|line| line.chars().count() == 60));
        assert!(text.ends_with('\n'));
    }
}
