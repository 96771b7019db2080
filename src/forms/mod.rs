pub mod exam;
pub mod question;

pub use exam::ExamForm;
pub use question::QuestionForm;

use std::fmt;

/// Client-side rejection of a form submission. Carries the message shown
/// inline in the form; no store call is made while one is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}
