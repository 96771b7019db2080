pub mod app;
pub mod forms;
pub mod logger;
pub mod models;
pub mod router;
pub mod store;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use app::{App, DetailData, PendingDelete};
pub use forms::{ExamForm, QuestionForm, ValidationError};
pub use models::{AnswerRef, Exam, ExamKind, Question, QuestionType};
pub use router::{DetailMode, NavError, NavEvent, Router, View, transition};
pub use store::StoreError;
