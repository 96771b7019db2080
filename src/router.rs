use crate::models::Question;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
    ExamForm,
    QuestionForm,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::List => "list",
            View::Detail => "detail",
            View::ExamForm => "examForm",
            View::QuestionForm => "questionForm",
        };
        write!(f, "{}", name)
    }
}

/// Whether the detail screen exposes mutation actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailMode {
    #[default]
    View,
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    SelectExam { exam_id: String, mode: DetailMode },
    BackToList,
    BackToDetail,
    CreateExam,
    EditExam { exam_id: String },
    CreateQuestion { exam_id: String },
    EditQuestion { exam_id: String, question: Question },
    ExamSaved,
    QuestionSaved,
}

impl NavEvent {
    pub fn name(&self) -> &'static str {
        match self {
            NavEvent::SelectExam { .. } => "selectExam",
            NavEvent::BackToList => "backToList",
            NavEvent::BackToDetail => "backToDetail",
            NavEvent::CreateExam => "createExam",
            NavEvent::EditExam { .. } => "editExam",
            NavEvent::CreateQuestion { .. } => "createQuestion",
            NavEvent::EditQuestion { .. } => "editQuestion",
            NavEvent::ExamSaved => "examSaved",
            NavEvent::QuestionSaved => "questionSaved",
        }
    }
}

/// Navigation state: the active view plus the selection it operates on.
/// Transitions never touch storage; data loading happens after a transition
/// is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Router {
    pub view: View,
    pub exam_id: Option<String>,
    pub question: Option<Question>,
    pub mode: DetailMode,
}

impl Router {
    pub fn new() -> Self {
        Router {
            view: View::List,
            exam_id: None,
            question: None,
            mode: DetailMode::View,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// An event fired from a view it is not defined for. Surfacing this instead
/// of ignoring it keeps selection state from going inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavError {
    pub from: View,
    pub event: &'static str,
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event {} is not defined in view {}", self.event, self.from)
    }
}

impl std::error::Error for NavError {}

/// Pure transition function. Returns the successor state without mutating
/// the current one.
pub fn transition(router: &Router, event: NavEvent) -> Result<Router, NavError> {
    let undefined = NavError {
        from: router.view,
        event: event.name(),
    };

    match (router.view, event) {
        (View::List, NavEvent::SelectExam { exam_id, mode }) => Ok(Router {
            view: View::Detail,
            exam_id: Some(exam_id),
            question: router.question.clone(),
            mode,
        }),
        (View::Detail | View::ExamForm, NavEvent::BackToList) => Ok(Router {
            view: View::List,
            exam_id: None,
            question: None,
            mode: router.mode,
        }),
        (View::QuestionForm, NavEvent::BackToDetail) => Ok(Router {
            view: View::Detail,
            exam_id: router.exam_id.clone(),
            question: None,
            mode: router.mode,
        }),
        (View::List, NavEvent::CreateExam) => Ok(Router {
            view: View::ExamForm,
            exam_id: None,
            question: router.question.clone(),
            mode: router.mode,
        }),
        (View::Detail, NavEvent::EditExam { exam_id }) => Ok(Router {
            view: View::ExamForm,
            exam_id: Some(exam_id),
            question: router.question.clone(),
            mode: router.mode,
        }),
        (View::Detail, NavEvent::CreateQuestion { exam_id }) => Ok(Router {
            view: View::QuestionForm,
            exam_id: Some(exam_id),
            question: None,
            mode: router.mode,
        }),
        (View::Detail, NavEvent::EditQuestion { exam_id, question }) => Ok(Router {
            view: View::QuestionForm,
            exam_id: Some(exam_id),
            question: Some(question),
            mode: router.mode,
        }),
        (View::ExamForm, NavEvent::ExamSaved) => Ok(Router {
            view: View::List,
            exam_id: None,
            question: router.question.clone(),
            mode: router.mode,
        }),
        (View::QuestionForm, NavEvent::QuestionSaved) => Ok(Router {
            view: View::Detail,
            exam_id: router.exam_id.clone(),
            question: None,
            mode: router.mode,
        }),
        _ => Err(undefined),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(id: &str) -> Question {
        Question {
            id: id.to_string(),
            ..Question::default()
        }
    }

    #[test]
    fn test_initial_state() {
        let router = Router::new();
        assert_eq!(router.view, View::List);
        assert!(router.exam_id.is_none());
        assert!(router.question.is_none());
        assert_eq!(router.mode, DetailMode::View);
    }

    #[test]
    fn test_select_exam_sets_id_and_mode() {
        let router = Router::new();
        let next = transition(
            &router,
            NavEvent::SelectExam {
                exam_id: "e1".to_string(),
                mode: DetailMode::Edit,
            },
        )
        .unwrap();
        assert_eq!(next.view, View::Detail);
        assert_eq!(next.exam_id.as_deref(), Some("e1"));
        assert_eq!(next.mode, DetailMode::Edit);
    }

    #[test]
    fn test_back_to_list_clears_selection() {
        let router = Router {
            view: View::Detail,
            exam_id: Some("e1".to_string()),
            question: Some(q("q1")),
            mode: DetailMode::Edit,
        };
        let next = transition(&router, NavEvent::BackToList).unwrap();
        assert_eq!(next.view, View::List);
        assert!(next.exam_id.is_none());
        assert!(next.question.is_none());
    }

    #[test]
    fn test_back_to_detail_keeps_exam_id() {
        let router = Router {
            view: View::QuestionForm,
            exam_id: Some("e1".to_string()),
            question: Some(q("q1")),
            mode: DetailMode::Edit,
        };
        let next = transition(&router, NavEvent::BackToDetail).unwrap();
        assert_eq!(next.view, View::Detail);
        assert_eq!(next.exam_id.as_deref(), Some("e1"));
        assert!(next.question.is_none());
    }

    #[test]
    fn test_create_exam_clears_exam_id() {
        let router = Router::new();
        let next = transition(&router, NavEvent::CreateExam).unwrap();
        assert_eq!(next.view, View::ExamForm);
        assert!(next.exam_id.is_none());
    }

    #[test]
    fn test_edit_exam_from_detail() {
        let router = Router {
            view: View::Detail,
            exam_id: Some("e1".to_string()),
            question: None,
            mode: DetailMode::Edit,
        };
        let next = transition(
            &router,
            NavEvent::EditExam {
                exam_id: "e1".to_string(),
            },
        )
        .unwrap();
        assert_eq!(next.view, View::ExamForm);
        assert_eq!(next.exam_id.as_deref(), Some("e1"));
    }

    #[test]
    fn test_create_question_clears_question() {
        let router = Router {
            view: View::Detail,
            exam_id: Some("e1".to_string()),
            question: Some(q("stale")),
            mode: DetailMode::Edit,
        };
        let next = transition(
            &router,
            NavEvent::CreateQuestion {
                exam_id: "e1".to_string(),
            },
        )
        .unwrap();
        assert_eq!(next.view, View::QuestionForm);
        assert_eq!(next.exam_id.as_deref(), Some("e1"));
        assert!(next.question.is_none());
    }

    #[test]
    fn test_edit_question_sets_both() {
        let router = Router {
            view: View::Detail,
            exam_id: Some("e1".to_string()),
            question: None,
            mode: DetailMode::Edit,
        };
        let next = transition(
            &router,
            NavEvent::EditQuestion {
                exam_id: "e1".to_string(),
                question: q("q1"),
            },
        )
        .unwrap();
        assert_eq!(next.view, View::QuestionForm);
        assert_eq!(next.exam_id.as_deref(), Some("e1"));
        assert_eq!(next.question.as_ref().unwrap().id, "q1");
    }

    #[test]
    fn test_exam_saved_returns_to_list() {
        let router = Router {
            view: View::ExamForm,
            exam_id: Some("e1".to_string()),
            question: None,
            mode: DetailMode::Edit,
        };
        let next = transition(&router, NavEvent::ExamSaved).unwrap();
        assert_eq!(next.view, View::List);
        assert!(next.exam_id.is_none());
    }

    #[test]
    fn test_question_saved_returns_to_detail() {
        let router = Router {
            view: View::QuestionForm,
            exam_id: Some("e1".to_string()),
            question: Some(q("q1")),
            mode: DetailMode::Edit,
        };
        let next = transition(&router, NavEvent::QuestionSaved).unwrap();
        assert_eq!(next.view, View::Detail);
        assert_eq!(next.exam_id.as_deref(), Some("e1"));
        assert!(next.question.is_none());
    }

    #[test]
    fn test_edit_question_from_list_is_undefined() {
        let router = Router::new();
        let err = transition(
            &router,
            NavEvent::EditQuestion {
                exam_id: "e1".to_string(),
                question: q("q1"),
            },
        )
        .unwrap_err();
        assert_eq!(err.from, View::List);
        assert_eq!(err.event, "editQuestion");
    }

    #[test]
    fn test_other_undefined_transitions() {
        let list = Router::new();
        assert!(transition(&list, NavEvent::BackToDetail).is_err());
        assert!(transition(&list, NavEvent::ExamSaved).is_err());

        let detail = Router {
            view: View::Detail,
            exam_id: Some("e1".to_string()),
            question: None,
            mode: DetailMode::View,
        };
        assert!(transition(&detail, NavEvent::CreateExam).is_err());
        assert!(
            transition(
                &detail,
                NavEvent::SelectExam {
                    exam_id: "e2".to_string(),
                    mode: DetailMode::View,
                },
            )
            .is_err()
        );

        let form = Router {
            view: View::QuestionForm,
            exam_id: Some("e1".to_string()),
            question: None,
            mode: DetailMode::Edit,
        };
        assert!(transition(&form, NavEvent::BackToList).is_err());
    }

    #[test]
    fn test_transition_does_not_mutate_input() {
        let router = Router::new();
        let _ = transition(&router, NavEvent::CreateExam).unwrap();
        assert_eq!(router.view, View::List);
    }
}
