use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Exam record as persisted in the `exams` table. The document keys match
/// the historical records, so renames here would orphan existing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Exam {
    /// Row key, never part of the document body.
    #[serde(skip)]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ExamKind,
    /// Category label. Historical records store it under `duration`; the key
    /// is kept so old and new documents stay interchangeable.
    pub duration: Option<String>,
    pub total_points: Option<i64>,
    pub instructions: String,
    /// RFC 3339 timestamps.
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamKind {
    #[serde(rename = "concurso")]
    Concurso,
    #[serde(rename = "simulado")]
    Simulado,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl ExamKind {
    pub fn label(self) -> &'static str {
        match self {
            ExamKind::Concurso => "Concurso",
            ExamKind::Simulado => "Simulado",
            ExamKind::Unset => "-",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            ExamKind::Unset => ExamKind::Concurso,
            ExamKind::Concurso => ExamKind::Simulado,
            ExamKind::Simulado => ExamKind::Unset,
        }
    }
}

/// Question record as persisted in the `questions` table.
///
/// Two generations of documents exist: the canonical shape (`text`,
/// `alternatives`, integer `correctAnswer`, `comment`) and a legacy shape
/// (`question`, an `options` map keyed by letter, a lettered `correctAnswer`,
/// `explanation`). Both deserialize into this struct; only the canonical
/// fields are ever written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Question {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Legacy key for the question text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<String>>,
    /// Legacy letter-keyed alternatives. The BTreeMap keeps key order
    /// deterministic when converting to a sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<AnswerRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Legacy key for the comment text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub associated_text: String,
    pub category: String,
    pub created_by: String,
    /// Epoch milliseconds.
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Question {
    /// Question text regardless of which generation the record is.
    pub fn display_text(&self) -> &str {
        self.question
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    TrueFalse,
    Essay,
    ShortAnswer,
}

impl QuestionType {
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "Multiple Choice",
            QuestionType::TrueFalse => "True/False",
            QuestionType::Essay => "Essay",
            QuestionType::ShortAnswer => "Short Answer",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            QuestionType::MultipleChoice => QuestionType::TrueFalse,
            QuestionType::TrueFalse => QuestionType::Essay,
            QuestionType::Essay => QuestionType::ShortAnswer,
            QuestionType::ShortAnswer => QuestionType::MultipleChoice,
        }
    }
}

/// Correct-answer reference: a 0-based index in canonical records, a letter
/// key in legacy ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerRef {
    Index(usize),
    Letter(String),
}

impl AnswerRef {
    /// Zero-based alternatives index. Legacy letters translate by alphabet
    /// position; anything that is not a lowercase ASCII letter cannot index
    /// the sequence and yields None.
    pub fn index(&self) -> Option<usize> {
        match self {
            AnswerRef::Index(i) => Some(*i),
            AnswerRef::Letter(letter) => {
                let c = letter.chars().next()?;
                c.is_ascii_lowercase().then(|| (c as u8 - b'a') as usize)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exam_document_keys() {
        let exam = Exam {
            title: "Math Quiz".to_string(),
            kind: ExamKind::Simulado,
            duration: Some("Algebra".to_string()),
            total_points: Some(100),
            ..Exam::default()
        };
        let doc = serde_json::to_value(&exam).unwrap();
        assert_eq!(doc["title"], "Math Quiz");
        assert_eq!(doc["type"], "simulado");
        assert_eq!(doc["duration"], "Algebra");
        assert_eq!(doc["totalPoints"], 100);
        assert!(doc.get("id").is_none());
    }

    #[test]
    fn test_exam_kind_round_trip() {
        for kind in [ExamKind::Concurso, ExamKind::Simulado, ExamKind::Unset] {
            let json = serde_json::to_string(&kind).unwrap();
            let back: ExamKind = serde_json::from_str(&json).unwrap();
            assert_eq!(kind, back);
        }
        assert_eq!(serde_json::to_string(&ExamKind::Unset).unwrap(), "\"\"");
    }

    #[test]
    fn test_question_type_defaults_to_multiple_choice() {
        let q: Question = serde_json::from_str("{}").unwrap();
        assert_eq!(q.kind, QuestionType::MultipleChoice);
    }

    #[test]
    fn test_legacy_question_deserializes() {
        let raw = r#"{
            "question": "Capital of France?",
            "options": {"a": "Paris", "b": "London"},
            "correctAnswer": "a",
            "explanation": "Geography."
        }"#;
        let q: Question = serde_json::from_str(raw).unwrap();
        assert_eq!(q.question.as_deref(), Some("Capital of France?"));
        assert_eq!(q.options.as_ref().unwrap().len(), 2);
        assert_eq!(q.correct_answer, Some(AnswerRef::Letter("a".to_string())));
        assert_eq!(q.display_text(), "Capital of France?");
    }

    #[test]
    fn test_canonical_question_deserializes() {
        let raw = r#"{
            "text": "2 + 2?",
            "type": "multiple_choice",
            "alternatives": ["3", "4"],
            "correctAnswer": 1,
            "comment": "Basic arithmetic."
        }"#;
        let q: Question = serde_json::from_str(raw).unwrap();
        assert_eq!(q.correct_answer, Some(AnswerRef::Index(1)));
        assert_eq!(q.display_text(), "2 + 2?");
    }

    #[test]
    fn test_answer_ref_index() {
        assert_eq!(AnswerRef::Index(3).index(), Some(3));
        assert_eq!(AnswerRef::Letter("c".to_string()).index(), Some(2));
        assert_eq!(AnswerRef::Letter("A".to_string()).index(), None);
        assert_eq!(AnswerRef::Letter(String::new()).index(), None);
    }

    #[test]
    fn test_legacy_fields_not_serialized_when_absent() {
        let q = Question {
            text: Some("Q".to_string()),
            ..Question::default()
        };
        let doc = serde_json::to_value(&q).unwrap();
        assert!(doc.get("question").is_none());
        assert!(doc.get("options").is_none());
        assert!(doc.get("explanation").is_none());
        // Nullable canonical fields stay present.
        assert!(doc.get("points").is_some());
    }
}
