use chrono::Utc;

use super::ValidationError;
use crate::models::{AnswerRef, Question, QuestionType};

pub const MIN_ALTERNATIVES: usize = 2;
pub const MAX_ALTERNATIVES: usize = 10;

/// Blank slots offered when composing a question from scratch.
const DEFAULT_ALTERNATIVE_SLOTS: usize = 4;

/// Editable form model for a question. Loading normalizes both record
/// generations into this shape; saving always emits the canonical shape.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionForm {
    pub text: String,
    pub kind: QuestionType,
    /// Raw input buffer; parsed to an integer (or null) on save.
    pub points: String,
    pub alternatives: Vec<String>,
    pub correct_answer: Option<usize>,
    pub explanation: String,
    pub associated_text: String,
    pub category: String,
    pub created_by: String,
}

impl Default for QuestionForm {
    fn default() -> Self {
        QuestionForm {
            text: String::new(),
            kind: QuestionType::MultipleChoice,
            points: String::new(),
            alternatives: vec![String::new(); DEFAULT_ALTERNATIVE_SLOTS],
            correct_answer: None,
            explanation: String::new(),
            associated_text: String::new(),
            category: String::new(),
            created_by: String::new(),
        }
    }
}

impl QuestionForm {
    /// Load direction: persisted record (either generation) to form model.
    pub fn from_record(record: &Question) -> Self {
        let alternatives = if let Some(options) = &record.options {
            // Sorted key order is the explicit replacement for the legacy
            // map's insertion order ("a", "b", ... sort the same way).
            options.values().cloned().collect()
        } else if let Some(alts) = &record.alternatives {
            alts.clone()
        } else {
            vec![String::new(); DEFAULT_ALTERNATIVE_SLOTS]
        };

        let correct_answer = record.correct_answer.as_ref().and_then(AnswerRef::index);

        QuestionForm {
            text: record.display_text().to_string(),
            kind: record.kind,
            points: record.points.map(|p| p.to_string()).unwrap_or_default(),
            alternatives,
            correct_answer,
            explanation: record
                .explanation
                .clone()
                .or_else(|| record.comment.clone())
                .unwrap_or_default(),
            associated_text: record.associated_text.clone(),
            category: record.category.clone(),
            created_by: record.created_by.clone(),
        }
    }

    /// Checks run before any write; a failure blocks submission.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError("Question text is required".to_string()));
        }

        if self.kind == QuestionType::MultipleChoice {
            let filled = self
                .alternatives
                .iter()
                .filter(|alt| !alt.trim().is_empty())
                .count();
            if filled < MIN_ALTERNATIVES {
                return Err(ValidationError(
                    "Multiple choice questions need at least 2 alternatives".to_string(),
                ));
            }
            if self.correct_answer.is_none() {
                return Err(ValidationError(
                    "A correct answer must be selected".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Save direction: form model to the canonical persisted shape.
    /// `original` supplies the id and creation timestamp when editing.
    pub fn to_record(&self, original: Option<&Question>) -> Question {
        let now = Utc::now().timestamp_millis();

        let mut record = Question {
            id: original.map(|q| q.id.clone()).unwrap_or_default(),
            text: Some(self.text.clone()),
            question: None,
            kind: self.kind,
            points: self.points.trim().parse::<i64>().ok(),
            alternatives: None,
            options: None,
            correct_answer: None,
            comment: Some(self.explanation.clone()),
            explanation: None,
            associated_text: self.associated_text.clone(),
            category: self.category.clone(),
            created_by: self.created_by.clone(),
            created_at: original.and_then(|q| q.created_at).or(Some(now)),
            updated_at: Some(now),
        };

        // Only multiple choice carries the alternatives sequence; blanks are
        // kept so slot positions survive a round trip.
        if self.kind == QuestionType::MultipleChoice {
            record.alternatives = Some(self.alternatives.clone());
            record.correct_answer = self.correct_answer.map(AnswerRef::Index);
        }

        record
    }

    /// Appends a blank alternative; no-op at the cap.
    pub fn add_alternative(&mut self) {
        if self.alternatives.len() < MAX_ALTERNATIVES {
            self.alternatives.push(String::new());
        }
    }

    /// Removes the alternative at `index` and re-indexes the correct-answer
    /// reference. No-op at the floor or for an out-of-range index.
    pub fn remove_alternative(&mut self, index: usize) {
        if self.alternatives.len() <= MIN_ALTERNATIVES || index >= self.alternatives.len() {
            return;
        }
        self.alternatives.remove(index);
        self.correct_answer = match self.correct_answer {
            Some(c) if c == index => None,
            Some(c) if c > index => Some(c - 1),
            other => other,
        };
    }
}
