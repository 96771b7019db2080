use chrono::Utc;

use super::ValidationError;
use crate::models::{Exam, ExamKind};

/// Editable form model for an exam.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExamForm {
    pub title: String,
    pub description: String,
    pub kind: ExamKind,
    /// Category label; persisted under the historical `duration` key.
    pub duration: String,
    /// Raw input buffer; parsed to an integer (or null) on save.
    pub total_points: String,
    pub instructions: String,
}

impl ExamForm {
    pub fn from_record(record: &Exam) -> Self {
        ExamForm {
            title: record.title.clone(),
            description: record.description.clone(),
            kind: record.kind,
            duration: record.duration.clone().unwrap_or_default(),
            total_points: record
                .total_points
                .map(|p| p.to_string())
                .unwrap_or_default(),
            instructions: record.instructions.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError("Exam title is required".to_string()));
        }
        Ok(())
    }

    /// `original` supplies the id and creation timestamp when editing.
    pub fn to_record(&self, original: Option<&Exam>) -> Exam {
        let now = Utc::now().to_rfc3339();
        let duration = self.duration.trim();

        Exam {
            id: original.map(|e| e.id.clone()).unwrap_or_default(),
            title: self.title.clone(),
            description: self.description.clone(),
            kind: self.kind,
            duration: (!duration.is_empty()).then(|| duration.to_string()),
            total_points: self.total_points.trim().parse::<i64>().ok(),
            instructions: self.instructions.clone(),
            created_at: original
                .and_then(|e| e.created_at.clone())
                .or_else(|| Some(now.clone())),
            updated_at: Some(now),
        }
    }
}
