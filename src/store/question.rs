use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;

use super::{Result, generate_id, merge_fields};
use crate::models::Question;

/// All questions of one exam in insertion order. Empty when none exist.
pub fn list_questions(conn: &Connection, exam_id: &str) -> Result<Vec<Question>> {
    let mut stmt =
        conn.prepare("SELECT id, body FROM questions WHERE exam_id = ? ORDER BY rowid")?;
    let rows = stmt.query_map([exam_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut questions = Vec::new();
    for row in rows {
        let (id, body) = row?;
        let mut question: Question = serde_json::from_str(&body)?;
        question.id = id;
        questions.push(question);
    }

    Ok(questions)
}

pub fn question_count(conn: &Connection, exam_id: &str) -> Result<usize> {
    let count: usize = conn.query_row(
        "SELECT COUNT(*) FROM questions WHERE exam_id = ?",
        [exam_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Generates and returns the new question's id.
pub fn create_question(conn: &Connection, exam_id: &str, question: &Question) -> Result<String> {
    let id = generate_id();
    let body = serde_json::to_string(question)?;
    conn.execute(
        "INSERT INTO questions (id, exam_id, body) VALUES (?, ?, ?)",
        params![id, exam_id, body],
    )?;
    Ok(id)
}

/// Merges the given fields into the stored document. Success no-op when the
/// question does not exist under this exam.
pub fn update_question(conn: &Connection, exam_id: &str, id: &str, fields: &Value) -> Result<()> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM questions WHERE id = ? AND exam_id = ?",
            params![id, exam_id],
            |row| row.get(0),
        )
        .optional()?;

    let Some(body) = body else {
        return Ok(());
    };

    let mut doc: Value = serde_json::from_str(&body)?;
    merge_fields(&mut doc, fields);
    conn.execute(
        "UPDATE questions SET body = ? WHERE id = ? AND exam_id = ?",
        params![serde_json::to_string(&doc)?, id, exam_id],
    )?;

    Ok(())
}

/// Unconditional delete; no error when already absent.
pub fn delete_question(conn: &Connection, exam_id: &str, id: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM questions WHERE id = ? AND exam_id = ?",
        params![id, exam_id],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerRef, QuestionType};
    use crate::store::run_migrations;
    use serde_json::json;

    fn test_conn() -> (tempfile::TempDir, Connection) {
        let temp_dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(temp_dir.path().join("test.db")).unwrap();
        run_migrations(&conn).unwrap();
        (temp_dir, conn)
    }

    fn sample_question(text: &str) -> Question {
        Question {
            text: Some(text.to_string()),
            kind: QuestionType::MultipleChoice,
            alternatives: Some(vec!["yes".to_string(), "no".to_string()]),
            correct_answer: Some(AnswerRef::Index(0)),
            comment: Some(String::new()),
            created_at: Some(1_700_000_000_000),
            updated_at: Some(1_700_000_000_000),
            ..Question::default()
        }
    }

    #[test]
    fn test_create_list_and_count_scoped_by_exam() {
        let (_dir, conn) = test_conn();

        create_question(&conn, "e1", &sample_question("Q1")).unwrap();
        create_question(&conn, "e1", &sample_question("Q2")).unwrap();
        create_question(&conn, "e2", &sample_question("other")).unwrap();

        let questions = list_questions(&conn, "e1").unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].display_text(), "Q1");
        assert_eq!(questions[1].display_text(), "Q2");

        assert_eq!(question_count(&conn, "e1").unwrap(), 2);
        assert_eq!(question_count(&conn, "e2").unwrap(), 1);
        assert_eq!(question_count(&conn, "e3").unwrap(), 0);
    }

    #[test]
    fn test_update_merges_fields() {
        let (_dir, conn) = test_conn();
        let id = create_question(&conn, "e1", &sample_question("Before")).unwrap();

        update_question(&conn, "e1", &id, &json!({"text": "After", "points": 5})).unwrap();

        let questions = list_questions(&conn, "e1").unwrap();
        assert_eq!(questions[0].display_text(), "After");
        assert_eq!(questions[0].points, Some(5));
        assert_eq!(questions[0].correct_answer, Some(AnswerRef::Index(0)));
    }

    #[test]
    fn test_update_wrong_exam_is_noop() {
        let (_dir, conn) = test_conn();
        let id = create_question(&conn, "e1", &sample_question("Mine")).unwrap();

        update_question(&conn, "e2", &id, &json!({"text": "Stolen"})).unwrap();

        let questions = list_questions(&conn, "e1").unwrap();
        assert_eq!(questions[0].display_text(), "Mine");
    }

    #[test]
    fn test_delete_scoped_and_idempotent() {
        let (_dir, conn) = test_conn();
        let id = create_question(&conn, "e1", &sample_question("Q")).unwrap();

        // Wrong exam id: nothing happens.
        delete_question(&conn, "e2", &id).unwrap();
        assert_eq!(question_count(&conn, "e1").unwrap(), 1);

        delete_question(&conn, "e1", &id).unwrap();
        assert_eq!(question_count(&conn, "e1").unwrap(), 0);

        delete_question(&conn, "e1", &id).unwrap();
    }

    #[test]
    fn test_legacy_document_loads() {
        let (_dir, conn) = test_conn();
        conn.execute(
            "INSERT INTO questions (id, exam_id, body) VALUES (?, ?, ?)",
            params![
                "legacy1",
                "e1",
                r#"{"question":"Pick one","options":{"a":"first","b":"second"},"correctAnswer":"b","explanation":"old style"}"#
            ],
        )
        .unwrap();

        let questions = list_questions(&conn, "e1").unwrap();
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.id, "legacy1");
        assert_eq!(q.display_text(), "Pick one");
        assert_eq!(q.correct_answer, Some(AnswerRef::Letter("b".to_string())));
        assert_eq!(q.options.as_ref().unwrap()["a"], "first");
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let (_dir, conn) = test_conn();
        conn.execute(
            "INSERT INTO questions (id, exam_id, body) VALUES (?, ?, ?)",
            params!["bad", "e1", "not json"],
        )
        .unwrap();

        assert!(list_questions(&conn, "e1").is_err());
    }
}
