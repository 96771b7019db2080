use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;

use super::{Result, generate_id, merge_fields};
use crate::models::Exam;

/// All exams in insertion order. Empty when none exist.
pub fn list_exams(conn: &Connection) -> Result<Vec<Exam>> {
    let mut stmt = conn.prepare("SELECT id, body FROM exams ORDER BY rowid")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut exams = Vec::new();
    for row in rows {
        let (id, body) = row?;
        let mut exam: Exam = serde_json::from_str(&body)?;
        exam.id = id;
        exams.push(exam);
    }

    Ok(exams)
}

pub fn get_exam(conn: &Connection, id: &str) -> Result<Option<Exam>> {
    let body: Option<String> = conn
        .query_row("SELECT body FROM exams WHERE id = ?", [id], |row| {
            row.get(0)
        })
        .optional()?;

    match body {
        Some(body) => {
            let mut exam: Exam = serde_json::from_str(&body)?;
            exam.id = id.to_string();
            Ok(Some(exam))
        }
        None => Ok(None),
    }
}

/// Generates and returns the new exam's id.
pub fn create_exam(conn: &Connection, exam: &Exam) -> Result<String> {
    let id = generate_id();
    let body = serde_json::to_string(exam)?;
    conn.execute(
        "INSERT INTO exams (id, body) VALUES (?, ?)",
        params![id, body],
    )?;
    Ok(id)
}

/// Merges the given fields into the stored document. Success no-op when the
/// id does not exist; an absent record is not created.
pub fn update_exam(conn: &Connection, id: &str, fields: &Value) -> Result<()> {
    let body: Option<String> = conn
        .query_row("SELECT body FROM exams WHERE id = ?", [id], |row| {
            row.get(0)
        })
        .optional()?;

    let Some(body) = body else {
        return Ok(());
    };

    let mut doc: Value = serde_json::from_str(&body)?;
    merge_fields(&mut doc, fields);
    conn.execute(
        "UPDATE exams SET body = ? WHERE id = ?",
        params![serde_json::to_string(&doc)?, id],
    )?;

    Ok(())
}

/// Unconditional delete; the exam's questions go with it. No error when the
/// id is already absent.
pub fn delete_exam(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM questions WHERE exam_id = ?", [id])?;
    conn.execute("DELETE FROM exams WHERE id = ?", [id])?;
    Ok(())
}
