use rand::Rng;
use rand::distributions::Alphanumeric;
use rusqlite::Connection;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

pub mod exam;
pub mod question;

const ID_LEN: usize = 20;

/// Any failure surfaced by the persistence gateway. Never retried
/// automatically; call sites show the message and offer a manual retry.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Codec(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "database error: {}", e),
            StoreError::Codec(e) => write!(f, "record error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlite(e) => Some(e),
            StoreError::Codec(e) => Some(e),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Codec(e)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

fn get_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\exam-manager")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/exam-manager")
    }
}

pub fn get_db_path() -> PathBuf {
    get_data_dir().join("exams.db")
}

pub fn init_db() -> Result<Connection> {
    let db_path = get_db_path();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let conn = Connection::open(&db_path)?;

    run_migrations(&conn)?;

    Ok(conn)
}

/// Records are JSON documents keyed by a generated string id, mirroring the
/// document store the data originally lived in. Questions keep their owning
/// exam id as a column so they can be listed per exam.
pub(crate) fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS exams (
            id TEXT PRIMARY KEY,
            body TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS questions (
            id TEXT PRIMARY KEY,
            exam_id TEXT NOT NULL,
            body TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_questions_exam ON questions(exam_id)",
        [],
    )?;

    Ok(())
}

pub(crate) fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

/// Shallow field merge, matching partial-update semantics of the original
/// store: top-level keys of `fields` replace those of `doc`.
pub(crate) fn merge_fields(doc: &mut Value, fields: &Value) {
    if let (Value::Object(doc), Value::Object(fields)) = (doc, fields) {
        for (key, value) in fields {
            doc.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_migrations_create_tables() {
        let temp_dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(temp_dir.path().join("test.db")).unwrap();
        run_migrations(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"exams".to_string()));
        assert!(tables.contains(&"questions".to_string()));
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(temp_dir.path().join("test.db")).unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
    }

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn test_merge_fields_replaces_and_keeps() {
        let mut doc = json!({"title": "Old", "points": 10, "keep": true});
        merge_fields(&mut doc, &json!({"title": "New", "extra": "x"}));
        assert_eq!(doc["title"], "New");
        assert_eq!(doc["points"], 10);
        assert_eq!(doc["keep"], true);
        assert_eq!(doc["extra"], "x");
    }

    #[test]
    fn test_merge_fields_ignores_non_objects() {
        let mut doc = json!({"title": "Old"});
        merge_fields(&mut doc, &json!("not an object"));
        assert_eq!(doc["title"], "Old");
    }
}
