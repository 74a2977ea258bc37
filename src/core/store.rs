use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

/// A persisted task record. The store is the only component with write
/// authority over these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Todo {
    pub id: i64,
    pub todo: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("todo text must not be empty")]
    EmptyText,
    #[error("no todo with id {0}")]
    NotFound(i64),
    #[error("sqlite failure: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("unreadable timestamp on todo {0}")]
    Timestamp(i64),
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos in id order.
    async fn get_all(&self) -> Result<Vec<Todo>, StoreError>;

    /// Inserts a todo and returns it with its assigned id and timestamps.
    async fn create(&self, text: &str) -> Result<Todo, StoreError>;

    /// Deleting an absent id fails with `StoreError::NotFound`; it is never a
    /// silent no-op.
    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;

    async fn delete_all(&self) -> Result<(), StoreError>;

    /// Case-insensitive substring match, id order.
    async fn search_by_text(&self, needle: &str) -> Result<Vec<Todo>, StoreError>;
}

pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(db: Connection) -> Result<Self, StoreError> {
        db.execute(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                todo TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }
}

fn row_to_todo(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_todo(raw: (i64, String, String, String)) -> Result<Todo, StoreError> {
    let (id, todo, created_at, updated_at) = raw;
    let created_at = created_at.parse().map_err(|_| StoreError::Timestamp(id))?;
    let updated_at = updated_at.parse().map_err(|_| StoreError::Timestamp(id))?;
    Ok(Todo {
        id,
        todo,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn get_all(&self) -> Result<Vec<Todo>, StoreError> {
        let db = self.db.lock().await;
        let mut stmt =
            db.prepare("SELECT id, todo, created_at, updated_at FROM todos ORDER BY id")?;
        let rows = stmt
            .query_map([], row_to_todo)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(into_todo).collect()
    }

    async fn create(&self, text: &str) -> Result<Todo, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyText);
        }
        let now = Utc::now();
        let db = self.db.lock().await;
        db.execute(
            "INSERT INTO todos (todo, created_at, updated_at) VALUES (?1, ?2, ?2)",
            rusqlite::params![text, now.to_rfc3339()],
        )?;
        Ok(Todo {
            id: db.last_insert_rowid(),
            todo: text.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let db = self.db.lock().await;
        let deleted = db.execute("DELETE FROM todos WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let db = self.db.lock().await;
        db.execute("DELETE FROM todos", [])?;
        Ok(())
    }

    async fn search_by_text(&self, needle: &str) -> Result<Vec<Todo>, StoreError> {
        let db = self.db.lock().await;
        // instr on lowered text keeps the match case-insensitive without
        // LIKE's wildcard semantics leaking into user input.
        let mut stmt = db.prepare(
            "SELECT id, todo, created_at, updated_at FROM todos
             WHERE instr(lower(todo), lower(?1)) > 0 ORDER BY id",
        )?;
        let rows = stmt
            .query_map([needle], row_to_todo)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(into_todo).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_monotonic_ids_and_timestamps() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store.create("buy milk").await.unwrap();
        let second = store.create("call mom").await.unwrap();
        assert!(second.id > first.id);
        assert_eq!(first.created_at, first.updated_at);

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].todo, "buy milk");
        assert_eq!(all[1].todo, "call mom");
    }

    #[tokio::test]
    async fn create_rejects_empty_text() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(
            store.create("   ").await,
            Err(StoreError::EmptyText)
        ));
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create("Buy Milk").await.unwrap();
        store.create("buy bread").await.unwrap();
        store.create("call mom").await.unwrap();

        let hits = store.search_by_text("BUY").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].todo, "Buy Milk");

        let hits = store.search_by_text("milk").await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn search_treats_percent_literally() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create("finish 100% of report").await.unwrap();
        store.create("buy milk").await.unwrap();

        let hits = store.search_by_text("100%").await.unwrap();
        assert_eq!(hits.len(), 1);
        let hits = store.search_by_text("%").await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn delete_by_id_fails_on_absent_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(
            store.delete_by_id(7).await,
            Err(StoreError::NotFound(7))
        ));

        let todo = store.create("buy milk").await.unwrap();
        store.delete_by_id(todo.id).await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_all_empties_the_table() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create("a").await.unwrap();
        store.create("b").await.unwrap();
        store.delete_all().await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn todos_survive_reopening_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");

        let store = SqliteStore::open(&path).unwrap();
        let created = store.create("buy milk").await.unwrap();
        drop(store);

        let store = SqliteStore::open(&path).unwrap();
        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, created.id);
        assert_eq!(all[0].todo, "buy milk");
    }

    #[test]
    fn todo_serializes_to_the_wire_shape() {
        let todo = Todo {
            id: 3,
            todo: "buy milk".to_string(),
            created_at: "2026-01-02T03:04:05Z".parse().unwrap(),
            updated_at: "2026-01-02T03:04:05Z".parse().unwrap(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["todo"], "buy milk");
        assert!(json["createdAt"].as_str().unwrap().starts_with("2026-01-02T"));
        assert!(json["updatedAt"].is_string());
    }
}
