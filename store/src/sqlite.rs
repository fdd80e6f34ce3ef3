//! SQLite backend.
//!
//! The table uses `INTEGER PRIMARY KEY AUTOINCREMENT`, which makes SQLite
//! enforce the id-never-reused invariant across deletes. The schema is
//! applied idempotently on open; there are no migrations.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use crate::{StoreError, TodoItem, TodoStore};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS todo_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    is_complete INTEGER NOT NULL DEFAULT 0
)";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<TodoItem> {
    Ok(TodoItem {
        id: row.get(0)?,
        name: row.get(1)?,
        is_complete: row.get(2)?,
    })
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT id, name, is_complete FROM todo_items")?;
        let items = stmt
            .query_map([], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    async fn get(&self, id: i64) -> Result<Option<TodoItem>, StoreError> {
        let conn = self.conn.lock().await;
        let item = conn
            .query_row(
                "SELECT id, name, is_complete FROM todo_items WHERE id = ?1",
                params![id],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    async fn insert(&self, mut item: TodoItem) -> Result<TodoItem, StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO todo_items (name, is_complete) VALUES (?1, ?2)",
            params![item.name, item.is_complete],
        )?;
        item.id = conn.last_insert_rowid();
        Ok(item)
    }

    async fn update(&self, item: &TodoItem) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE todo_items SET name = ?1, is_complete = ?2 WHERE id = ?3",
            params![item.name, item.is_complete, item.id],
        )?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM todo_items WHERE id = ?1", params![id])?;
        Ok(())
    }

    async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock().await;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM todo_items WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
