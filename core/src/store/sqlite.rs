//! SQLite-backed `TodoStore`.
//!
//! # Invariants
//! - `seq` is assigned on insert and never rewritten, so `ORDER BY seq` is
//!   creation order even after whole-record updates.
//! - All access goes through one `Mutex<Connection>`; statements never
//!   interleave.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};
use uuid::Uuid;

use super::TodoStore;
use crate::error::{StoreError, StoreResult};
use crate::types::Todo;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS todos (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0
);";

const TODO_SELECT_SQL: &str = "SELECT id, title, completed FROM todos";

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Backend(value.to_string())
    }
}

#[derive(Debug)]
pub struct SqliteTodoStore {
    conn: Mutex<Connection>,
}

impl SqliteTodoStore {
    /// Open (or create) a database file and bootstrap the schema.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening sqlite todo store");
        Self::bootstrap(Connection::open(path)?)
    }

    /// A private database that lives as long as the store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("sqlite connection lock poisoned".to_string()))
    }

    fn find(conn: &Connection, id: Uuid) -> StoreResult<Option<Todo>> {
        let todo = conn
            .query_row(
                &format!("{TODO_SELECT_SQL} WHERE id = ?1"),
                params![id.to_string()],
                todo_from_row,
            )
            .optional()?;
        todo.transpose()
    }
}

/// Map a row to a `Todo`; an unparseable id is reported, not masked.
fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<StoreResult<Todo>> {
    let id: String = row.get(0)?;
    let title: String = row.get(1)?;
    let completed: bool = row.get(2)?;
    Ok(Uuid::parse_str(&id)
        .map(|id| Todo {
            id,
            title,
            completed,
        })
        .map_err(|e| StoreError::Backend(format!("invalid stored id {id:?}: {e}"))))
}

impl TodoStore for SqliteTodoStore {
    fn create_todo(&self, title: &str) -> StoreResult<Todo> {
        let todo = Todo::new(title);
        self.conn()?.execute(
            "INSERT INTO todos (id, title, completed) VALUES (?1, ?2, ?3)",
            params![todo.id.to_string(), todo.title, todo.completed],
        )?;
        debug!(id = %todo.id, title, "created todo");
        Ok(todo)
    }

    fn get_todo_all(&self) -> StoreResult<Vec<Todo>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{TODO_SELECT_SQL} ORDER BY seq"))?;
        let rows = stmt.query_map([], todo_from_row)?;
        let mut todos = Vec::new();
        for row in rows {
            todos.push(row??);
        }
        Ok(todos)
    }

    fn get_todo_by_title(&self, title: &str) -> StoreResult<Todo> {
        let conn = self.conn()?;
        let todo = conn
            .query_row(
                &format!("{TODO_SELECT_SQL} WHERE title = ?1 ORDER BY seq DESC LIMIT 1"),
                params![title],
                todo_from_row,
            )
            .optional()?;
        Ok(todo.transpose()?.unwrap_or_default())
    }

    fn get_todo_by_id(&self, id: Uuid) -> StoreResult<Todo> {
        let conn = self.conn()?;
        Self::find(&conn, id)?.ok_or(StoreError::NotFound(id))
    }

    fn update_todo_title(&self, id: Uuid, title: &str) -> StoreResult<Todo> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE todos SET title = ?2 WHERE id = ?1",
            params![id.to_string(), title],
        )?;
        if changed == 0 {
            return Ok(Todo::default());
        }
        Ok(Self::find(&conn, id)?.unwrap_or_default())
    }

    fn update_todo_status(&self, id: Uuid, completed: bool) -> StoreResult<Todo> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE todos SET completed = ?2 WHERE id = ?1",
            params![id.to_string(), completed],
        )?;
        if changed == 0 {
            return Ok(Todo::default());
        }
        Ok(Self::find(&conn, id)?.unwrap_or_default())
    }

    fn update_todo_by_id(&self, id: Uuid, todo: Todo) -> StoreResult<Todo> {
        let conn = self.conn()?;
        if Self::find(&conn, id)?.is_none() {
            return Ok(Todo::default());
        }
        if todo.id != id && Self::find(&conn, todo.id)?.is_some() {
            return Err(StoreError::Validation(format!(
                "id {} already belongs to another todo",
                todo.id
            )));
        }
        let changed = conn.execute(
            "UPDATE todos SET id = ?2, title = ?3, completed = ?4 WHERE id = ?1",
            params![id.to_string(), todo.id.to_string(), todo.title, todo.completed],
        )?;
        if changed == 0 {
            return Ok(Todo::default());
        }
        debug!(%id, stored_id = %todo.id, "replaced todo");
        Ok(todo)
    }

    fn delete_todo_by_id(&self, id: Uuid) -> StoreResult<Todo> {
        let conn = self.conn()?;
        let existing = Self::find(&conn, id)?.ok_or(StoreError::NotFound(id))?;
        conn.execute("DELETE FROM todos WHERE id = ?1", params![id.to_string()])?;
        debug!(%id, "deleted todo");
        Ok(existing)
    }
}
