//! In-memory reference backend.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;
use uuid::Uuid;

use super::TodoStore;
use crate::error::{StoreError, StoreResult};
use crate::types::Todo;

/// A `TodoStore` holding records in a `Vec`, in creation order.
#[derive(Debug, Default)]
pub struct InMemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, kept in the given order.
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: RwLock::new(todos),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<Todo>>> {
        self.todos
            .read()
            .map_err(|_| StoreError::Backend("todo list lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<Todo>>> {
        self.todos
            .write()
            .map_err(|_| StoreError::Backend("todo list lock poisoned".to_string()))
    }

    /// Apply `change` to the record with `id` and return a copy of the result,
    /// or the zero value when no record matches.
    fn modify(&self, id: Uuid, change: impl FnOnce(&mut Todo)) -> StoreResult<Todo> {
        let mut todos = self.write()?;
        match todos.iter_mut().find(|todo| todo.id == id) {
            Some(todo) => {
                change(todo);
                Ok(todo.clone())
            }
            None => {
                debug!(%id, "update skipped, no such todo");
                Ok(Todo::default())
            }
        }
    }
}

impl TodoStore for InMemoryTodoStore {
    fn create_todo(&self, title: &str) -> StoreResult<Todo> {
        let todo = Todo::new(title);
        self.write()?.push(todo.clone());
        debug!(id = %todo.id, title, "created todo");
        Ok(todo)
    }

    fn get_todo_all(&self) -> StoreResult<Vec<Todo>> {
        Ok(self.read()?.clone())
    }

    fn get_todo_by_title(&self, title: &str) -> StoreResult<Todo> {
        let todos = self.read()?;
        Ok(todos
            .iter()
            .rev()
            .find(|todo| todo.title == title)
            .cloned()
            .unwrap_or_default())
    }

    fn get_todo_by_id(&self, id: Uuid) -> StoreResult<Todo> {
        let todos = self.read()?;
        todos
            .iter()
            .find(|todo| todo.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn update_todo_title(&self, id: Uuid, title: &str) -> StoreResult<Todo> {
        self.modify(id, |todo| todo.title = title.to_string())
    }

    fn update_todo_status(&self, id: Uuid, completed: bool) -> StoreResult<Todo> {
        self.modify(id, |todo| todo.completed = completed)
    }

    fn update_todo_by_id(&self, id: Uuid, todo: Todo) -> StoreResult<Todo> {
        let mut todos = self.write()?;
        let Some(index) = todos.iter().position(|stored| stored.id == id) else {
            debug!(%id, "update skipped, no such todo");
            return Ok(Todo::default());
        };
        if todo.id != id && todos.iter().any(|stored| stored.id == todo.id) {
            return Err(StoreError::Validation(format!(
                "id {} already belongs to another todo",
                todo.id
            )));
        }
        todos[index] = todo.clone();
        Ok(todo)
    }

    fn delete_todo_by_id(&self, id: Uuid) -> StoreResult<Todo> {
        let mut todos = self.write()?;
        let index = todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = todos.remove(index);
        debug!(%id, "deleted todo");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::todo_store_conformance!(conformance, InMemoryTodoStore::new());

    #[test]
    fn seeded_records_keep_their_order() {
        let seeded = vec![Todo::new("a"), Todo::new("b")];
        let store = InMemoryTodoStore::with_todos(seeded.clone());
        assert_eq!(store.get_todo_all().unwrap(), seeded);
    }

    #[test]
    fn returned_records_are_copies() {
        let store = InMemoryTodoStore::new();
        let mut todo = store.create_todo("original").unwrap();
        todo.title = "mutated by caller".to_string();

        let stored = store.get_todo_by_id(todo.id).unwrap();
        assert_eq!(stored.title, "original");
    }

    #[test]
    fn whole_record_update_keeps_position() {
        let store = InMemoryTodoStore::new();
        let first = store.create_todo("first").unwrap();
        let second = store.create_todo("second").unwrap();

        let replacement = Todo {
            id: first.id,
            title: "replaced".to_string(),
            completed: true,
        };
        store.update_todo_by_id(first.id, replacement.clone()).unwrap();

        assert_eq!(store.get_todo_all().unwrap(), vec![replacement, second]);
    }

    #[test]
    fn whole_record_update_stores_mismatched_id_verbatim() {
        let store = InMemoryTodoStore::new();
        let original = store.create_todo("first").unwrap();
        let replacement = Todo::new("other identity");

        let stored = store
            .update_todo_by_id(original.id, replacement.clone())
            .unwrap();

        assert_eq!(stored, replacement);
        assert!(matches!(
            store.get_todo_by_id(original.id),
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.get_todo_by_id(replacement.id).unwrap(), replacement);
    }

    #[test]
    fn delete_keeps_remaining_order() {
        let store = InMemoryTodoStore::new();
        let a = store.create_todo("a").unwrap();
        let b = store.create_todo("b").unwrap();
        let c = store.create_todo("c").unwrap();

        store.delete_todo_by_id(b.id).unwrap();

        assert_eq!(store.get_todo_all().unwrap(), vec![a, c]);
    }
}
