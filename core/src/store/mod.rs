//! The storage contract for todo records.
//!
//! # Design
//! `TodoStore` is the seam between the boundary layer (HTTP handlers, the
//! remote client) and persistence. Every backend owns its records and hands
//! out copies, so callers can never mutate store state except through these
//! operations.
//!
//! Lookup misses are deliberately asymmetric. Id lookups and deletes report
//! `StoreError::NotFound`, since the id is the authoritative identity key.
//! Title lookups and updates against an unknown id succeed with the zero
//! value (`Todo::default()`).
//!
//! Backends are certified by the shared suite in `crate::conformance`.

pub mod memory;
pub mod remote;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use uuid::Uuid;

use crate::error::StoreResult;
use crate::types::Todo;

pub use memory::InMemoryTodoStore;
pub use remote::{RemoteTodoStore, Transport};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTodoStore;

/// Persistence backend for todo records.
///
/// Implementations must serialize mutations internally; the trait takes
/// `&self` so a single store can sit behind an `Arc` shared by handlers.
pub trait TodoStore: Send + Sync {
    /// Append a new record with a fresh id and `completed = false`.
    ///
    /// The title is not re-validated here; the boundary layer rejects empty
    /// titles before calling.
    fn create_todo(&self, title: &str) -> StoreResult<Todo>;

    /// All records in creation order.
    fn get_todo_all(&self) -> StoreResult<Vec<Todo>>;

    /// The last-created record with exactly this title, or the zero value.
    fn get_todo_by_title(&self, title: &str) -> StoreResult<Todo>;

    /// The record with this id, or `StoreError::NotFound`.
    fn get_todo_by_id(&self, id: Uuid) -> StoreResult<Todo>;

    /// Replace only the title. Returns the zero value for an unknown id.
    fn update_todo_title(&self, id: Uuid, title: &str) -> StoreResult<Todo>;

    /// Replace only the completed flag. Returns the zero value for an unknown id.
    fn update_todo_status(&self, id: Uuid, completed: bool) -> StoreResult<Todo>;

    /// Overwrite the record at `id`'s position with exactly `todo`, even when
    /// `todo.id` differs. Returns the zero value for an unknown id.
    fn update_todo_by_id(&self, id: Uuid, todo: Todo) -> StoreResult<Todo>;

    /// Remove the record and return it as it was, or `StoreError::NotFound`.
    fn delete_todo_by_id(&self, id: Uuid) -> StoreResult<Todo>;
}
