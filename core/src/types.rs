//! Domain types for the todo service.
//!
//! # Design
//! `Todo` is shared by every store backend, the HTTP server, and the client
//! core, so the wire schema is defined exactly once. Fields serialize in
//! PascalCase (`Id`, `Title`, `Completed`).
//!
//! The zero value (`Todo::default()`) doubles as the "no match" result of
//! title lookups and of updates against an unknown id. Use
//! [`Todo::is_unset`] to detect it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    /// A freshly created todo: new v4 id, `completed = false`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
        }
    }

    /// True when this value carries no store-assigned identity.
    pub fn is_unset(&self) -> bool {
        self.id.is_nil()
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTodo {
    #[serde(default)]
    pub title: String,
}

/// Request payload for updating an existing todo.
///
/// Which store operation runs depends on the fields present: both fields
/// replace the whole record, a single field replaces only that field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTodo {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}
