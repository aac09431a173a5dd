//! Storage contract and client core for the todo service.
//!
//! # Overview
//! `TodoStore` is the contract every persistence backend implements. This
//! crate ships the in-memory reference backend, an optional SQLite backend,
//! and a remote backend that talks to another instance of the service over
//! HTTP. The `conformance` module is the executable definition of the
//! contract: any backend that passes it unmodified is correct.
//!
//! # Design
//! - Stores own their records and only ever return copies.
//! - `TodoClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern).
//! - The `Todo` wire schema is defined once, in `types`, and shared with
//!   the server crate.

pub mod client;
#[cfg(any(test, feature = "conformance"))]
pub mod conformance;
pub mod error;
pub mod http;
pub mod store;
pub mod types;

pub use client::TodoClient;
pub use error::{ApiError, StoreError, StoreResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
#[cfg(feature = "sqlite")]
pub use store::SqliteTodoStore;
pub use store::{InMemoryTodoStore, RemoteTodoStore, TodoStore, Transport};
pub use types::{CreateTodo, Todo, UpdateTodo};
