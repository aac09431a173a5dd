//! Error types for todo stores and the todo API client.
//!
//! # Design
//! `StoreError` is the contract-level error every backend returns.
//! `NotFound` is the only structural category; backend failures of any kind
//! (I/O, SQL, remote HTTP) collapse into `Backend` with a message.
//!
//! `ApiError` belongs to the client core. `NotFound` gets a dedicated variant
//! because callers frequently distinguish "the resource does not exist" from
//! "the server returned an unexpected status."

use thiserror::Error;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by `TodoStore` operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No todo with this id exists.
    #[error("todo not found: {0}")]
    NotFound(Uuid),

    /// The input was rejected before reaching storage.
    #[error("invalid todo: {0}")]
    Validation(String),

    /// The underlying storage failed.
    #[error("storage backend failed: {0}")]
    Backend(String),
}

/// Errors returned by `TodoClient` parse methods and transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned an unexpected status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
