//! HTTP front end for a `TodoStore`.
//!
//! Every operation lives on the single `/todo` resource; query parameters
//! and the JSON body pick the store operation. The store is chosen by the
//! caller and shared across handlers as `Arc<dyn TodoStore>`.

pub mod config;

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, Request, State,
    },
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, error, info_span, warn, Instrument};
use uuid::Uuid;

use todo_core::{CreateTodo, StoreError, Todo, TodoStore, UpdateTodo};

pub type SharedStore = Arc<dyn TodoStore>;

/// Query parameters accepted on `/todo`.
#[derive(Debug, Default, Deserialize)]
pub struct TodoQuery {
    pub id: Option<Uuid>,
    pub title: Option<String>,
}

pub fn app(store: SharedStore) -> Router {
    Router::new()
        .route(
            "/todo",
            get(get_todo)
                .post(create_todo)
                .put(update_todo)
                .delete(delete_todo),
        )
        .layer(middleware::from_fn(trace_request))
        .with_state(store)
}

pub async fn run(listener: TcpListener, store: SharedStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

async fn trace_request(request: Request<Body>, next: Next) -> Response {
    let span = info_span!(
        "http.request",
        method = %request.method(),
        uri = %request.uri(),
    );
    async move {
        let response = next.run(request).await;
        debug!(status = response.status().as_u16(), "request finished");
        response
    }
    .instrument(span)
    .await
}

/// A store failure or rejected request, rendered as a JSON error body.
#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    /// An extractor refused the request before any handler logic ran.
    Rejected { status: StatusCode, message: String },
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<QueryRejection> for AppError {
    fn from(value: QueryRejection) -> Self {
        Self::Rejected {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::Rejected {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Store(err) => {
                let status = match &err {
                    StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                    StoreError::Validation(_) => StatusCode::BAD_REQUEST,
                    StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            Self::Rejected { status, message } => (status, message),
        };
        if status.is_server_error() {
            error!(error = %message, "todo store failed");
        } else {
            warn!(error = %message, "todo request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn invalid(message: &str) -> AppError {
    AppError::Store(StoreError::Validation(message.to_string()))
}

fn require_title(title: &str) -> Result<(), AppError> {
    if title.is_empty() {
        return Err(invalid("title must not be empty"));
    }
    Ok(())
}

async fn get_todo(
    State(store): State<SharedStore>,
    query: Result<Query<TodoQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let response = match (query.id, query.title) {
        (Some(id), _) => Json(store.get_todo_by_id(id)?).into_response(),
        (None, Some(title)) => Json(store.get_todo_by_title(&title)?).into_response(),
        (None, None) => Json(store.get_todo_all()?).into_response(),
    };
    Ok(response)
}

async fn create_todo(
    State(store): State<SharedStore>,
    query: Result<Query<TodoQuery>, QueryRejection>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let Query(query) = query?;
    let title = match query.title {
        Some(title) => title,
        None if body.is_empty() => String::new(),
        None => {
            let input: CreateTodo = serde_json::from_slice(&body)
                .map_err(|e| invalid(&format!("malformed body: {e}")))?;
            input.title
        }
    };
    require_title(&title)?;
    let todo = store.create_todo(&title)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(store): State<SharedStore>,
    query: Result<Query<TodoQuery>, QueryRejection>,
    input: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let Query(query) = query?;
    let Json(input) = input?;
    let target = query.id.unwrap_or(input.id);
    let todo = match (input.title, input.completed) {
        (Some(title), Some(completed)) => {
            require_title(&title)?;
            let record = Todo {
                id: input.id,
                title,
                completed,
            };
            store.update_todo_by_id(target, record)?
        }
        (Some(title), None) => {
            require_title(&title)?;
            store.update_todo_title(target, &title)?
        }
        (None, Some(completed)) => store.update_todo_status(target, completed)?,
        (None, None) => return Err(invalid("update needs Title or Completed")),
    };
    Ok(Json(todo))
}

async fn delete_todo(
    State(store): State<SharedStore>,
    query: Result<Query<TodoQuery>, QueryRejection>,
) -> Result<Json<Todo>, AppError> {
    let Query(query) = query?;
    let id = query.id.ok_or_else(|| invalid("delete needs an id"))?;
    Ok(Json(store.delete_todo_by_id(id)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_accepts_id_and_title() {
        let query: TodoQuery = serde_json::from_value(json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "title": "x",
        }))
        .unwrap();
        assert_eq!(query.id, Some(Uuid::from_u128(1)));
        assert_eq!(query.title.as_deref(), Some("x"));
    }

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (StoreError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (StoreError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (StoreError::Backend("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }
}
