//! A `TodoStore` backed by a remote instance of the todo service.
//!
//! # Design
//! Requests are built and parsed by `TodoClient`; the network round-trip is
//! delegated to a caller-supplied `Transport`, so this crate stays free of
//! any HTTP client dependency.

use uuid::Uuid;

use super::TodoStore;
use crate::client::TodoClient;
use crate::error::{ApiError, StoreError, StoreResult};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, UpdateTodo};

/// Executes an `HttpRequest` and returns the response as data.
///
/// Non-2xx statuses must come back as `Ok` responses; only failures to get
/// any response at all are `Err`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct RemoteTodoStore<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> RemoteTodoStore<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: TodoClient::new(base_url),
            transport,
        }
    }

    fn send(&self, request: HttpRequest) -> StoreResult<HttpResponse> {
        self.transport.execute(request).map_err(backend)
    }

    fn update(&self, input: UpdateTodo) -> StoreResult<Todo> {
        let request = self.client.build_update(&input).map_err(backend)?;
        let response = self.send(request)?;
        self.client.parse_update(response).map_err(backend)
    }
}

/// 400 is the server rejecting the input; anything else is a storage failure.
fn backend(err: ApiError) -> StoreError {
    match err {
        ApiError::HttpError { status: 400, body } => StoreError::Validation(error_message(body)),
        other => StoreError::Backend(other.to_string()),
    }
}

/// The `error` field of a JSON error body, or the raw body.
fn error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(str::to_string))
        .unwrap_or(body)
}

/// Like `backend`, but a 404 means the id does not exist.
fn by_id(id: Uuid) -> impl FnOnce(ApiError) -> StoreError {
    move |err| match err {
        ApiError::NotFound => StoreError::NotFound(id),
        other => backend(other),
    }
}

impl<T: Transport> TodoStore for RemoteTodoStore<T> {
    fn create_todo(&self, title: &str) -> StoreResult<Todo> {
        let input = CreateTodo {
            title: title.to_string(),
        };
        let request = self.client.build_create(&input).map_err(backend)?;
        let response = self.send(request)?;
        self.client.parse_create(response).map_err(backend)
    }

    fn get_todo_all(&self) -> StoreResult<Vec<Todo>> {
        let response = self.send(self.client.build_get_all())?;
        self.client.parse_get_all(response).map_err(backend)
    }

    fn get_todo_by_title(&self, title: &str) -> StoreResult<Todo> {
        let response = self.send(self.client.build_get_by_title(title))?;
        self.client.parse_get_by_title(response).map_err(backend)
    }

    fn get_todo_by_id(&self, id: Uuid) -> StoreResult<Todo> {
        let response = self.send(self.client.build_get_by_id(id))?;
        self.client.parse_get_by_id(response).map_err(by_id(id))
    }

    fn update_todo_title(&self, id: Uuid, title: &str) -> StoreResult<Todo> {
        self.update(UpdateTodo {
            id,
            title: Some(title.to_string()),
            completed: None,
        })
    }

    fn update_todo_status(&self, id: Uuid, completed: bool) -> StoreResult<Todo> {
        self.update(UpdateTodo {
            id,
            title: None,
            completed: Some(completed),
        })
    }

    fn update_todo_by_id(&self, id: Uuid, todo: Todo) -> StoreResult<Todo> {
        let request = self.client.build_replace(id, &todo).map_err(backend)?;
        let response = self.send(request)?;
        self.client.parse_update(response).map_err(backend)
    }

    fn delete_todo_by_id(&self, id: Uuid) -> StoreResult<Todo> {
        let response = self.send(self.client.build_delete(id))?;
        self.client.parse_delete(response).map_err(by_id(id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::http::HttpMethod;

    /// Answers every request with the same canned response and records it.
    struct Canned {
        status: u16,
        body: String,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    struct Unreachable;

    impl Transport for Unreachable {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        }
    }

    #[test]
    fn not_found_maps_to_store_not_found_with_id() {
        let store = RemoteTodoStore::new("http://remote", Canned::new(404, ""));
        let id = Uuid::new_v4();

        match store.get_todo_by_id(id) {
            Err(StoreError::NotFound(missing)) => assert_eq!(missing, id),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(matches!(
            store.delete_todo_by_id(id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn server_errors_map_to_backend() {
        let store = RemoteTodoStore::new("http://remote", Canned::new(500, "boom"));
        let err = store.create_todo("x").unwrap_err();
        assert!(matches!(err, StoreError::Backend(ref msg) if msg.contains("boom")));
    }

    #[test]
    fn bad_request_maps_to_validation() {
        let body = r#"{"error":"invalid todo: title must not be empty"}"#;
        let store = RemoteTodoStore::new("http://remote", Canned::new(400, body));

        match store.create_todo("") {
            Err(StoreError::Validation(msg)) => {
                assert_eq!(msg, "invalid todo: title must not be empty")
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(matches!(
            store.update_todo_title(Uuid::new_v4(), ""),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn bad_request_with_plain_body_keeps_the_text() {
        let store = RemoteTodoStore::new("http://remote", Canned::new(400, "nope"));
        assert!(matches!(
            store.get_todo_all(),
            Err(StoreError::Validation(ref msg)) if msg == "nope"
        ));
    }

    #[test]
    fn transport_failures_map_to_backend() {
        let store = RemoteTodoStore::new("http://remote", Unreachable);
        assert!(matches!(store.get_todo_all(), Err(StoreError::Backend(_))));
    }

    #[test]
    fn status_update_sends_only_completed() {
        let body = r#"{"Id":"00000000-0000-0000-0000-000000000001","Title":"t","Completed":true}"#;
        let store = RemoteTodoStore::new("http://remote", Canned::new(200, body));
        let id = Uuid::from_u128(1);

        let todo = store.update_todo_status(id, true).unwrap();
        assert!(todo.completed);

        let seen = store.transport.seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Put);
        let sent: serde_json::Value =
            serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent["Completed"], true);
        assert!(sent.get("Title").is_none());
    }
}
