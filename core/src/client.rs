//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each store operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip.
//!
//! Every operation targets the single `/todo` resource; the query string or
//! JSON body selects what the server does.

use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, UpdateTodo};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: HttpMethod, query: Vec<(String, String)>) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}/todo", self.base_url),
            query,
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<T: serde::Serialize>(
        &self,
        method: HttpMethod,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut req = self.request(method, Vec::new());
        req.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        req.body = Some(body);
        Ok(req)
    }

    pub fn build_get_all(&self) -> HttpRequest {
        self.request(HttpMethod::Get, Vec::new())
    }

    pub fn build_get_by_title(&self, title: &str) -> HttpRequest {
        self.request(HttpMethod::Get, vec![("title".to_string(), title.to_string())])
    }

    pub fn build_get_by_id(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, vec![("id".to_string(), id.to_string())])
    }

    pub fn build_create(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, input)
    }

    pub fn build_update(&self, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, input)
    }

    /// Whole-record update: `todo` is stored verbatim at `id`'s position.
    pub fn build_replace(&self, id: Uuid, todo: &Todo) -> Result<HttpRequest, ApiError> {
        let mut req = self.json_request(HttpMethod::Put, todo)?;
        req.query.push(("id".to_string(), id.to_string()));
        Ok(req)
    }

    pub fn build_delete(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, vec![("id".to_string(), id.to_string())])
    }

    pub fn parse_get_all(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_get_by_title(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_get_by_id(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 201)?;
        parse_body(&response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_all_produces_correct_request() {
        let req = client().build_get_all();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/todo");
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_by_title_carries_unencoded_title() {
        let req = client().build_get_by_title("milk & eggs");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.query,
            vec![("title".to_string(), "milk & eggs".to_string())]
        );
    }

    #[test]
    fn build_get_by_id_produces_correct_request() {
        let req = client().build_get_by_id(Uuid::nil());
        assert_eq!(req.path, "http://localhost:3000/todo");
        assert_eq!(
            req.query,
            vec![(
                "id".to_string(),
                "00000000-0000-0000-0000-000000000000".to_string()
            )]
        );
    }

    #[test]
    fn build_create_produces_json_body() {
        let input = CreateTodo {
            title: "Buy milk".to_string(),
        };
        let req = client().build_create(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["Title"], "Buy milk");
    }

    #[test]
    fn build_update_omits_absent_fields() {
        let input = UpdateTodo {
            id: Uuid::nil(),
            title: None,
            completed: Some(true),
        };
        let req = client().build_update(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert!(req.query.is_empty());
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["Completed"], true);
        assert!(body.get("Title").is_none());
    }

    #[test]
    fn build_replace_separates_target_from_record() {
        let target = Uuid::nil();
        let todo = Todo {
            id: Uuid::from_u128(7),
            title: "Swapped".to_string(),
            completed: true,
        };
        let req = client().build_replace(target, &todo).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.query, vec![("id".to_string(), target.to_string())]);
        let body: Todo = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, todo);
    }

    #[test]
    fn build_delete_targets_id() {
        let req = client().build_delete(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.query[0].0, "id");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_get_all_success() {
        let todos = client()
            .parse_get_all(response(
                200,
                r#"[{"Id":"00000000-0000-0000-0000-000000000001","Title":"Test","Completed":false}]"#,
            ))
            .unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "Test");
    }

    #[test]
    fn parse_get_by_id_not_found() {
        let err = client().parse_get_by_id(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_get_by_title_zero_value() {
        let todo = client()
            .parse_get_by_title(response(
                200,
                r#"{"Id":"00000000-0000-0000-0000-000000000000","Title":"","Completed":false}"#,
            ))
            .unwrap();
        assert!(todo.is_unset());
    }

    #[test]
    fn parse_create_wrong_status() {
        let err = client()
            .parse_create(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_delete_returns_removed_todo() {
        let todo = client()
            .parse_delete(response(
                200,
                r#"{"Id":"00000000-0000-0000-0000-000000000001","Title":"Gone","Completed":true}"#,
            ))
            .unwrap();
        assert_eq!(todo.title, "Gone");
        assert!(todo.completed);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        assert_eq!(client.build_get_all().path, "http://localhost:3000/todo");
    }

    #[test]
    fn parse_get_all_bad_json() {
        let err = client().parse_get_all(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
