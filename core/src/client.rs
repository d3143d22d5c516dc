//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Authentication is attached by the caller with
//! `HttpRequest::with_bearer_token`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AccessToken, CheckAll, CreateTodo, Credentials, DeleteCompleted, Registration, Todo, TodoId,
    UpdateTodo,
};

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

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/login", credentials)
    }

    pub fn build_register(&self, registration: &Registration) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/register", registration)
    }

    pub fn build_logout(&self) -> HttpRequest {
        self.empty_request(HttpMethod::Post, "/logout")
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.empty_request(HttpMethod::Get, "/todos")
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/todos", input)
    }

    pub fn build_check_all(&self, input: &CheckAll) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Patch, "/todosCheckAll", input)
    }

    pub fn build_delete_completed(&self, input: &DeleteCompleted) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Delete, "/todosDeleteCompleted", input)
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        self.empty_request(HttpMethod::Delete, &format!("/todos/{id}"))
    }

    pub fn build_update_todo(&self, id: TodoId, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Patch, &format!("/todos/{id}"), input)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<String, ApiError> {
        let token: AccessToken = parse_json(response)?;
        Ok(token.access_token)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_logout(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response)
    }

    pub fn parse_check_all(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete_completed(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response)
    }

    fn empty_request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut req = self.empty_request(method, path);
        req.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        req.body = Some(body);
        Ok(req)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
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

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    fn body_of(req: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn build_login_produces_correct_request() {
        let req = client()
            .build_login(&Credentials::new("ann@example.com", "secret"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/login");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(
            body_of(&req),
            serde_json::json!({"username": "ann@example.com", "password": "secret"})
        );
    }

    #[test]
    fn build_register_produces_correct_request() {
        let req = client()
            .build_register(&Registration {
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                password: "secret".to_string(),
            })
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/register");
        assert_eq!(body_of(&req)["email"], "ann@example.com");
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/todos");
        assert!(req.body.is_none());
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = CreateTodo {
            title: "Buy milk".to_string(),
            completed: false,
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/todos");
        let body = body_of(&req);
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["completed"], false);
    }

    #[test]
    fn build_check_all_produces_correct_request() {
        let req = client().build_check_all(&CheckAll { completed: true }).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:3000/todosCheckAll");
        assert_eq!(body_of(&req), serde_json::json!({"completed": true}));
    }

    #[test]
    fn build_delete_completed_sends_ids_in_body() {
        let input = DeleteCompleted {
            todos: vec![TodoId(2), TodoId(5)],
        };
        let req = client().build_delete_completed(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/todosDeleteCompleted");
        assert_eq!(body_of(&req), serde_json::json!({"todos": [2, 5]}));
    }

    #[test]
    fn build_update_todo_sends_title_and_completed() {
        let input = UpdateTodo {
            title: "Updated".to_string(),
            completed: true,
        };
        let req = client().build_update_todo(TodoId(9), &input).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:3000/todos/9");
        assert_eq!(
            body_of(&req),
            serde_json::json!({"title": "Updated", "completed": true})
        );
    }

    #[test]
    fn build_delete_todo_produces_correct_request() {
        let req = client().build_delete_todo(TodoId(3));
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/todos/3");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_login_extracts_access_token() {
        let response = HttpResponse::new(200, r#"{"access_token":"tok","token_type":"Bearer"}"#);
        assert_eq!(client().parse_login(response).unwrap(), "tok");
    }

    #[test]
    fn parse_login_rejects_bad_credentials() {
        let response = HttpResponse::new(401, "invalid credentials");
        let err = client().parse_login(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 401, .. }));
    }

    #[test]
    fn parse_list_todos_success() {
        let response = HttpResponse::new(200, r#"[{"id":1,"title":"Test","completed":false}]"#);
        let todos = client().parse_list_todos(response).unwrap();
        assert_eq!(todos, vec![Todo::new(1, "Test")]);
    }

    #[test]
    fn parse_create_todo_accepts_any_2xx() {
        let body = r#"{"id":4,"title":"New","completed":false}"#;
        assert_eq!(
            client().parse_create_todo(HttpResponse::new(201, body)).unwrap(),
            Todo::new(4, "New")
        );
        assert!(client().parse_create_todo(HttpResponse::new(200, body)).is_ok());
    }

    #[test]
    fn parse_create_todo_wrong_status() {
        let response = HttpResponse::new(500, "internal error");
        let err = client().parse_create_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_update_todo_success() {
        let response = HttpResponse::new(200, r#"{"id":1,"title":"Updated","completed":true}"#);
        let todo = client().parse_update_todo(response).unwrap();
        assert_eq!(todo.title, "Updated");
        assert!(todo.completed);
    }

    #[test]
    fn parse_delete_todo_not_found() {
        let err = client()
            .parse_delete_todo(HttpResponse::new(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_bulk_operations_ignore_body() {
        assert!(client().parse_check_all(HttpResponse::new(200, "Updated")).is_ok());
        assert!(client()
            .parse_delete_completed(HttpResponse::new(200, "Deleted"))
            .is_ok());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        let req = client.build_list_todos();
        assert_eq!(req.path, "http://localhost:3000/todos");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client()
            .parse_list_todos(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
