//! In-memory implementation of the todo REST API.
//!
//! Users register with `name`, `email`, `password` and log in with
//! `username = email`. Tokens are opaque v4 UUIDs. Every `/todos*` route and
//! `/logout` require `Authorization: Bearer <token>`; todos are scoped to the
//! owner of the token and listed in id order.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct Register {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CheckAll {
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct DeleteCompleted {
    pub todos: Vec<u64>,
}

#[derive(Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

struct User {
    name: String,
    password: String,
}

struct Record {
    owner: String,
    todo: Todo,
}

/// Everything the server knows: accounts, live tokens, and todos.
#[derive(Default)]
pub struct Backend {
    users: HashMap<String, User>,
    tokens: HashMap<String, String>,
    todos: BTreeMap<u64, Record>,
    next_id: u64,
}

impl Backend {
    /// Register `email` directly, bypassing `/register`.
    pub fn with_user(mut self, name: &str, email: &str, password: &str) -> Self {
        self.users.insert(
            email.to_string(),
            User {
                name: name.to_string(),
                password: password.to_string(),
            },
        );
        self
    }

    fn owner_of(&self, headers: &HeaderMap) -> Result<String, StatusCode> {
        let token = bearer_token(headers).ok_or(StatusCode::UNAUTHORIZED)?;
        self.tokens.get(token).cloned().ok_or(StatusCode::UNAUTHORIZED)
    }

    fn owned_mut(&mut self, owner: &str, id: u64) -> Result<&mut Todo, StatusCode> {
        match self.todos.get_mut(&id) {
            Some(record) if record.owner == owner => Ok(&mut record.todo),
            _ => Err(StatusCode::NOT_FOUND),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

pub type Db = Arc<RwLock<Backend>>;

pub fn app() -> Router {
    app_with(Backend::default())
}

pub fn app_with(backend: Backend) -> Router {
    let db: Db = Arc::new(RwLock::new(backend));
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", patch(update_todo).delete(delete_todo))
        .route("/todosCheckAll", patch(check_all))
        .route("/todosDeleteCompleted", delete(delete_completed))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Register>,
) -> Result<(StatusCode, Json<Message>), StatusCode> {
    if input.email.trim().is_empty() || input.password.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let mut backend = db.write().await;
    if backend.users.contains_key(&input.email) {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    debug!(email = %input.email, "registered user");
    backend.users.insert(
        input.email,
        User {
            name: input.name,
            password: input.password,
        },
    );
    Ok((StatusCode::CREATED, Message::new("registered")))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<Login>,
) -> Result<Json<AccessToken>, (StatusCode, String)> {
    let mut backend = db.write().await;
    let valid = backend
        .users
        .get(&input.username)
        .is_some_and(|user| user.password == input.password);
    if !valid {
        return Err((StatusCode::UNAUTHORIZED, "invalid credentials".to_string()));
    }
    let token = Uuid::new_v4().to_string();
    if let Some(user) = backend.users.get(&input.username) {
        debug!(name = %user.name, "issued token");
    }
    backend.tokens.insert(token.clone(), input.username);
    Ok(Json(AccessToken {
        access_token: token,
    }))
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Message>, StatusCode> {
    let mut backend = db.write().await;
    backend.owner_of(&headers)?;
    if let Some(token) = bearer_token(&headers) {
        backend.tokens.remove(token);
    }
    Ok(Message::new("logged out"))
}

async fn list_todos(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Vec<Todo>>, StatusCode> {
    let backend = db.read().await;
    let owner = backend.owner_of(&headers)?;
    Ok(Json(
        backend
            .todos
            .values()
            .filter(|record| record.owner == owner)
            .map(|record| record.todo.clone())
            .collect(),
    ))
}

async fn create_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), StatusCode> {
    let mut backend = db.write().await;
    let owner = backend.owner_of(&headers)?;
    if input.title.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    backend.next_id += 1;
    let todo = Todo {
        id: backend.next_id,
        title: input.title,
        completed: input.completed,
    };
    backend.todos.insert(
        todo.id,
        Record {
            owner,
            todo: todo.clone(),
        },
    );
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut backend = db.write().await;
    let owner = backend.owner_of(&headers)?;
    if input.title.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let todo = backend.owned_mut(&owner, id)?;
    todo.title = input.title;
    todo.completed = input.completed;
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let mut backend = db.write().await;
    let owner = backend.owner_of(&headers)?;
    backend.owned_mut(&owner, id)?;
    backend.todos.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

async fn check_all(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CheckAll>,
) -> Result<Json<Message>, StatusCode> {
    let mut backend = db.write().await;
    let owner = backend.owner_of(&headers)?;
    for record in backend.todos.values_mut().filter(|r| r.owner == owner) {
        record.todo.completed = input.completed;
    }
    Ok(Message::new("updated"))
}

async fn delete_completed(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<DeleteCompleted>,
) -> Result<Json<Message>, StatusCode> {
    let mut backend = db.write().await;
    let owner = backend.owner_of(&headers)?;
    backend
        .todos
        .retain(|id, record| record.owner != owner || !input.todos.contains(id));
    Ok(Message::new("deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
        headers
    }

    #[test]
    fn todo_serializes_to_json() {
        let todo = Todo {
            id: 1,
            title: "Test".to_string(),
            completed: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "title": "Test", "completed": false}));
    }

    #[test]
    fn create_todo_defaults_completed_to_false() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"No completed field"}"#).unwrap();
        assert_eq!(input.title, "No completed field");
        assert!(!input.completed);
    }

    #[test]
    fn update_todo_requires_both_fields() {
        let result: Result<UpdateTodo, _> = serde_json::from_str(r#"{"title":"New title"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn owner_of_rejects_missing_and_unknown_tokens() {
        let mut backend = Backend::default();
        backend
            .tokens
            .insert("good".to_string(), "ann@example.com".to_string());

        assert_eq!(backend.owner_of(&HeaderMap::new()), Err(StatusCode::UNAUTHORIZED));
        assert_eq!(backend.owner_of(&bearer("bad")), Err(StatusCode::UNAUTHORIZED));
        assert_eq!(backend.owner_of(&bearer("good")).as_deref(), Ok("ann@example.com"));
    }

    #[test]
    fn owned_mut_hides_other_users_todos() {
        let mut backend = Backend::default();
        backend.todos.insert(
            1,
            Record {
                owner: "ann@example.com".to_string(),
                todo: Todo {
                    id: 1,
                    title: "a".to_string(),
                    completed: false,
                },
            },
        );
        assert!(backend.owned_mut("ann@example.com", 1).is_ok());
        assert_eq!(
            backend.owned_mut("bob@example.com", 1).map(|t| t.id),
            Err(StatusCode::NOT_FOUND)
        );
    }
}
