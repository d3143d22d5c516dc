//! Domain types and wire DTOs for the todo API.
//!
//! # Design
//! `Todo` doubles as the wire type and the in-store record. The `editing`
//! flag is UI-transient: it is skipped on serialization and defaults to
//! `false` when a record arrives from the backend. The remaining DTOs are
//! request/response payloads and never live in the store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend-assigned identifier of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    /// Whether the UI is currently editing this todo. Never sent to or read
    /// from the backend.
    #[serde(skip)]
    pub editing: bool,
}

impl Todo {
    pub fn new(id: impl Into<TodoId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
            editing: false,
        }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Which subset of the collection the UI shows.
///
/// Any string converts into a `Filter`. Values other than `all`, `active`
/// and `completed` are kept verbatim as `Unrecognized` and select the whole
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
    Unrecognized(String),
}

impl Filter {
    pub fn as_str(&self) -> &str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
            Filter::Unrecognized(raw) => raw,
        }
    }
}

impl From<&str> for Filter {
    fn from(raw: &str) -> Self {
        match raw {
            "all" => Filter::All,
            "active" => Filter::Active,
            "completed" => Filter::Completed,
            other => Filter::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for Filter {
    fn from(raw: String) -> Self {
        Filter::from(raw.as_str())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Login payload for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Sign-up payload for `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Successful `POST /login` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for `PATCH /todos/{id}`. Both fields are always sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub title: String,
    pub completed: bool,
}

/// Request payload for `PATCH /todosCheckAll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckAll {
    pub completed: bool,
}

/// Request payload for `DELETE /todosDeleteCompleted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCompleted {
    pub todos: Vec<TodoId>,
}
