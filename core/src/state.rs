//! Store state, derived views, and the closed set of mutations.
//!
//! # Design
//! `State` is plain data. Getters are pure functions over it, and the only
//! way to change it is `State::apply` with a `Mutation`. Mutations are total:
//! an unknown id or an unrecognized filter degrades to a no-op or a fallback,
//! never to an error.

use crate::types::{Filter, Todo, TodoId};

/// Token, filter, and the ordered todo collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub token: Option<String>,
    pub filter: Filter,
    pub todos: Vec<Todo>,
}

/// Every permitted local state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Append a server-created todo as not completed and not editing.
    /// Ignored when a todo with the same id is already present.
    AddTodo(Todo),
    UpdateFilter(Filter),
    CheckAll(bool),
    ClearCompleted,
    DeleteTodo(TodoId),
    /// Replace the record with the same id in place.
    UpdateTodo(Todo),
    RetrieveTodos(Vec<Todo>),
    RetrieveToken(String),
    DestroyToken,
    ClearTodos,
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddTodo(_) => "add_todo",
            Mutation::UpdateFilter(_) => "update_filter",
            Mutation::CheckAll(_) => "check_all",
            Mutation::ClearCompleted => "clear_completed",
            Mutation::DeleteTodo(_) => "delete_todo",
            Mutation::UpdateTodo(_) => "update_todo",
            Mutation::RetrieveTodos(_) => "retrieve_todos",
            Mutation::RetrieveToken(_) => "retrieve_token",
            Mutation::DestroyToken => "destroy_token",
            Mutation::ClearTodos => "clear_todos",
        }
    }
}

impl State {
    /// Fresh state with an optional token hydrated from storage.
    pub fn with_token(token: Option<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    pub fn logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn remaining(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    pub fn any_remaining(&self) -> bool {
        self.remaining() != 0
    }

    pub fn todos_filtered(&self) -> Vec<&Todo> {
        match self.filter {
            Filter::Active => self.todos.iter().filter(|todo| !todo.completed).collect(),
            Filter::Completed => self.todos.iter().filter(|todo| todo.completed).collect(),
            Filter::All | Filter::Unrecognized(_) => self.todos.iter().collect(),
        }
    }

    pub fn show_clear_completed_button(&self) -> bool {
        self.todos.iter().any(|todo| todo.completed)
    }

    /// Ids of all completed todos, in collection order.
    pub fn completed_ids(&self) -> Vec<TodoId> {
        self.todos
            .iter()
            .filter(|todo| todo.completed)
            .map(|todo| todo.id)
            .collect()
    }

    pub fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::AddTodo(todo) => {
                // A concurrent fetch may already have delivered this record.
                if self.position(todo.id).is_none() {
                    self.todos.push(Todo {
                        completed: false,
                        editing: false,
                        ..todo
                    });
                }
            }
            Mutation::UpdateFilter(filter) => self.filter = filter,
            Mutation::CheckAll(checked) => {
                for todo in &mut self.todos {
                    todo.completed = checked;
                }
            }
            Mutation::ClearCompleted => self.todos.retain(|todo| !todo.completed),
            Mutation::DeleteTodo(id) => {
                if let Some(index) = self.position(id) {
                    self.todos.remove(index);
                }
            }
            Mutation::UpdateTodo(todo) => {
                if let Some(index) = self.position(todo.id) {
                    self.todos[index] = todo;
                }
            }
            Mutation::RetrieveTodos(todos) => self.todos = todos,
            Mutation::RetrieveToken(token) => self.token = Some(token),
            Mutation::DestroyToken => self.token = None,
            Mutation::ClearTodos => self.todos.clear(),
        }
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }
}
