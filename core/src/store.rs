//! The todo store: state behind a lock, getters, and network actions.
//!
//! # Design
//! Actions take `&self`, so several can be in flight at once. Each one
//! builds a request with `TodoClient`, runs it through the `Transport`, and
//! on success commits exactly one `Mutation`. The state lock is held only
//! while a getter reads or a mutation applies, never across an `.await`, so
//! commits land in the order responses arrive.
//!
//! Failures are reported two ways. Authentication actions (`retrieve_token`,
//! `register`, `destroy_token`) return `StoreError` so the login UI can
//! react. Every other action logs the failure and leaves state untouched.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, error};

use crate::client::TodoClient;
use crate::error::{ApiError, StoreError};
use crate::http::{HttpRequest, HttpResponse};
use crate::state::{Mutation, State};
use crate::storage::{KeyValueStorage, ACCESS_TOKEN_KEY};
use crate::transport::Transport;
use crate::types::{
    CheckAll, CreateTodo, Credentials, DeleteCompleted, Filter, Registration, Todo, TodoId,
    UpdateTodo,
};

pub struct Store {
    state: RwLock<State>,
    client: TodoClient,
    transport: Arc<dyn Transport>,
    storage: Arc<dyn KeyValueStorage>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Create a store with filter `all`, no todos, and the token hydrated
    /// from `storage`.
    pub fn new(
        client: TodoClient,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Self {
        let token = storage.get(ACCESS_TOKEN_KEY);
        debug!(base_url = client.base_url(), logged_in = token.is_some(), "store created");
        Self {
            state: RwLock::new(State::with_token(token)),
            client,
            transport,
            storage,
        }
    }

    // --- getters ---

    /// Run `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> State {
        self.read(State::clone)
    }

    pub fn token(&self) -> Option<String> {
        self.read(|state| state.token.clone())
    }

    pub fn filter(&self) -> Filter {
        self.read(|state| state.filter.clone())
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.read(|state| state.todos.clone())
    }

    pub fn logged_in(&self) -> bool {
        self.read(State::logged_in)
    }

    pub fn remaining(&self) -> usize {
        self.read(State::remaining)
    }

    pub fn any_remaining(&self) -> bool {
        self.read(State::any_remaining)
    }

    pub fn todos_filtered(&self) -> Vec<Todo> {
        self.read(|state| state.todos_filtered().into_iter().cloned().collect())
    }

    pub fn show_clear_completed_button(&self) -> bool {
        self.read(State::show_clear_completed_button)
    }

    // --- mutations ---

    /// Apply a mutation. This is the only write path into the state.
    pub fn commit(&self, mutation: Mutation) {
        debug!(mutation = mutation.name(), "commit");
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.apply(mutation);
    }

    // --- actions ---

    /// Log in. On success the token is committed, persisted, and returned.
    pub async fn retrieve_token(&self, credentials: &Credentials) -> Result<String, StoreError> {
        let token = self
            .round_trip(self.client.build_login(credentials), TodoClient::parse_login)
            .await?;
        self.storage.set(ACCESS_TOKEN_KEY, &token);
        self.commit(Mutation::RetrieveToken(token.clone()));
        Ok(token)
    }

    /// Create an account. State is not touched; log in afterwards.
    pub async fn register(&self, registration: &Registration) -> Result<(), StoreError> {
        self.round_trip(self.client.build_register(registration), TodoClient::parse_register)
            .await?;
        Ok(())
    }

    /// Log out. The local token is dropped even when the server call fails;
    /// the failure is still returned.
    pub async fn destroy_token(&self) -> Result<(), StoreError> {
        if !self.logged_in() {
            return Ok(());
        }
        let result = self
            .round_trip(Ok(self.client.build_logout()), TodoClient::parse_logout)
            .await;
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.commit(Mutation::DestroyToken);
        result.map_err(StoreError::from)
    }

    pub async fn retrieve_todos(&self) {
        let result = self
            .round_trip(Ok(self.client.build_list_todos()), TodoClient::parse_list_todos)
            .await;
        if let Some(todos) = settle("retrieve_todos", result) {
            self.commit(Mutation::RetrieveTodos(todos));
        }
    }

    pub async fn add_todo(&self, title: &str) {
        let input = CreateTodo {
            title: title.to_string(),
            completed: false,
        };
        let result = self
            .round_trip(self.client.build_create_todo(&input), TodoClient::parse_create_todo)
            .await;
        if let Some(todo) = settle("add_todo", result) {
            self.commit(Mutation::AddTodo(todo));
        }
    }

    pub fn update_filter(&self, filter: impl Into<Filter>) {
        let filter = filter.into();
        debug!(%filter, "filter changed");
        self.commit(Mutation::UpdateFilter(filter));
    }

    pub async fn check_all(&self, checked: bool) {
        let input = CheckAll { completed: checked };
        let result = self
            .round_trip(self.client.build_check_all(&input), TodoClient::parse_check_all)
            .await;
        if settle("check_all", result).is_some() {
            self.commit(Mutation::CheckAll(checked));
        }
    }

    /// Delete every completed todo. The id list is taken before the request
    /// is sent; todos completed while it is in flight are cleared locally but
    /// were not part of the request.
    pub async fn clear_completed(&self) {
        let input = DeleteCompleted {
            todos: self.read(State::completed_ids),
        };
        let result = self
            .round_trip(
                self.client.build_delete_completed(&input),
                TodoClient::parse_delete_completed,
            )
            .await;
        if settle("clear_completed", result).is_some() {
            self.commit(Mutation::ClearCompleted);
        }
    }

    pub async fn delete_todo(&self, id: TodoId) {
        let result = self
            .round_trip(Ok(self.client.build_delete_todo(id)), TodoClient::parse_delete_todo)
            .await;
        if settle("delete_todo", result).is_some() {
            self.commit(Mutation::DeleteTodo(id));
        }
    }

    /// Send `title` and `completed` for `todo.id`, then store the record the
    /// server returns.
    pub async fn update_todo(&self, todo: &Todo) {
        let input = UpdateTodo {
            title: todo.title.clone(),
            completed: todo.completed,
        };
        let result = self
            .round_trip(
                self.client.build_update_todo(todo.id, &input),
                TodoClient::parse_update_todo,
            )
            .await;
        if let Some(updated) = settle("update_todo", result) {
            self.commit(Mutation::UpdateTodo(updated));
        }
    }

    /// Empty the local collection without contacting the server.
    pub fn clear_todos(&self) {
        self.commit(Mutation::ClearTodos);
    }

    async fn round_trip<T>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&TodoClient, HttpResponse) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let request = request?.with_bearer_token(self.token().as_deref());
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = self.transport.execute(request).await?;
        parse(&self.client, response)
    }
}

/// Log a failed silent action and turn the result into an `Option`.
fn settle<T>(action: &'static str, result: Result<T, ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!(action, error = %e, "request failed");
            None
        }
    }
}
