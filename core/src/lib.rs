//! Client-side state store for the todo service.
//!
//! # Overview
//! `Store` holds the session token, the display filter, and the ordered todo
//! collection. UI code reads derived views through getters and changes state
//! through actions, which talk to the REST API and then commit a `Mutation`.
//!
//! # Design
//! - `TodoClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern).
//! - `Transport` performs the round-trip; `ReqwestTransport` is the
//!   production implementation.
//! - `KeyValueStorage` persists the token across restarts.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod state;
pub mod storage;
pub mod store;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use config::StoreConfig;
pub use error::{ApiError, StoreError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{Mutation, State};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, ACCESS_TOKEN_KEY};
pub use store::Store;
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    AccessToken, CheckAll, CreateTodo, Credentials, DeleteCompleted, Filter, Registration, Todo,
    TodoId, UpdateTodo,
};
