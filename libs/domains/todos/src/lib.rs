//! Todos Domain
//!
//! CRUD over TODO items with cursor pagination and per-request cancellation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← GET/POST/PUT/DELETE on one collection path
//! └──────┬──────┘
//!        │ RequestContext (cancellation + deadline)
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, paging defaults, not-found detection
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + in-memory and PostgreSQL implementations
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use domain_todos::{handlers, InMemoryTodoRepository, TodoService};
//!
//! let service = TodoService::new(InMemoryTodoRepository::new())
//!     .with_request_timeout(Duration::from_secs(30));
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod context;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use context::{CancelHandle, RequestContext};
pub use error::{TodoError, TodoResult};
pub use models::{
    CreateTodo, DEFAULT_PAGE_SIZE, DeleteTodos, ReadTodosQuery, Todo, UpdateTodo,
};
pub use postgres::PgTodoRepository;
pub use repository::{InMemoryTodoRepository, TodoRepository};
pub use service::TodoService;
