use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::context::RequestContext;
use crate::error::TodoResult;
use crate::models::Todo;

/// Repository trait for Todo persistence.
///
/// Every method takes the caller's [`RequestContext`] and must stop early with
/// `TodoError::Cancelled` once it is cancelled or past its deadline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a new TODO and return it with its assigned id and timestamps
    async fn create(
        &self,
        ctx: &RequestContext,
        subject: String,
        description: String,
    ) -> TodoResult<Todo>;

    /// Up to `limit` TODOs ordered by id descending, optionally only ids `< before`
    async fn list_page(
        &self,
        ctx: &RequestContext,
        before: Option<i64>,
        limit: u64,
    ) -> TodoResult<Vec<Todo>>;

    /// Replace subject and description; `None` when no TODO has this id
    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        subject: String,
        description: String,
    ) -> TodoResult<Option<Todo>>;

    /// Delete every TODO whose id is in `ids`, returning how many were removed
    async fn delete_many(&self, ctx: &RequestContext, ids: &[i64]) -> TodoResult<u64>;
}

#[derive(Debug, Default)]
struct Store {
    todos: BTreeMap<i64, Todo>,
    last_id: i64,
}

/// In-memory implementation of TodoRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryTodoRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(
        &self,
        ctx: &RequestContext,
        subject: String,
        description: String,
    ) -> TodoResult<Todo> {
        ctx.run(async {
            let mut store = self.store.write().await;
            store.last_id += 1;

            let now = Utc::now();
            let todo = Todo {
                id: store.last_id,
                subject,
                description,
                created_at: now,
                updated_at: now,
            };
            store.todos.insert(todo.id, todo.clone());

            tracing::info!(todo_id = todo.id, "Created todo");
            Ok(todo)
        })
        .await
    }

    async fn list_page(
        &self,
        ctx: &RequestContext,
        before: Option<i64>,
        limit: u64,
    ) -> TodoResult<Vec<Todo>> {
        ctx.run(async {
            let store = self.store.read().await;
            let page: Vec<Todo> = match before {
                Some(before) => store.todos.range(..before),
                None => store.todos.range(..),
            }
            .rev()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|(_, todo)| todo.clone())
            .collect();

            Ok(page)
        })
        .await
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        subject: String,
        description: String,
    ) -> TodoResult<Option<Todo>> {
        ctx.run(async {
            let mut store = self.store.write().await;
            let Some(todo) = store.todos.get_mut(&id) else {
                return Ok(None);
            };

            todo.subject = subject;
            todo.description = description;
            todo.updated_at = Utc::now().max(todo.created_at);

            tracing::info!(todo_id = id, "Updated todo");
            Ok(Some(todo.clone()))
        })
        .await
    }

    async fn delete_many(&self, ctx: &RequestContext, ids: &[i64]) -> TodoResult<u64> {
        ctx.run(async {
            let mut store = self.store.write().await;
            let removed = ids
                .iter()
                .filter(|id| store.todos.remove(*id).is_some())
                .count() as u64;

            tracing::info!(requested = ids.len(), removed, "Deleted todos");
            Ok(removed)
        })
        .await
    }
}
