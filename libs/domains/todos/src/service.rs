use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use validator::Validate;

use crate::context::RequestContext;
use crate::error::{TodoError, TodoResult};
use crate::models::{CreateTodo, DEFAULT_PAGE_SIZE, Todo, UpdateTodo};
use crate::repository::TodoRepository;

/// Service layer for Todo business logic
pub struct TodoService<R: TodoRepository> {
    repository: Arc<R>,
    request_timeout: Option<Duration>,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            request_timeout: None,
        }
    }

    /// Give every request context created by [`Self::context`] this deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Fresh cancellation context for one request.
    pub fn context(&self) -> RequestContext {
        match self.request_timeout {
            Some(timeout) => RequestContext::with_timeout(timeout),
            None => RequestContext::new(),
        }
    }

    /// Create a new TODO
    #[instrument(skip(self, ctx, input), fields(subject_len = input.subject.len()))]
    pub async fn create_todo(&self, ctx: &RequestContext, input: CreateTodo) -> TodoResult<Todo> {
        input
            .validate()
            .map_err(|e| TodoError::Validation(e.to_string()))?;

        ctx.ensure_active()?;
        self.repository
            .create(ctx, input.subject, input.description)
            .await
    }

    /// One page of TODOs, newest first.
    ///
    /// `prev_id == 0` starts at the newest TODO; any other value returns only
    /// ids below it. A non-positive `size` falls back to [`DEFAULT_PAGE_SIZE`].
    #[instrument(skip(self, ctx))]
    pub async fn read_todos(
        &self,
        ctx: &RequestContext,
        prev_id: i64,
        size: i64,
    ) -> TodoResult<Vec<Todo>> {
        let before = (prev_id != 0).then_some(prev_id);
        let size = if size <= 0 { DEFAULT_PAGE_SIZE } else { size };

        ctx.ensure_active()?;
        self.repository.list_page(ctx, before, size as u64).await
    }

    /// Replace a TODO's subject and description
    #[instrument(skip(self, ctx, input), fields(todo_id = input.id))]
    pub async fn update_todo(&self, ctx: &RequestContext, input: UpdateTodo) -> TodoResult<Todo> {
        input
            .validate()
            .map_err(|e| TodoError::Validation(e.to_string()))?;

        ctx.ensure_active()?;
        self.repository
            .update(ctx, input.id, input.subject, input.description)
            .await?
            .ok_or(TodoError::NotFound(input.id))
    }

    /// Delete TODOs by id. Unknown ids are ignored.
    #[instrument(skip(self, ctx, ids), fields(count = ids.len()))]
    pub async fn delete_todos(&self, ctx: &RequestContext, ids: Vec<i64>) -> TodoResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        ctx.ensure_active()?;
        let removed = self.repository.delete_many(ctx, &ids).await?;
        tracing::debug!(requested = ids.len(), removed, "Delete finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockTodoRepository;
    use chrono::Utc;

    fn todo(id: i64, subject: &str) -> Todo {
        let now = Utc::now();
        Todo {
            id,
            subject: subject.to_string(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_todo_passes_fields_through() {
        let mut mock_repo = MockTodoRepository::new();
        mock_repo
            .expect_create()
            .withf(|_, subject, description| subject == "buy milk" && description == "2l")
            .times(1)
            .returning(|_, subject, _| Ok(todo(1, &subject)));

        let service = TodoService::new(mock_repo);
        let ctx = service.context();
        let created = service
            .create_todo(
                &ctx,
                CreateTodo {
                    subject: "buy milk".into(),
                    description: "2l".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.subject, "buy milk");
    }

    #[tokio::test]
    async fn test_create_todo_rejects_empty_subject() {
        let mut mock_repo = MockTodoRepository::new();
        mock_repo.expect_create().never();

        let service = TodoService::new(mock_repo);
        let ctx = service.context();
        let err = service
            .create_todo(
                &ctx,
                CreateTodo {
                    subject: String::new(),
                    description: String::new(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TodoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_read_todos_defaults() {
        let mut mock_repo = MockTodoRepository::new();
        mock_repo
            .expect_list_page()
            .withf(|_, before, limit| before.is_none() && *limit == 10)
            .times(2)
            .returning(|_, _, _| Ok(vec![]));

        let service = TodoService::new(mock_repo);
        let ctx = service.context();

        assert!(service.read_todos(&ctx, 0, 0).await.unwrap().is_empty());
        assert!(service.read_todos(&ctx, 0, -5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_todos_with_cursor() {
        let mut mock_repo = MockTodoRepository::new();
        mock_repo
            .expect_list_page()
            .withf(|_, before, limit| *before == Some(4) && *limit == 2)
            .times(1)
            .returning(|_, _, _| Ok(vec![todo(3, "c"), todo(2, "b")]));

        let service = TodoService::new(mock_repo);
        let ctx = service.context();
        let page = service.read_todos(&ctx, 4, 2).await.unwrap();

        assert_eq!(page.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 2]);
    }

    #[tokio::test]
    async fn test_update_missing_todo_is_not_found() {
        let mut mock_repo = MockTodoRepository::new();
        mock_repo
            .expect_update()
            .withf(|_, id, _, _| *id == 7)
            .returning(|_, _, _, _| Ok(None));

        let service = TodoService::new(mock_repo);
        let ctx = service.context();
        let err = service
            .update_todo(
                &ctx,
                UpdateTodo {
                    id: 7,
                    subject: "x".into(),
                    description: String::new(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TodoError::NotFound(7)));
    }

    #[tokio::test]
    async fn test_update_rejects_zero_id() {
        let mut mock_repo = MockTodoRepository::new();
        mock_repo.expect_update().never();

        let service = TodoService::new(mock_repo);
        let ctx = service.context();
        let err = service
            .update_todo(
                &ctx,
                UpdateTodo {
                    id: 0,
                    subject: "x".into(),
                    description: String::new(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TodoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_empty_ids_skips_repository() {
        let mut mock_repo = MockTodoRepository::new();
        mock_repo.expect_delete_many().never();

        let service = TodoService::new(mock_repo);
        let ctx = service.context();
        service.delete_todos(&ctx, vec![]).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_todos_forwards_ids() {
        let mut mock_repo = MockTodoRepository::new();
        mock_repo
            .expect_delete_many()
            .withf(|_, ids| ids.to_vec() == vec![1, 2, 99])
            .times(1)
            .returning(|_, _| Ok(2));

        let service = TodoService::new(mock_repo);
        let ctx = service.context();
        service.delete_todos(&ctx, vec![1, 2, 99]).await.unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_context_never_reaches_repository() {
        let mut mock_repo = MockTodoRepository::new();
        mock_repo.expect_list_page().never();
        mock_repo.expect_create().never();

        let service = TodoService::new(mock_repo);
        let ctx = service.context();
        ctx.cancel();

        let err = service.read_todos(&ctx, 0, 0).await.unwrap_err();
        assert!(matches!(err, TodoError::Cancelled(_)));

        let err = service
            .create_todo(
                &ctx,
                CreateTodo {
                    subject: "late".into(),
                    description: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::Cancelled(_)));
    }

    #[tokio::test]
    async fn test_context_carries_request_timeout() {
        let service = TodoService::new(MockTodoRepository::new())
            .with_request_timeout(Duration::from_secs(5));
        assert!(service.context().deadline().is_some());

        let service = TodoService::new(MockTodoRepository::new());
        assert!(service.context().deadline().is_none());
    }
}
