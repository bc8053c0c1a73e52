use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    context::RequestContext,
    entity,
    error::{TodoError, TodoResult},
    models::Todo,
    repository::TodoRepository,
};

/// PostgreSQL-backed [`TodoRepository`].
///
/// Ids come from the `BIGSERIAL` sequence, so they increase monotonically and
/// are never reused.
pub struct PgTodoRepository {
    db: DatabaseConnection,
}

impl PgTodoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(e: DbErr) -> TodoError {
    TodoError::Internal(format!("Database error: {}", e))
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn create(
        &self,
        ctx: &RequestContext,
        subject: String,
        description: String,
    ) -> TodoResult<Todo> {
        let now = Utc::now().fixed_offset();
        let active_model = entity::ActiveModel {
            id: NotSet,
            subject: Set(subject),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = ctx
            .run(async { active_model.insert(&self.db).await.map_err(db_error) })
            .await?;

        tracing::info!(todo_id = model.id, "Created todo");
        Ok(model.into())
    }

    async fn list_page(
        &self,
        ctx: &RequestContext,
        before: Option<i64>,
        limit: u64,
    ) -> TodoResult<Vec<Todo>> {
        let mut query = entity::Entity::find();

        if let Some(before) = before {
            query = query.filter(entity::Column::Id.lt(before));
        }

        let query = query.order_by_desc(entity::Column::Id).limit(limit);

        let models = ctx
            .run(async { query.all(&self.db).await.map_err(db_error) })
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        subject: String,
        description: String,
    ) -> TodoResult<Option<Todo>> {
        let updated = ctx
            .run(async {
                let Some(model) = entity::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(db_error)?
                else {
                    return Ok(None);
                };

                // updated_at never goes behind created_at, even with clock skew
                let now = Utc::now().fixed_offset().max(model.created_at);

                let mut active_model = model.into_active_model();
                active_model.subject = Set(subject);
                active_model.description = Set(description);
                active_model.updated_at = Set(now);

                match active_model.update(&self.db).await {
                    Ok(model) => Ok(Some(model)),
                    // Row deleted between the read and the write
                    Err(DbErr::RecordNotUpdated) => Ok(None),
                    Err(e) => Err(db_error(e)),
                }
            })
            .await?;

        if updated.is_some() {
            tracing::info!(todo_id = id, "Updated todo");
        }
        Ok(updated.map(Into::into))
    }

    async fn delete_many(&self, ctx: &RequestContext, ids: &[i64]) -> TodoResult<u64> {
        let result = ctx
            .run(async {
                entity::Entity::delete_many()
                    .filter(entity::Column::Id.is_in(ids.iter().copied()))
                    .exec(&self.db)
                    .await
                    .map_err(db_error)
            })
            .await?;

        tracing::info!(
            requested = ids.len(),
            removed = result.rows_affected,
            "Deleted todos"
        );
        Ok(result.rows_affected)
    }
}
