use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use axum_helpers::{
    ValidatedJson,
    errors::handlers::method_not_allowed,
    errors::responses::{
        BadRequestQueryResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        MethodNotAllowedResponse, NotFoundResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{TodoError, TodoResult};
use crate::models::{
    CreateTodo, DeleteTodos, DeleteTodosResponse, ReadTodosQuery, Todo, TodoResponse,
    TodosResponse, UpdateTodo,
};
use crate::repository::TodoRepository;
use crate::service::TodoService;

pub const TAG: &str = "todos";

/// OpenAPI documentation for the Todos API
#[derive(OpenApi)]
#[openapi(
    paths(read_todos, create_todo, update_todo, delete_todos),
    components(
        schemas(
            Todo,
            CreateTodo,
            UpdateTodo,
            DeleteTodos,
            TodoResponse,
            TodosResponse,
            DeleteTodosResponse
        ),
        responses(
            BadRequestValidationResponse,
            BadRequestQueryResponse,
            NotFoundResponse,
            MethodNotAllowedResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = TAG, description = "TODO management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the todos router.
///
/// Every verb is served on the collection root; anything other than
/// GET/POST/PUT/DELETE is answered with a structured 405.
pub fn router<R: TodoRepository + 'static>(service: TodoService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(read_todos)
                .post(create_todo)
                .put(update_todo)
                .delete(delete_todos)
                .fallback(method_not_allowed),
        )
        .with_state(shared_service)
}

/// Read one page of TODOs, newest first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ReadTodosQuery),
    responses(
        (status = 200, description = "Page of TODOs", body = TodosResponse),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn read_todos<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> TodoResult<Json<TodosResponse>> {
    let Query(pairs) = query.map_err(|e| TodoError::Validation(e.body_text()))?;
    let (prev_id, size) = ReadTodosQuery::from_pairs(pairs).parse()?;

    let ctx = service.context();
    let todos = service.read_todos(&ctx, prev_id, size).await?;
    Ok(Json(TodosResponse { todos }))
}

/// Create a TODO
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateTodo,
    responses(
        (status = 200, description = "TODO created", body = TodoResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateTodo>,
) -> TodoResult<Json<TodoResponse>> {
    let ctx = service.context();
    let todo = service.create_todo(&ctx, input).await?;
    Ok(Json(TodoResponse { todo }))
}

/// Replace a TODO's subject and description
#[utoipa::path(
    put,
    path = "",
    tag = TAG,
    request_body = UpdateTodo,
    responses(
        (status = 200, description = "TODO updated", body = TodoResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn update_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    ValidatedJson(input): ValidatedJson<UpdateTodo>,
) -> TodoResult<Json<TodoResponse>> {
    let ctx = service.context();
    let todo = service.update_todo(&ctx, input).await?;
    Ok(Json(TodoResponse { todo }))
}

/// Delete TODOs by id; unknown ids are ignored
#[utoipa::path(
    delete,
    path = "",
    tag = TAG,
    request_body = DeleteTodos,
    responses(
        (status = 200, description = "TODOs deleted", body = DeleteTodosResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn delete_todos<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    ValidatedJson(input): ValidatedJson<DeleteTodos>,
) -> TodoResult<Json<DeleteTodosResponse>> {
    let ctx = service.context();
    service.delete_todos(&ctx, input.ids).await?;
    Ok(Json(DeleteTodosResponse {}))
}
