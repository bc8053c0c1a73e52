use axum::Router;
use domain_todos::{PgTodoRepository, TodoService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgTodoRepository::new(state.db.clone());
    let service =
        TodoService::new(repository).with_request_timeout(state.config.server.request_timeout);
    handlers::router(service)
}
