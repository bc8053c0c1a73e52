use axum_helpers::HealthzResponse;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todos API",
        version = "0.1.0",
        description = "TODO items with cursor pagination"
    ),
    paths(
        axum_helpers::server::health::healthz_handler,
        crate::api::health::ready_handler,
    ),
    components(schemas(HealthzResponse)),
    nest(
        (path = "/todos", api = domain_todos::handlers::ApiDoc)
    ),
    tags(
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
