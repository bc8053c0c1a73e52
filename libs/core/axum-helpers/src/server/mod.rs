//! Server infrastructure module.
//!
//! This module provides:
//! - Router assembly with the OpenAPI document and a structured 404 fallback
//! - Health and readiness helpers
//! - Graceful shutdown coordination with bounded cleanup
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let app = create_router::<ApiDoc>(api_routes).merge(health_router());
//! create_production_app(app, &server_config, async move { close_postgres(db, "main").await })
//!     .await?;
//! ```

pub mod app;
pub mod cleanup;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use cleanup::close_postgres;
pub use health::{
    HealthCheckFuture, HealthzResponse, health_router, healthz_handler, run_health_checks,
};
pub use shutdown::ShutdownCoordinator;
