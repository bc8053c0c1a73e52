//! Shared application state.

use database::postgres::DatabaseConnection;

/// Cloned into the readiness router and used to build the domain services.
/// Both fields are cheap to clone (the connection is a shared pool handle).
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: DatabaseConnection,
}
