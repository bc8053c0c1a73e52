//! Database connection cleanup for graceful shutdown.

use tracing::{error, info};

/// Close a PostgreSQL connection pool (SeaORM).
///
/// `DatabaseConnection` also closes on drop; closing explicitly gets the
/// outcome into the logs before the process exits.
pub async fn close_postgres(db: sea_orm::DatabaseConnection, name: &str) {
    match db.close().await {
        Ok(_) => info!("PostgreSQL connection '{}' closed successfully", name),
        Err(e) => error!("Error closing PostgreSQL connection '{}': {}", name, e),
    }
}
