//! Migration CLI for the todos schema, e.g. `cargo run -p migration -- up`.
//! Reads the target database from `DATABASE_URL`.

use migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
