use sea_orm_migration::prelude::*;

/// Standalone migration CLI (`cargo run -p migration -- up`).
/// The server also applies pending migrations on startup.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(migration::Migrator).await;
}
