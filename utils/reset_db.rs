use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use std::env;

use pizzatron::services::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://pizzatron.db?mode=rwc".to_string());

    let db = Database::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    // Drops every table and re-runs all migrations
    Migrator::fresh(&db).await?;

    Store::new(db).initialize().await?;
    println!("Database reset successfully");
    Ok(())
}
