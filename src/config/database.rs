//! Database configuration module for daybook.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Creation is idempotent and safe to run on every start.

use crate::entities::{FinanceRecordEntity, StudySessionEntity};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/daybook.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// returns the default local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Connects to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    tracing::debug!(%database_url, "connecting to record store");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the `finance_records` and `study_sessions` tables if they are missing.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut finance_table = schema.create_table_from_entity(FinanceRecordEntity);
    finance_table.if_not_exists();
    let mut study_table = schema.create_table_from_entity(StudySessionEntity);
    study_table.if_not_exists();

    db.execute(builder.build(&finance_table)).await?;
    db.execute(builder.build(&study_table)).await?;

    Ok(())
}
