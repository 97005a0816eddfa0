//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions with `Schema::create_table_from_entity`, so the
//! schema always matches the Rust structs without hand-written SQL.

use crate::config::settings::Settings;
use crate::entities::{
    AuditLog, DocCounter, Order, OrderLineItem, Product, WzDocument, WzLineItem,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

/// Fallback database location, created on first use.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/wz_tracker.sqlite?mode=rwc";

/// Resolves the database URL: `DATABASE_URL`, then the settings file, then the default.
#[must_use]
pub fn get_database_url(settings: &Settings) -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| settings.database.url.clone())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `url`.
///
/// # Errors
/// Returns an error if the connection cannot be opened.
pub async fn create_connection(url: &str) -> Result<DatabaseConnection> {
    Database::connect(url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
///
/// # Errors
/// Returns an error if a `CREATE TABLE` statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Product).await?;
    create_table(db, Order).await?;
    create_table(db, OrderLineItem).await?;
    create_table(db, WzDocument).await?;
    create_table(db, WzLineItem).await?;
    create_table(db, DocCounter).await?;
    create_table(db, AuditLog).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}
