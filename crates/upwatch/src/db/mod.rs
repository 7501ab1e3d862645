/// Persistence layer: monitored targets and their append-only check history,
/// stored in libsql (SQLite) behind the [`Store`] trait.
pub mod migrations;
pub mod models;
pub mod repository;

pub use repository::{LibsqlStore, Store};

use crate::error::Result;

/// Initialize database with schema
pub async fn initialize(conn: &libsql::Connection) -> Result<()> {
    migrations::run_migrations(conn).await
}
