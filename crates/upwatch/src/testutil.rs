//! Shared helpers for tests that need a real store on disk.

use std::sync::Arc;

use tempfile::TempDir;

use crate::db::{self, LibsqlStore, Store};
use crate::pool::{LibsqlManager, LibsqlPool};

/// Build a migrated store backed by a temp libsql file. The TempDir must be
/// kept alive for the duration of the test.
pub(crate) async fn test_store() -> (TempDir, Arc<dyn Store>) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db_path = dir.path().join("test.db");

    let database = libsql::Builder::new_local(db_path.to_string_lossy().as_ref())
        .build()
        .await
        .expect("open libsql database");
    let manager = LibsqlManager::new(database);
    let pool: LibsqlPool =
        deadpool::managed::Pool::builder(manager).build().expect("build pool");

    let conn = pool.get().await.expect("get connection");
    db::initialize(&conn).await.expect("run migrations");
    drop(conn);

    (dir, Arc::new(LibsqlStore::new(pool)))
}
