#![warn(clippy::all, clippy::pedantic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use upwatch::Config;
use upwatch::db::{self, LibsqlStore};
use upwatch::location;
use upwatch::pool::{LibsqlManager, LibsqlPool};

mod error;
mod routes;
mod state;

use error::AppError;
use state::AppState;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    logger::init();

    let config = Config::from_config(std::env::var_os("UPWATCH_CONFIG"))?;

    let database = libsql::Builder::new_local(&config.database.path).build().await?;
    let manager = LibsqlManager::new(database);
    let pool: LibsqlPool = deadpool::managed::Pool::builder(manager).build()?;

    let conn = pool.get().await?;
    db::initialize(&conn).await?;
    drop(conn);

    // One-off checks report their origin too, so the server keeps its own
    // copy of the location label fresh.
    location::set_refresh_interval(Duration::from_secs(
        config.monitor.location_refresh_seconds.max(60),
    ));
    location::refresh();

    let store = Arc::new(LibsqlStore::new(pool));
    let state = AppState::new(store, config.monitor.timeout_seconds)?;

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    run_server(addr, state).await
}

async fn run_server(addr: SocketAddr, state: AppState) -> Result<(), AppError> {
    tracing::info!(%addr, "Starting upwatch server");

    let data = web::Data::new(state);
    HttpServer::new(move || App::new().app_data(data.clone()).configure(routes::routes))
        .bind(addr)?
        .run()
        .await?;

    Ok(())
}
