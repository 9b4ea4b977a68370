//! HTTP server bootstrap.

use crate::config::ServerConfig;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use shelternet_api::configure_routes;
use shelternet_db::ShelterDb;
use tracing::info;

/// Open the database and serve the API until the process is stopped.
pub async fn run(config: ServerConfig) -> Result<()> {
    let auth = config
        .auth_settings()
        .context("Staff credentials are not configured")?;

    let db = ShelterDb::open(&config.database.url)
        .await
        .with_context(|| format!("Failed to open database: {}", config.database.url))?;

    info!("Starting Shelternet server");
    info!("  Bind: {}", config.server.bind);
    info!("  Database: {}", config.database.url);
    info!("  Staff user: {}", auth.username());

    let db_data = web::Data::new(db.clone());
    let auth_data = web::Data::new(auth);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(db_data.clone())
            .app_data(auth_data.clone())
            .configure(configure_routes)
    })
    .bind(&config.server.bind)
    .with_context(|| format!("Failed to bind {}", config.server.bind))?;

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server.run().await.context("HTTP server failed")?;

    info!("Server stopped");
    db.close().await;
    Ok(())
}

/// Create the schema without starting the server.
pub async fn init_db(config: &ServerConfig) -> Result<()> {
    let db = ShelterDb::open(&config.database.url)
        .await
        .with_context(|| format!("Failed to open database: {}", config.database.url))?;
    info!(database = %config.database.url, "Database schema ready");
    db.close().await;
    Ok(())
}
