use std::net::SocketAddr;

use axum::middleware;
use tokio::net::TcpListener;

use backend::shared::{config, data::db};
use backend::state::AppState;
use backend::{routes, system};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = config::load_config()?;
    let db_path = config::get_database_path(&config)?;
    let conn = db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    let app = routes::configure_routes(AppState::new(conn), config.import.max_upload_bytes)
        .layer(middleware::from_fn(system::middleware::request_logger))
        .layer(system::middleware::cors_layer(&config.cors));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("HRManager API listening on http://{}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
