//! HTTP server assembly.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::service::AircraftService;
use crate::storage::{RecordStoreClient, StoreHandle};
use crate::upload::UploadDir;
use crate::{api, ui};

/// Build the aircraft service described by the configuration.
///
/// The document store is opened on the first request, not here.
#[must_use]
pub fn build_service(config: &Config) -> AircraftService {
    let handle = Arc::new(StoreHandle::new(config.database_path()));
    let client = RecordStoreClient::new(handle, config.storage.collection.clone());
    let uploads = UploadDir::new(config.uploads_dir(), config.uploads.url_prefix.clone());
    AircraftService::new(client, uploads)
}

/// Build the full application router: UI pages, JSON API and stored images.
pub fn router(service: AircraftService, max_body_bytes: usize) -> Router {
    let url_prefix = service.uploads().url_prefix().to_string();
    Router::new()
        .merge(ui::routes())
        .merge(api::routes(&url_prefix))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(Arc::new(service))
}

/// Bind the configured address and serve until the process is stopped.
///
/// # Errors
///
/// Returns an error if the address is invalid, cannot be bound, or the
/// server fails.
pub async fn run(config: &Config) -> Result<()> {
    let addr = config.listen_addr()?;
    let service = build_service(config);
    info!(
        "Database: {}, uploads: {}",
        config.database_path().display(),
        service.uploads().root().display()
    );

    let app = router(service, config.server.max_body_bytes);
    let listener = TcpListener::bind(addr).await?;
    info!("Aircraft registry listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::Io)?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
