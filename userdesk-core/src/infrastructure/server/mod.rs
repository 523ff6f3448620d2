//! REST gateway exposing the backend session and the tool loop over HTTP.

mod docs;
mod dto;
mod error;
mod router;
mod routes;
mod state;

pub use error::ServerError;
pub use state::{AppContext, ServerState};

use crate::config::AppConfig;
use crate::model::ProviderFactory;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// The gateway's routes, Swagger UI and CORS layer over `state`.
pub fn router(state: Arc<ServerState>, cors_origins: &[String]) -> Router {
    router::build_router(state, cors_origins)
}

/// Serves an already-built state until `shutdown` resolves.
pub async fn serve<F>(
    state: Arc<ServerState>,
    addr: SocketAddr,
    cors_origins: &[String],
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    router::serve(state, addr, cors_origins, shutdown).await
}

/// Opens the backend session, serves until ctrl-c, then closes the session.
pub async fn run_gateway(config: &AppConfig) -> Result<(), ServerError> {
    let addr: SocketAddr = config.rest.bind.parse().map_err(|source| ServerError::Address {
        addr: config.rest.bind.clone(),
        source,
    })?;
    let provider = ProviderFactory::create(config.active_provider()?);

    let context = AppContext::connect(config, provider).await?;
    let session = Arc::clone(context.session());
    info!(%addr, tools = context.tools().len(), "Backend session established");

    let state = Arc::new(ServerState::new(context));
    let result = serve(state, addr, &config.rest.cors_origins, shutdown_signal()).await;

    session.close().await;
    match &result {
        Ok(()) => info!("REST gateway stopped"),
        Err(err) => error!(%err, "REST gateway stopped with error"),
    }
    result
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
