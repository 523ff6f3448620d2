use super::docs::ApiDoc;
use super::error::ServerError;
use super::routes;
use super::state::ServerState;
use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub(super) fn build_router(state: Arc<ServerState>, cors_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route("/", get(routes::health::health_handler))
        .route("/capabilities", get(routes::capabilities::capabilities_handler))
        .route("/chat", post(routes::chat::chat_handler))
        .route("/tools/call", post(routes::tools::call_tool_handler))
        .route("/resources/read", post(routes::resources::read_resource_handler))
        .route("/users", get(routes::users::users_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub(super) async fn serve<F>(
    state: Arc<ServerState>,
    addr: SocketAddr,
    cors_origins: &[String],
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(%addr, "Binding REST server");
    let app = build_router(state, cors_origins);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "REST server ready to accept connections");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}
