//! HTTP server wiring for Picopaste (routes, handlers, and shared state).

/// Client origin resolution.
pub mod client;
/// HTTP error mapping for handlers.
pub mod error;
/// HTTP handlers for pastes and static assets.
pub mod handlers;
/// HTML page rendering.
pub mod render;

pub use picopaste_core::{
    config, db, models, AppError, ClientKey, Config, Database, DedupMode, PasteId, PasteService,
    DEFAULT_PORT,
};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; script-src 'self'; style-src 'self'; \
connect-src 'self'; frame-ancestors 'none'; base-uri 'self'";

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PasteService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state over an open database.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Open database handle.
    ///
    /// # Returns
    /// A new [`AppState`].
    pub fn new(config: Config, db: Database) -> Self {
        let service = PasteService::new(Arc::new(db), &config);
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}

/// Resolve the listener address from an optional `PICOPASTE_BIND` value.
///
/// Invalid overrides are logged and ignored.
///
/// # Returns
/// The override when it parses, otherwise all interfaces on `config.port`.
pub fn resolve_bind_address_from(config: &Config, bind_override: Option<&str>) -> SocketAddr {
    let default_bind = SocketAddr::from(([0, 0, 0, 0], config.port));
    match bind_override {
        Some(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid PICOPASTE_BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        None => default_bind,
    }
}

/// Resolve the listener address from the environment.
pub fn resolve_bind_address(config: &Config) -> SocketAddr {
    let bind_override = std::env::var("PICOPASTE_BIND").ok();
    resolve_bind_address_from(config, bind_override.as_deref())
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
///
/// # Returns
/// Configured `axum::Router`.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::paste::index))
        .route("/paste", post(handlers::paste::submit_paste))
        .route("/raw/:id", get(handlers::paste::raw_paste))
        .route("/public/style.css", get(handlers::assets::style_css))
        .route("/public/app.js", get(handlers::assets::app_js))
        .route("/:id", get(handlers::paste::view_paste))
        .with_state(state.clone())
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(state.config.max_paste_size))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    HeaderValue::from_static(CONTENT_SECURITY_POLICY),
                )),
        )
}

/// Run the Axum server with graceful shutdown support.
///
/// Peer addresses are attached to each request for admission control.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await
}
