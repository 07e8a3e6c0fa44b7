//! HTTP server wiring for RecipeBox (API, handlers, static uploads, shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for recipe endpoints.
pub mod handlers;

pub use recipebox_core::{config, db, models, AppError, Config, Database, UploadStore, DEFAULT_PORT};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, put},
    Router,
};
use recipebox_core::UPLOADS_ROUTE;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub uploads: Arc<UploadStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// The upload store is rooted at `config.upload_dir`.
    pub fn new(config: Config, db: Database) -> Self {
        let uploads = UploadStore::new(config.upload_dir.as_str());
        Self {
            db: Arc::new(db),
            uploads: Arc::new(uploads),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
///
/// # Returns
/// Configured `axum::Router` serving the recipe API and `/uploads`.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    let body_limit = match state.config.max_upload_size {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route(
            "/api/recipes",
            get(handlers::recipe::list_recipes).post(handlers::recipe::create_recipe),
        )
        .route("/api/recipes/:id", delete(handlers::recipe::delete_recipe))
        .route("/api/recipes/:id/like", put(handlers::recipe::update_liked))
        .route(
            "/api/recipes/:id/favorite",
            put(handlers::recipe::update_favorited),
        )
        .nest_service(UPLOADS_ROUTE, ServeDir::new(state.uploads.dir()))
        .with_state(state.clone())
        .layer(
            tower::ServiceBuilder::new()
                .layer(body_limit)
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
}

/// Resolve the listener address from the `BIND` override and configured port.
///
/// # Returns
/// `BIND` when it parses as a socket address, otherwise `0.0.0.0:<port>`.
pub fn resolve_bind_address(config: &Config) -> SocketAddr {
    let default_bind = SocketAddr::from(([0, 0, 0, 0], config.port));
    match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    }
}

/// Run the Axum server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
