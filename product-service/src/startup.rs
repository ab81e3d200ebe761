use crate::config::ProductConfig;
use crate::error::panic_response;
use crate::handlers;
use crate::services::{MongoDb, MongoProductStore, ProductStore};
use axum::{middleware::from_fn, routing::get, Router};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{http_trace_layer, metrics_middleware, request_id_middleware};
use service_core::shutdown::shutdown_signal;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;

/// Shared application state. The store is the only thing requests share.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::greeting))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/",
            get(handlers::missing_product_id)
                .delete(handlers::missing_product_id)
                .patch(handlers::missing_product_id),
        )
        .route(
            "/products/:id",
            get(handlers::get_product)
                .delete(handlers::delete_product)
                .patch(handlers::update_product),
        )
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(metrics_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connect to MongoDB and bind the listener. A database that cannot be
    /// reached fails the build; the service never starts without storage.
    pub async fn build(config: ProductConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(
            config.database.url.expose_secret(),
            &config.database.name,
            &config.database.app_name,
        )
        .await?;
        db.initialize_indexes(&config.database.collection).await?;

        let store = Arc::new(MongoProductStore::new(&db, &config.database.collection));

        Self::build_with_store(config, store).await
    }

    /// Bind the listener over an already constructed store. Port 0 picks a
    /// free port.
    pub async fn build_with_store(
        config: ProductConfig,
        store: Arc<dyn ProductStore>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state: AppState::new(store),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!("Server is running on http://localhost:{}", self.port);

        axum::serve(self.listener, build_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
