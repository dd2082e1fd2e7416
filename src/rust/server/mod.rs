//! The HTTP surface: four routes over a shared [`AppContext`].

mod error;
mod export;
mod handlers;
mod views;

pub use error::{ApiError, ApiResult};
pub use export::{records_to_csv, CSV_HEADER};
pub use handlers::{AnalyzeRequest, AnalyzeResponse, CSV_FILENAME};
pub use views::Views;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;

use crate::classifier::SentimentModel;
use crate::store::SentimentStore;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Everything a request handler needs. Built once at startup and cloned
/// cheaply into each request.
#[derive(Clone)]
pub struct AppContext {
    pub classifier: Arc<dyn SentimentModel>,
    pub store: Arc<dyn SentimentStore>,
    pub views: Arc<Views>,
}

impl AppContext {
    pub fn new(
        classifier: Arc<dyn SentimentModel>,
        store: Arc<dyn SentimentStore>,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            classifier,
            store,
            views: Arc::new(Views::new()?),
        })
    }
}

pub fn router(context: AppContext) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/analyze", post(handlers::analyze))
        .route("/records", get(handlers::records))
        .route("/download", get(handlers::download))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn(log_requests))
        .with_state(context)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    log::info!("{} {} -> {} ({:.2?})", method, path, response.status(), start.elapsed());
    response
}

/// Serves until Ctrl-C, then lets in-flight requests finish.
pub async fn serve(listener: TcpListener, context: AppContext) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(context))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received, draining connections");
}
