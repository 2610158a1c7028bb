//! Web UI shell: an HTML form plus a small JSON API over one shared classifier.

mod error;
pub mod page;
mod routes;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;

use crate::classifier::Classifier;

pub use error::ApiError;
pub use page::EXAMPLE_TEXTS;
pub use routes::{HealthResponse, PredictRequest, PredictResponse};

/// Shared request state: the frozen classifier and the inference queue.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    queue: Arc<Semaphore>,
}

impl AppState {
    /// `max_concurrency` inferences run at once; later requests wait for a slot.
    pub fn new(classifier: Arc<Classifier>, max_concurrency: usize) -> Self {
        Self {
            classifier,
            queue: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }
}

/// Construct the router with all endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index).post(routes::submit))
        .route("/api/predict", post(routes::api_predict))
        .route("/api/examples", get(routes::api_examples))
        .route("/health", get(routes::health))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    log::info!("{} {} -> {} ({:.2?})", method, path, response.status(), started.elapsed());
    response
}

/// Serves the UI on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
