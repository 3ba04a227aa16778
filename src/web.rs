use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::extract::{ExtractError, ExtractionService};

#[derive(Clone)]
struct SharedState {
    service: Arc<ExtractionService>,
}

pub fn start_daemon(config: &Config, service: Arc<ExtractionService>) {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads as usize)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(async { start_app(config, service).await });
}

async fn start_app(config: &Config, service: Arc<ExtractionService>) {
    let state = Arc::new(SharedState { service });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .expect("failed to bind listener");
    log::info!("listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn router(state: Arc<SharedState>) -> Router {
    // Browser frontends call this service directly; any origin is fine,
    // origin policy lives at the deployment edge.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/extract-skills", post(extract_skills))
        .route("/health", get(health))
        .layer(cors)
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(state)
}

// Wraps `ExtractError` so axum knows how to turn it into a response.
#[derive(Debug)]
struct HttpError(ExtractError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        log::error!("{:?}", self.0);
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": self.0.to_string()}).to_string(),
        )
            .into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<ExtractError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractSkillsRequest {
    pub description: String,
}

async fn extract_skills(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<ExtractSkillsRequest>,
) -> Result<axum::Json<Vec<String>>, HttpError> {
    let service = state.service.clone();

    // Extraction is blocking CPU-bound work (the annotation pass dominates);
    // the runtime's worker thread count bounds how many run at once.
    tokio::task::block_in_place(move || {
        service
            .extract(&payload.description)
            .map(Json)
            .map_err(Into::into)
    })
}

async fn health() -> axum::Json<serde_json::Value> {
    Json(json!({"status": "healthy"}))
}

#[cfg(test)]
pub(crate) fn test_router(service: Arc<ExtractionService>) -> Router {
    router(Arc::new(SharedState { service }))
}
