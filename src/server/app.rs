use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use axum::{extract::FromRef, routing::get, Json, Router};
use prometheus::{Encoder, TextEncoder};
use routes::{category_router, questions_router, quizzes_router};
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::AppError;
use super::routes;
use crate::config::Settings;
use crate::quiz::QuizRng;

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub per_page: u32,
}

impl Pagination {
    /// SQL `(limit, offset)` for a 1-based page number.
    pub fn limit_offset(self, page: i64) -> (i64, i64) {
        let limit = i64::from(self.per_page);
        (limit, (page - 1).max(0).saturating_mul(limit))
    }
}

#[derive(FromRef, Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub pagination: Pagination,
    pub rng: QuizRng,
}

impl AppState {
    pub fn new(pool: SqlitePool, settings: &Settings) -> Self {
        AppState {
            pool,
            pagination: Pagination {
                per_page: settings.questions_per_page,
            },
            rng: QuizRng::new(settings.quiz_seed),
        }
    }
}

pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .merge(category_router())
        .merge(questions_router())
        .merge(quizzes_router())
        .fallback(|| async {
            tracing::info!("Fallback");
            AppError::NotFound("resource not found".into())
        })
        .method_not_allowed_fallback(|| async { AppError::MethodNotAllowed })
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub async fn run_server(pool: SqlitePool, settings: Settings) -> anyhow::Result<()> {
    let addr = settings.address();
    let state = AppState::new(pool, &settings);
    let app = build_router(state, &settings.cors_origins());

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Serving on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn metrics() -> Result<Response, StatusCode> {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    encoder.encode(&metrics, &mut buf).map_err(|err| {
        tracing::error!(error = %err, "Failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(Body::from(buf))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
