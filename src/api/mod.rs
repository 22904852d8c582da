//! HTTP 接口层
//!
//! - `POST /learn`
//! - `GET /visualization/{*path}`
//! - `GET /notebook/{filename}`
//! - `GET /health`

pub mod handlers;
pub mod media;
pub mod state;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::error::AppError;
use crate::models::ErrorResponse;

pub use state::{AppState, SharedState};

/// 创建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/learn", post(handlers::learn))
        .route("/visualization/{*path}", get(handlers::get_visualization))
        .route("/notebook/{filename}", get(handlers::get_notebook))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(Arc::new(state))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!("请求失败 ({}): {}", status, self);
        }
        (status, Json(ErrorResponse { detail: self.to_string() })).into_response()
    }
}
