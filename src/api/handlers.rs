use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::api::media::{join_within, serve_file};
use crate::api::state::SharedState;
use crate::error::{AppError, AppResult};
use crate::models::{HealthResponse, LearnRequest, LearnResponse};

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// `POST /learn`
pub async fn learn(
    State(state): State<SharedState>,
    body: Result<Json<LearnRequest>, JsonRejection>,
) -> AppResult<Json<LearnResponse>> {
    let Json(request) = body.map_err(|rejection| AppError::InvalidBody(rejection.body_text()))?;

    match state.processor.learn(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(e @ (AppError::BadRequest(_) | AppError::Generation(_))) => Err(e),
        Err(e) => {
            error!("❌ /learn 处理失败: {}", e);
            Err(AppError::Generation(format!("Error processing request: {}", e)))
        }
    }
}

/// `GET /visualization/{*path}`
pub async fn get_visualization(
    State(state): State<SharedState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let not_found = || AppError::NotFound("Visualization file not found".to_string());

    let full_path = join_within(&state.visualizations_dir, &path).ok_or_else(not_found)?;
    match tokio::fs::metadata(&full_path).await {
        Ok(metadata) if metadata.is_file() => {}
        _ => return Err(not_found()),
    }

    if !path.to_ascii_lowercase().ends_with(".mp4") {
        return Err(AppError::BadRequest("File is not an MP4 video".to_string()));
    }

    let download_name = full_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    info!("🎥 输出视频: {}", path);
    serve_file(&full_path, &headers, &download_name).await
}

/// `GET /notebook/{filename}`
pub async fn get_notebook(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let full_path = state.notebook_store.resolve(&filename)?;
    serve_file(&full_path, &headers, &filename).await.map_err(|e| match e {
        AppError::NotFound(_) => AppError::NotFound("Notebook file not found".to_string()),
        other => other,
    })
}

/// 兜底路由
pub async fn not_found() -> Response {
    AppError::NotFound("Not Found".to_string()).into_response()
}
