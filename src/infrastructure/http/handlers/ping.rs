//! Ping / Init Handlers
//!
//! 存活与就绪探针

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Ping endpoint - 健康检查
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Init endpoint - 就绪检查（确认数据库可应答）
pub async fn init(State(state): State<Arc<AppState>>) -> Result<Json<PingResponse>, ApiError> {
    state
        .project_repo
        .count_active()
        .await
        .map_err(|e| ApiError::Internal(format!("Database initialization failed: {}", e)))?;

    Ok(Json(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
