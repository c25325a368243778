//! Import HTTP Handlers - voice pack 批量导入
//!
//! 状态机: idle → parsing → confirming → uploading → done | error
//! parsing 在上传请求内同步完成；confirming 是人工确认暂停点；
//! confirm 请求内执行串行上传循环，进度可通过状态接口轮询。

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{CreatedVoice, ImportProgress};
use crate::application::{
    BeginPackImport, ConfirmPackImport, DiscardPackImport, GetImportStatus,
};
use crate::infrastructure::http::dto::{ApiResponse, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PackUploadResponse {
    pub session_id: Uuid,
    pub state: String,
    pub version: Option<String>,
    pub author: Option<String>,
    pub repository: Option<String>,
    pub voice_count: usize,
}

#[derive(Debug, Serialize)]
pub struct PackConfirmResponse {
    pub session_id: Uuid,
    pub created: Vec<CreatedVoice>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PackStatusResponse {
    pub session_id: Uuid,
    pub state: String,
    pub progress: ImportProgress,
    pub skipped: Vec<String>,
    pub error: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 上传 voice pack 压缩包并解析（multipart: file）
pub async fn upload_voice_pack(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<PackUploadResponse>>, ApiError> {
    let mut archive: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name().unwrap_or_default() != "file" {
            continue;
        }

        let is_zip = field
            .file_name()
            .map(|f| f.to_lowercase().ends_with(".zip"))
            .unwrap_or(true);
        if !is_zip {
            return Err(ApiError::BadRequest(
                "Please select a .zip file.".to_string(),
            ));
        }

        archive = Some(
            field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
                .to_vec(),
        );
    }

    let archive = archive
        .ok_or_else(|| ApiError::BadRequest("Voice pack file is required".to_string()))?;

    let parsed = state
        .begin_pack_import_handler
        .handle(BeginPackImport { archive })
        .await?;

    Ok(Json(ApiResponse::success(PackUploadResponse {
        session_id: parsed.session_id,
        state: parsed.state.as_str().to_string(),
        version: parsed.version,
        author: parsed.author,
        repository: parsed.repository,
        voice_count: parsed.voice_count,
    })))
}

/// 确认导入，执行上传循环
pub async fn confirm_voice_pack(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<PackConfirmResponse>>, ApiError> {
    let result = state
        .confirm_pack_import_handler
        .handle(ConfirmPackImport { session_id })
        .await?;

    Ok(Json(ApiResponse::success(PackConfirmResponse {
        session_id: result.session_id,
        created: result.created,
        skipped: result.skipped,
    })))
}

/// 丢弃待确认的导入会话
pub async fn discard_voice_pack(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .discard_pack_import_handler
        .handle(DiscardPackImport { session_id })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 查询导入状态与进度
pub async fn get_voice_pack_status(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<PackStatusResponse>>, ApiError> {
    let status = state
        .get_import_status_handler
        .handle(GetImportStatus { session_id })
        .await?;

    Ok(Json(ApiResponse::success(PackStatusResponse {
        session_id: status.session_id,
        state: status.state.as_str().to_string(),
        progress: status.progress,
        skipped: status.skipped,
        error: status.error,
    })))
}
