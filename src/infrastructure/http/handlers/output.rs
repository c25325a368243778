//! Output HTTP Handlers - 语音生成与结果管理

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::application::ports::OutputListItem;
use crate::application::{
    DeleteOutput, GenerateSpeech, ListOutputs, ListProjectOutputs,
};
use crate::infrastructure::http::dto::{ApiResponse, Empty, Pagination};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::handlers::project::PageQuery;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    pub voice_id: Option<String>,
    pub project_id: Uuid,
    pub exaggeration: f32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct OutputResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub project_title: Option<String>,
    pub voice_id: String,
    pub voice_name: Option<String>,
    pub text: String,
    pub exaggeration: f32,
    pub temperature: f32,
    pub created_at: String,
}

impl From<OutputListItem> for OutputResponse {
    fn from(item: OutputListItem) -> Self {
        Self {
            id: item.id,
            project_id: item.project_id,
            project_title: item.project_title,
            voice_id: item.voice_id,
            voice_name: item.voice_name,
            text: item.text,
            exaggeration: item.exaggeration,
            temperature: item.temperature,
            created_at: item.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OutputListResponse {
    pub outputs: Vec<OutputResponse>,
    pub pagination: Pagination,
}

// ============================================================================
// Handlers
// ============================================================================

/// 生成语音并直接返回 WAV 字节
pub async fn generate_tts(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TtsRequest>,
) -> Result<Response, ApiError> {
    let result = state
        .generate_speech_handler
        .handle(GenerateSpeech {
            project_id: req.project_id,
            voice_id: req.voice_id,
            text: req.text,
            exaggeration: req.exaggeration,
            temperature: req.temperature,
        })
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::CONTENT_LENGTH, result.audio.len())
        .header("X-Output-Id", result.output.id.to_string())
        .body(Body::from(result.audio))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// 分页获取全部生成结果
pub async fn list_outputs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<OutputListResponse>>, ApiError> {
    let page = state
        .list_outputs_handler
        .handle(ListOutputs {
            page: query.page(),
            limit: query.limit(),
        })
        .await?;

    Ok(Json(ApiResponse::success(OutputListResponse {
        outputs: page.outputs.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page.total, page.page, page.limit),
    })))
}

/// 分页获取指定项目的生成结果
pub async fn list_project_outputs(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<OutputListResponse>>, ApiError> {
    let page = state
        .list_project_outputs_handler
        .handle(ListProjectOutputs {
            project_id,
            page: query.page(),
            limit: query.limit(),
        })
        .await?;

    Ok(Json(ApiResponse::success(OutputListResponse {
        outputs: page.outputs.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page.total, page.page, page.limit),
    })))
}

/// 删除生成结果（音频与波形图一并删除）
pub async fn delete_output(
    State(state): State<Arc<AppState>>,
    Path(output_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_output_handler
        .handle(DeleteOutput { output_id })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 下载生成的音频
pub async fn download_output_audio(
    State(state): State<Arc<AppState>>,
    Path(output_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let output = state
        .output_repo
        .find_by_id(output_id)
        .await
        .map_err(|e| ApiError::Internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::NotFound(format!("Output not found: {}", output_id)))?;

    let audio_path = state
        .media_storage
        .output_audio_path(output.project_id, output.id);
    let file = tokio::fs::File::open(&audio_path)
        .await
        .map_err(|_| ApiError::NotFound(format!("Output audio file not found: {}", output_id)))?;

    let metadata = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get file metadata: {}", e)))?;

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::CONTENT_LENGTH, metadata.len())
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// 下载生成音频的波形图
pub async fn download_output_waveform(
    State(state): State<Arc<AppState>>,
    Path(output_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let output = state
        .output_repo
        .find_by_id(output_id)
        .await
        .map_err(|e| ApiError::Internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::NotFound(format!("Output not found: {}", output_id)))?;

    let waveform_path = state
        .media_storage
        .output_waveform_path(output.project_id, output.id);
    let file = tokio::fs::File::open(&waveform_path)
        .await
        .map_err(|_| ApiError::NotFound(format!("Waveform not found: {}", output_id)))?;

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}
