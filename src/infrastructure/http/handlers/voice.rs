//! Voice HTTP Handlers

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::application::ports::{VoiceRecord, VoiceUpdate};
use crate::application::{
    CreateVoice, DeleteVoice, GetVoice, ListVoices, UpdateVoice,
};
use crate::infrastructure::http::dto::{ApiResponse, Empty, Pagination};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub id: Uuid,
    pub name: String,
    pub notes: String,
    pub gender: Option<String>,
    pub is_favorite: bool,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<VoiceRecord> for VoiceResponse {
    fn from(record: VoiceRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            notes: record.notes,
            gender: record.gender,
            is_favorite: record.is_favorite,
            tags: record.tags,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VoiceListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoiceListResponse {
    pub voices: Vec<VoiceResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVoiceRequest {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub gender: Option<String>,
    pub is_favorite: Option<bool>,
    pub tags: Option<Vec<String>>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 创建音色（multipart: file, name, notes, gender, tags）
///
/// tags 为 JSON 数组字符串（与 pack 导入上传器的提交格式一致）
pub async fn create_voice(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<VoiceResponse>>, ApiError> {
    let mut name: Option<String> = None;
    let mut notes: Option<String> = None;
    let mut gender: Option<String> = None;
    let mut tags: Vec<String> = Vec::new();
    let mut file_name: Option<String> = None;
    let mut payload: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "name" => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read name: {}", e)))?,
                );
            }
            "notes" => {
                notes = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read notes: {}", e)))?,
                );
            }
            "gender" => {
                gender = Some(
                    field.text().await.map_err(|e| {
                        ApiError::BadRequest(format!("Failed to read gender: {}", e))
                    })?,
                );
            }
            "tags" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read tags: {}", e)))?;
                if !raw.is_empty() {
                    tags = serde_json::from_str(&raw).map_err(|_| {
                        ApiError::BadRequest("tags must be a JSON array of strings".to_string())
                    })?;
                }
            }
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                payload = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let (name, payload) = match (name, payload) {
        (Some(name), Some(payload)) if !name.is_empty() => (name, payload),
        _ => {
            return Err(ApiError::BadRequest(
                "Name and file are required".to_string(),
            ))
        }
    };

    let voice = state
        .create_voice_handler
        .handle(CreateVoice {
            name,
            notes: notes.unwrap_or_default(),
            gender: gender.filter(|g| !g.is_empty()),
            tags,
            file_name: file_name.unwrap_or_else(|| "voice.wav".to_string()),
            payload,
        })
        .await?;

    Ok(Json(ApiResponse::success(voice.into())))
}

/// 分页搜索音色列表
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VoiceListQuery>,
) -> Result<Json<ApiResponse<VoiceListResponse>>, ApiError> {
    let page = state
        .list_voices_handler
        .handle(ListVoices {
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(10),
            search: query.search.unwrap_or_default(),
        })
        .await?;

    Ok(Json(ApiResponse::success(VoiceListResponse {
        voices: page.voices.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page.total, page.page, page.limit),
    })))
}

/// 获取音色详情
pub async fn get_voice(
    State(state): State<Arc<AppState>>,
    Path(voice_id): Path<Uuid>,
) -> Result<Json<ApiResponse<VoiceResponse>>, ApiError> {
    let voice = state.get_voice_handler.handle(GetVoice { voice_id }).await?;

    Ok(Json(ApiResponse::success(voice.into())))
}

/// 部分更新音色
///
/// 固定字段集合 {name, notes, gender, is_favorite} + 可选 tags 整体替换
pub async fn update_voice(
    State(state): State<Arc<AppState>>,
    Path(voice_id): Path<Uuid>,
    Json(req): Json<UpdateVoiceRequest>,
) -> Result<Json<ApiResponse<VoiceResponse>>, ApiError> {
    let update = VoiceUpdate {
        name: req.name,
        notes: req.notes,
        gender: req.gender.map(Some),
        is_favorite: req.is_favorite,
        tags: req.tags,
    };

    let voice = state
        .update_voice_handler
        .handle(UpdateVoice { voice_id, update })
        .await?;

    Ok(Json(ApiResponse::success(voice.into())))
}

/// 删除音色（软删除）
pub async fn delete_voice(
    State(state): State<Arc<AppState>>,
    Path(voice_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_voice_handler
        .handle(DeleteVoice { voice_id })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 下载音色参考音频
pub async fn download_voice_audio(
    State(state): State<Arc<AppState>>,
    Path(voice_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let voice = state
        .voice_repo
        .find_by_id(voice_id)
        .await
        .map_err(|e| ApiError::Internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::NotFound(format!("Voice not found: {}", voice_id)))?;

    let audio_path = state.media_storage.voice_audio_path(voice.id);
    if !audio_path.exists() {
        return Err(ApiError::NotFound(format!(
            "Voice audio file not found: {}",
            voice_id
        )));
    }

    let file = tokio::fs::File::open(&audio_path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to open audio file: {}", e)))?;

    let metadata = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get file metadata: {}", e)))?;

    // 流式返回文件内容
    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::CONTENT_LENGTH, metadata.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.wav\"", voice_id),
        )
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// 下载音色波形图
pub async fn download_voice_waveform(
    State(state): State<Arc<AppState>>,
    Path(voice_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let voice = state
        .voice_repo
        .find_by_id(voice_id)
        .await
        .map_err(|e| ApiError::Internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::NotFound(format!("Voice not found: {}", voice_id)))?;

    let waveform_path = state.media_storage.voice_waveform_path(voice.id);
    let file = tokio::fs::File::open(&waveform_path)
        .await
        .map_err(|_| ApiError::NotFound(format!("Waveform not found: {}", voice_id)))?;

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CACHE_CONTROL, "public, max-age=31536000")
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}
