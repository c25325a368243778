//! Voice Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateVoice, DeleteVoice, UpdateVoice};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    MediaStoragePort, TtsEnginePort, VoiceRecord, VoiceRepositoryPort,
};

// ============================================================================
// CreateVoice
// ============================================================================

/// CreateVoice Handler
///
/// 流程：保存参考音频 → 请求 TTS 服务渲染波形图 → 落库。
/// 波形图渲染失败会中止创建（音频文件保留在磁盘，无数据库行）
pub struct CreateVoiceHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    media_storage: Arc<dyn MediaStoragePort>,
    tts_engine: Arc<dyn TtsEnginePort>,
}

impl CreateVoiceHandler {
    pub fn new(
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        media_storage: Arc<dyn MediaStoragePort>,
        tts_engine: Arc<dyn TtsEnginePort>,
    ) -> Self {
        Self {
            voice_repo,
            media_storage,
            tts_engine,
        }
    }

    pub async fn handle(&self, command: CreateVoice) -> Result<VoiceRecord, ApplicationError> {
        if command.name.is_empty() {
            return Err(ApplicationError::validation("Name and file are required"));
        }

        let voice_id = Uuid::new_v4();

        self.media_storage
            .save_voice_audio(voice_id, &command.payload)
            .await?;

        let waveform = self
            .tts_engine
            .render_waveform(&command.file_name, command.payload.clone())
            .await?;
        self.media_storage
            .save_voice_waveform(voice_id, &waveform)
            .await?;

        let now = Utc::now();
        let voice = VoiceRecord {
            id: voice_id,
            name: command.name,
            notes: command.notes,
            gender: command.gender,
            is_favorite: false,
            tags: command.tags,
            created_at: now,
            updated_at: now,
        };

        self.voice_repo.save(&voice).await?;

        tracing::info!(
            voice_id = %voice.id,
            name = %voice.name,
            tags = voice.tags.len(),
            "Voice created"
        );

        Ok(voice)
    }
}

// ============================================================================
// UpdateVoice
// ============================================================================

/// UpdateVoice Handler
pub struct UpdateVoiceHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
}

impl UpdateVoiceHandler {
    pub fn new(voice_repo: Arc<dyn VoiceRepositoryPort>) -> Self {
        Self { voice_repo }
    }

    pub async fn handle(&self, command: UpdateVoice) -> Result<VoiceRecord, ApplicationError> {
        let voice = self
            .voice_repo
            .update(command.voice_id, &command.update)
            .await
            .map_err(|e| match e {
                crate::application::ports::RepositoryError::NotFound(_) => {
                    ApplicationError::not_found("Voice", command.voice_id)
                }
                other => other.into(),
            })?;

        tracing::info!(voice_id = %voice.id, "Voice updated");

        Ok(voice)
    }
}

// ============================================================================
// DeleteVoice
// ============================================================================

/// DeleteVoice Handler（软删除，参考音频保留在磁盘）
pub struct DeleteVoiceHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
}

impl DeleteVoiceHandler {
    pub fn new(voice_repo: Arc<dyn VoiceRepositoryPort>) -> Self {
        Self { voice_repo }
    }

    pub async fn handle(&self, command: DeleteVoice) -> Result<(), ApplicationError> {
        let deleted = self.voice_repo.soft_delete(command.voice_id).await?;
        if !deleted {
            return Err(ApplicationError::not_found("Voice", command.voice_id));
        }

        tracing::info!(voice_id = %command.voice_id, "Voice deleted");

        Ok(())
    }
}
