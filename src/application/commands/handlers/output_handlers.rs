//! Output Command Handlers - 语音生成与删除

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{DeleteOutput, GenerateSpeech};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    MediaStoragePort, OutputRecord, OutputRepositoryPort, SpeechRequest, TtsEnginePort,
    VoiceRepositoryPort,
};

/// 生成语音响应
#[derive(Debug)]
pub struct GenerateSpeechResponse {
    pub output: OutputRecord,
    /// 合成得到的 WAV 字节（随响应直接返回）
    pub audio: Vec<u8>,
}

// ============================================================================
// GenerateSpeech
// ============================================================================

/// GenerateSpeech Handler
///
/// 编排：参数校验 → 解析参考音频 → TTS 合成 → 落盘（音频 + 波形图）→ 落库
pub struct GenerateSpeechHandler {
    output_repo: Arc<dyn OutputRepositoryPort>,
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    media_storage: Arc<dyn MediaStoragePort>,
    tts_engine: Arc<dyn TtsEnginePort>,
}

impl GenerateSpeechHandler {
    pub fn new(
        output_repo: Arc<dyn OutputRepositoryPort>,
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        media_storage: Arc<dyn MediaStoragePort>,
        tts_engine: Arc<dyn TtsEnginePort>,
    ) -> Self {
        Self {
            output_repo,
            voice_repo,
            media_storage,
            tts_engine,
        }
    }

    pub async fn handle(
        &self,
        command: GenerateSpeech,
    ) -> Result<GenerateSpeechResponse, ApplicationError> {
        if command.text.trim().is_empty() {
            return Err(ApplicationError::validation("Text is required"));
        }
        if !(0.0..=2.0).contains(&command.exaggeration) {
            return Err(ApplicationError::validation(
                "Exaggeration must be a number between 0 and 2",
            ));
        }
        if !(0.0..=1.0).contains(&command.temperature) {
            return Err(ApplicationError::validation(
                "Temperature must be a number between 0 and 1",
            ));
        }

        // 解析参考音频：None / "default" 走服务内置音色
        let voice_sample = match command.voice_id.as_deref() {
            None | Some("default") => None,
            Some(voice_id) => {
                let voice = match Uuid::parse_str(voice_id) {
                    Ok(id) => self.voice_repo.find_by_id(id).await?,
                    Err(_) => None,
                };
                let voice = voice.ok_or_else(|| {
                    ApplicationError::validation(format!(
                        "Voice with ID {} not found",
                        voice_id
                    ))
                })?;
                let audio = self.media_storage.read_voice_audio(voice.id).await?;
                Some(audio)
            }
        };

        let audio = self
            .tts_engine
            .synthesize(SpeechRequest {
                text: command.text.clone(),
                voice_sample,
                exaggeration: command.exaggeration,
                temperature: command.temperature,
            })
            .await?;

        let output_id = Uuid::new_v4();
        self.media_storage
            .save_output_audio(command.project_id, output_id, &audio)
            .await?;

        let waveform = self
            .tts_engine
            .render_waveform(&format!("{}.wav", output_id), audio.clone())
            .await?;
        self.media_storage
            .save_output_waveform(command.project_id, output_id, &waveform)
            .await?;

        let output = OutputRecord {
            id: output_id,
            project_id: command.project_id,
            voice_id: command
                .voice_id
                .unwrap_or_else(|| "default".to_string()),
            text: command.text,
            exaggeration: command.exaggeration,
            temperature: command.temperature,
            created_at: Utc::now(),
        };

        self.output_repo.save(&output).await?;

        tracing::info!(
            output_id = %output.id,
            project_id = %output.project_id,
            voice_id = %output.voice_id,
            audio_size = audio.len(),
            "Speech generated"
        );

        Ok(GenerateSpeechResponse { output, audio })
    }
}

// ============================================================================
// DeleteOutput
// ============================================================================

/// DeleteOutput Handler
///
/// 物理文件缺失仅告警；数据库行总是删除
pub struct DeleteOutputHandler {
    output_repo: Arc<dyn OutputRepositoryPort>,
    media_storage: Arc<dyn MediaStoragePort>,
}

impl DeleteOutputHandler {
    pub fn new(
        output_repo: Arc<dyn OutputRepositoryPort>,
        media_storage: Arc<dyn MediaStoragePort>,
    ) -> Self {
        Self {
            output_repo,
            media_storage,
        }
    }

    pub async fn handle(&self, command: DeleteOutput) -> Result<(), ApplicationError> {
        let output = self
            .output_repo
            .find_by_id(command.output_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Output", command.output_id))?;

        self.media_storage
            .delete_output_files(output.project_id, output.id)
            .await;

        self.output_repo.delete(command.output_id).await?;

        tracing::info!(output_id = %command.output_id, "Output deleted");

        Ok(())
    }
}
