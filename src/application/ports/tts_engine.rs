//! TTS Engine Port - 外部 TTS 微服务抽象
//!
//! 定义语音合成与波形图渲染的抽象接口，具体实现在
//! infrastructure/adapters/tts 层

use async_trait::async_trait;
use thiserror::Error;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("TTS service error: {0}")]
    ServiceError(String),

    #[error("Invalid TTS response: {0}")]
    InvalidResponse(String),

    #[error("TTS request timed out")]
    Timeout,
}

/// 语音合成请求
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// 要合成的文本
    pub text: String,
    /// 参考音频字节；None 表示使用服务内置默认音色
    pub voice_sample: Option<Vec<u8>>,
    /// 语气夸张度 (0.0 - 2.0)
    pub exaggeration: f32,
    /// 采样温度 (0.0 - 1.0)
    pub temperature: f32,
}

/// TTS Engine Port
///
/// 语音合成与波形图渲染均委托给外部微服务
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 合成语音，返回 WAV 字节
    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>, TtsError>;

    /// 根据音频渲染波形图，返回 PNG 字节
    async fn render_waveform(&self, file_name: &str, audio: Vec<u8>) -> Result<Vec<u8>, TtsError>;

    /// 健康检查
    async fn health_check(&self) -> bool;
}
