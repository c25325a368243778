//! HTTP TTS Client - 调用外部 TTS HTTP 服务
//!
//! 实现 TtsEnginePort trait，通过 HTTP 调用外部 TTS 微服务
//!
//! 外部 TTS API:
//! - POST {base_url}/tts
//!   Request: {"text": "...", "voice": "default"|"custom",
//!             "voice_sample": base64 wav, "exaggeration": f, "temperature": f}
//!   Response: audio/wav binary
//! - POST {base_url}/generate-waveform  (multipart `file`)
//!   Response: image/png binary
//! - GET {base_url}/health

use async_trait::async_trait;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{SpeechRequest, TtsEnginePort, TtsError};

/// TTS 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TtsHttpRequest {
    /// 要合成的文本
    text: String,
    /// "default" 使用内置音色，"custom" 使用 voice_sample
    voice: &'static str,
    /// 参考音频（base64 编码的 WAV），仅 custom 模式
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_sample: Option<String>,
    exaggeration: f32,
    temperature: f32,
}

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// TTS 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3100".to_string(),
            timeout_secs: 120,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    /// 创建新的 HTTP TTS 客户端
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 使用默认配置创建客户端
    pub fn with_default_config() -> Result<Self, TtsError> {
        Self::new(HttpTtsClientConfig::default())
    }

    fn tts_url(&self) -> String {
        format!("{}/tts", self.config.base_url)
    }

    fn waveform_url(&self) -> String {
        format!("{}/generate-waveform", self.config.base_url)
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url)
    }

    fn map_send_error(e: reqwest::Error) -> TtsError {
        if e.is_timeout() {
            TtsError::Timeout
        } else if e.is_connect() {
            TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
        } else {
            TtsError::NetworkError(e.to_string())
        }
    }
}

#[async_trait]
impl TtsEnginePort for HttpTtsClient {
    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>, TtsError> {
        let http_request = match request.voice_sample {
            Some(sample) => TtsHttpRequest {
                text: request.text,
                voice: "custom",
                voice_sample: Some(base64::engine::general_purpose::STANDARD.encode(sample)),
                exaggeration: request.exaggeration,
                temperature: request.temperature,
            },
            None => TtsHttpRequest {
                text: request.text,
                voice: "default",
                voice_sample: None,
                exaggeration: request.exaggeration,
                temperature: request.temperature,
            },
        };

        tracing::debug!(
            url = %self.tts_url(),
            text_len = http_request.text.len(),
            voice = http_request.voice,
            "Sending TTS request"
        );

        let response = self
            .client
            .post(&self.tts_url())
            .json(&http_request)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        tracing::info!(audio_size = audio.len(), "TTS synthesis completed");

        Ok(audio)
    }

    async fn render_waveform(&self, file_name: &str, audio: Vec<u8>) -> Result<Vec<u8>, TtsError> {
        let part = Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("audio/wav")
            .map_err(|e| TtsError::InvalidResponse(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.waveform_url())
            .multipart(form)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "Failed to generate waveform: HTTP {}: {}",
                status, error_text
            )));
        }

        let image = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read waveform: {}", e)))?
            .to_vec();

        tracing::debug!(image_size = image.len(), "Waveform rendered");

        Ok(image)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(&self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
