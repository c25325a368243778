//! HTTP Voice Creator - 音色创建端点客户端
//!
//! 实现 VoiceCreatorPort trait。pack 导入管线的 Upload Submitter
//! 通过该客户端把 multipart 表单提交到音色创建端点（默认回连本服务
//! 的 /api/voices）。
//!
//! 本服务的 JSON 响应统一为 {errno, error, data} 信封，HTTP 状态码
//! 恒为 200：非 2xx 或 errno != 0 都按失败处理。

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{CreatedVoice, NewVoiceUpload, VoiceCreatorError, VoiceCreatorPort};

/// 音色创建端点响应信封
#[derive(Debug, Deserialize)]
struct CreateVoiceEnvelope {
    errno: i32,
    #[serde(default)]
    error: String,
    data: Option<CreatedVoice>,
}

/// HTTP 音色创建客户端配置
#[derive(Debug, Clone)]
pub struct HttpVoiceCreatorConfig {
    /// 音色创建端点的 Base URL
    pub base_url: String,
}

impl HttpVoiceCreatorConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

/// HTTP 音色创建客户端
pub struct HttpVoiceCreator {
    client: Client,
    config: HttpVoiceCreatorConfig,
}

impl HttpVoiceCreator {
    /// 创建新的客户端
    ///
    /// 不设置单次调用超时，依赖传输层默认行为
    pub fn new(config: HttpVoiceCreatorConfig) -> Result<Self, VoiceCreatorError> {
        let client = Client::builder()
            .build()
            .map_err(|e| VoiceCreatorError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn create_url(&self) -> String {
        format!("{}/api/voices", self.config.base_url)
    }
}

#[async_trait]
impl VoiceCreatorPort for HttpVoiceCreator {
    async fn create_voice(
        &self,
        upload: NewVoiceUpload,
    ) -> Result<CreatedVoice, VoiceCreatorError> {
        let tags_json = serde_json::to_string(&upload.tags)
            .map_err(|e| VoiceCreatorError::InvalidResponse(e.to_string()))?;

        let part = Part::bytes(upload.payload)
            .file_name(upload.file_name)
            .mime_str("audio/wav")
            .map_err(|e| VoiceCreatorError::NetworkError(e.to_string()))?;

        let form = Form::new()
            .part("file", part)
            .text("name", upload.name.clone())
            .text("notes", upload.notes)
            .text("gender", upload.gender)
            .text("tags", tags_json);

        tracing::debug!(
            url = %self.create_url(),
            name = %upload.name,
            "Submitting voice creation"
        );

        let response = self
            .client
            .post(&self.create_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| VoiceCreatorError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VoiceCreatorError::EndpointError(format!(
                "HTTP {}",
                status
            )));
        }

        let envelope: CreateVoiceEnvelope = response
            .json()
            .await
            .map_err(|e| VoiceCreatorError::InvalidResponse(e.to_string()))?;

        if envelope.errno != 0 {
            return Err(VoiceCreatorError::EndpointError(envelope.error));
        }

        envelope
            .data
            .ok_or_else(|| VoiceCreatorError::InvalidResponse("missing data".to_string()))
    }
}
