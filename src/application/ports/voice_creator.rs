//! Voice Creator Port - 音色创建端点抽象
//!
//! pack 导入管线的 Upload Submitter 通过该端口向音色创建端点
//! 提交 multipart 表单。生产实现为 HTTP 客户端（回连本服务的
//! /api/voices），测试实现在内存中记录调用。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 音色创建错误
#[derive(Debug, Error)]
pub enum VoiceCreatorError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Voice creation endpoint returned failure: {0}")]
    EndpointError(String),

    #[error("Invalid response from voice creation endpoint: {0}")]
    InvalidResponse(String),
}

/// 一次音色创建提交（ResolvedUpload 的 multipart 字段）
#[derive(Debug, Clone)]
pub struct NewVoiceUpload {
    /// 原始文件名（multipart filename，media type 固定 audio/wav）
    pub file_name: String,
    /// 音频字节
    pub payload: Vec<u8>,
    pub name: String,
    /// 已包含 repository 出处标注的最终 notes
    pub notes: String,
    pub gender: String,
    /// 序列化前的 tags（提交时编码为 JSON 数组字符串，无则 `[]`）
    pub tags: Vec<String>,
}

/// 创建成功返回的音色记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedVoice {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Voice Creator Port
#[async_trait]
pub trait VoiceCreatorPort: Send + Sync {
    /// 提交一条音色创建请求，成功返回创建的记录
    async fn create_voice(&self, upload: NewVoiceUpload) -> Result<CreatedVoice, VoiceCreatorError>;
}
