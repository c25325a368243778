//! Output Commands - 语音生成

use uuid::Uuid;

/// 生成语音命令
#[derive(Debug, Clone)]
pub struct GenerateSpeech {
    pub project_id: Uuid,
    /// None 或 "default" 使用服务内置默认音色
    pub voice_id: Option<String>,
    pub text: String,
    pub exaggeration: f32,
    pub temperature: f32,
}

/// 删除生成结果命令
#[derive(Debug, Clone)]
pub struct DeleteOutput {
    pub output_id: Uuid,
}
