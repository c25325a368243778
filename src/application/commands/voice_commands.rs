//! Voice Commands

use uuid::Uuid;

use crate::application::ports::VoiceUpdate;

/// 创建音色命令
#[derive(Debug, Clone)]
pub struct CreateVoice {
    pub name: String,
    pub notes: String,
    pub gender: Option<String>,
    pub tags: Vec<String>,
    /// 原始上传文件名（用于波形图渲染请求）
    pub file_name: String,
    /// 参考音频字节
    pub payload: Vec<u8>,
}

/// 更新音色命令（固定字段集合的部分更新）
#[derive(Debug, Clone)]
pub struct UpdateVoice {
    pub voice_id: Uuid,
    pub update: VoiceUpdate,
}

/// 删除音色命令（软删除）
#[derive(Debug, Clone)]
pub struct DeleteVoice {
    pub voice_id: Uuid,
}
