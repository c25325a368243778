//! Voice Queries

use uuid::Uuid;

/// 获取音色详情
#[derive(Debug, Clone)]
pub struct GetVoice {
    pub voice_id: Uuid,
}

/// 分页搜索音色
#[derive(Debug, Clone)]
pub struct ListVoices {
    pub page: u32,
    pub limit: u32,
    /// name 或 notes 的模糊匹配；空串匹配全部
    pub search: String,
}
