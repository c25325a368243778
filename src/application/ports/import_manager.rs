//! Import Manager Port - pack 导入会话管理
//!
//! 定义导入会话状态机的抽象接口，具体实现在 infrastructure/memory 层
//!
//! 状态机: idle → parsing → confirming → uploading → done | error
//! - idle 与 parsing 不落会话：parsing 在上传请求内同步完成，
//!   解析失败时不创建会话（错误直接随响应返回）
//! - 会话自 confirming 起存在；discard 仅在 confirming 合法，回到 idle（移除会话）

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::voice_creator::CreatedVoice;
use crate::domain::voicepack::{PackArchive, VoicePackManifest};

/// Import Manager 错误
#[derive(Debug, Error)]
pub enum ImportSessionError {
    #[error("Import session not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

/// 导入会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportState {
    /// 等待确认（解析成功后的暂停点）
    Confirming,
    /// 上传中
    Uploading,
    /// 全部处理完成（可能带有 skip）
    Done,
    /// 管线中止
    Error,
}

impl ImportState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportState::Confirming => "confirming",
            ImportState::Uploading => "uploading",
            ImportState::Done => "done",
            ImportState::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "confirming" => Some(ImportState::Confirming),
            "uploading" => Some(ImportState::Uploading),
            "done" => Some(ImportState::Done),
            "error" => Some(ImportState::Error),
            _ => None,
        }
    }

    /// 是否终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportState::Done | ImportState::Error)
    }
}

/// 上传进度
///
/// total = 通过 Dedup Filter 的候选条目数；
/// current 在每次完成一次尝试（上传成功或超限跳过）后递增
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportProgress {
    pub current: usize,
    pub total: usize,
}

/// 导入会话
#[derive(Debug, Clone)]
pub struct ImportSession {
    pub id: Uuid,
    pub state: ImportState,
    pub manifest: Arc<VoicePackManifest>,
    pub archive: Arc<PackArchive>,
    pub progress: ImportProgress,
    /// 本次运行创建的音色（保持上传顺序）
    pub created: Vec<CreatedVoice>,
    /// 超限跳过的音色名
    pub skipped: Vec<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Import Manager Port
///
/// 管理导入会话的生命周期，所有状态存储在内存中
pub trait ImportManagerPort: Send + Sync {
    /// 以 confirming 状态创建会话
    fn create(&self, manifest: VoicePackManifest, archive: PackArchive) -> ImportSession;

    /// 获取会话快照
    fn get(&self, id: Uuid) -> Option<ImportSession>;

    /// confirming → uploading，记录候选总数
    fn begin_upload(&self, id: Uuid, total: usize) -> Result<ImportSession, ImportSessionError>;

    /// 记录一次成功上传（current += 1）
    fn record_uploaded(&self, id: Uuid, voice: CreatedVoice) -> Result<(), ImportSessionError>;

    /// 记录一次超限跳过（current += 1）
    fn record_skipped(&self, id: Uuid, name: String) -> Result<(), ImportSessionError>;

    /// uploading → done
    fn complete(&self, id: Uuid) -> Result<ImportSession, ImportSessionError>;

    /// → error，错误消息原样保留
    fn fail(&self, id: Uuid, message: String) -> Result<(), ImportSessionError>;

    /// 丢弃会话（仅 confirming 合法），回到 idle
    fn discard(&self, id: Uuid) -> Result<(), ImportSessionError>;
}
