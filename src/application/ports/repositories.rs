//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Project Repository
// ============================================================================

/// 项目状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    /// 活跃
    Active,
    /// 归档
    Archived,
    /// 已删除
    Deleted,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Archived => "archived",
            ProjectStatus::Deleted => "deleted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ProjectStatus::Active),
            "archived" => Some(ProjectStatus::Archived),
            "deleted" => Some(ProjectStatus::Deleted),
            _ => None,
        }
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Active
    }
}

/// 项目实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub id: Uuid,
    pub title: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project Repository Port
#[async_trait]
pub trait ProjectRepositoryPort: Send + Sync {
    /// 保存项目
    async fn save(&self, project: &ProjectRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找活跃项目
    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<ProjectRecord>, RepositoryError>;

    /// 分页获取活跃项目（按创建时间倒序）
    async fn find_page(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ProjectRecord>, RepositoryError>;

    /// 活跃项目总数
    async fn count_active(&self) -> Result<u64, RepositoryError>;

    /// 重命名项目，返回是否命中活跃行
    async fn rename(&self, id: Uuid, title: &str) -> Result<bool, RepositoryError>;

    /// 硬删除项目（outputs 级联删除）
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

// ============================================================================
// Voice Repository
// ============================================================================

/// 音色实体（用于持久化）
///
/// gender 不做枚举约束：pack 导入允许任意字符串值落库
#[derive(Debug, Clone, Serialize)]
pub struct VoiceRecord {
    pub id: Uuid,
    pub name: String,
    pub notes: String,
    pub gender: Option<String>,
    pub is_favorite: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 音色部分更新
///
/// 固定字段集合：调用方提供的键名不进入 SQL 文本，
/// 每个存在的字段各自绑定占位符
#[derive(Debug, Clone, Default)]
pub struct VoiceUpdate {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub gender: Option<Option<String>>,
    pub is_favorite: Option<bool>,
    /// Some 时整体替换 tags
    pub tags: Option<Vec<String>>,
}

impl VoiceUpdate {
    /// 是否不含任何变更
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.notes.is_none()
            && self.gender.is_none()
            && self.is_favorite.is_none()
            && self.tags.is_none()
    }
}

/// Voice Repository Port
#[async_trait]
pub trait VoiceRepositoryPort: Send + Sync {
    /// 保存音色（含 tags）
    async fn save(&self, voice: &VoiceRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找音色
    async fn find_by_id(&self, id: Uuid) -> Result<Option<VoiceRecord>, RepositoryError>;

    /// 分页搜索未删除音色（name 或 notes 模糊匹配，按创建时间倒序）
    async fn search_page(
        &self,
        search: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<VoiceRecord>, RepositoryError>;

    /// 搜索条件下的未删除音色总数
    async fn count(&self, search: &str) -> Result<u64, RepositoryError>;

    /// 现有音色名称快照（未删除）
    async fn find_names(&self) -> Result<Vec<String>, RepositoryError>;

    /// 部分更新，返回更新后的记录
    async fn update(&self, id: Uuid, update: &VoiceUpdate)
        -> Result<VoiceRecord, RepositoryError>;

    /// 软删除（设置 deleted_at），返回是否命中
    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}

// ============================================================================
// Output Repository
// ============================================================================

/// 生成结果实体（用于持久化）
#[derive(Debug, Clone)]
pub struct OutputRecord {
    pub id: Uuid,
    pub project_id: Uuid,
    /// 音色 ID 或字面量 "default"
    pub voice_id: String,
    pub text: String,
    pub exaggeration: f32,
    pub temperature: f32,
    pub created_at: DateTime<Utc>,
}

/// 列表项：联表带出音色名与项目标题
#[derive(Debug, Clone)]
pub struct OutputListItem {
    pub id: Uuid,
    pub project_id: Uuid,
    pub project_title: Option<String>,
    pub voice_id: String,
    pub voice_name: Option<String>,
    pub text: String,
    pub exaggeration: f32,
    pub temperature: f32,
    pub created_at: DateTime<Utc>,
}

/// Output Repository Port
#[async_trait]
pub trait OutputRepositoryPort: Send + Sync {
    /// 保存生成结果
    async fn save(&self, output: &OutputRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OutputRecord>, RepositoryError>;

    /// 分页获取全部（联表，按创建时间倒序）
    async fn find_page(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<OutputListItem>, RepositoryError>;

    /// 总数
    async fn count(&self) -> Result<u64, RepositoryError>;

    /// 分页获取指定项目的生成结果
    async fn find_by_project_page(
        &self,
        project_id: Uuid,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<OutputListItem>, RepositoryError>;

    /// 指定项目的生成结果总数
    async fn count_by_project(&self, project_id: Uuid) -> Result<u64, RepositoryError>;

    /// 删除
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
