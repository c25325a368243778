//! Import Queries

use uuid::Uuid;

/// 查询导入会话状态与进度
#[derive(Debug, Clone)]
pub struct GetImportStatus {
    pub session_id: Uuid,
}
