//! Project Commands

use uuid::Uuid;

/// 创建项目命令
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub title: String,
}

/// 重命名项目命令
#[derive(Debug, Clone)]
pub struct RenameProject {
    pub project_id: Uuid,
    pub title: String,
}

/// 删除项目命令
///
/// 连带删除项目输出目录；outputs 行级联删除
#[derive(Debug, Clone)]
pub struct DeleteProject {
    pub project_id: Uuid,
}
