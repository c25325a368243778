//! Project Queries

use uuid::Uuid;

/// 获取项目详情
#[derive(Debug, Clone)]
pub struct GetProject {
    pub project_id: Uuid,
}

/// 分页列出活跃项目
#[derive(Debug, Clone)]
pub struct ListProjects {
    pub page: u32,
    pub limit: u32,
}
