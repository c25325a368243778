//! Output Queries

use uuid::Uuid;

/// 分页列出全部生成结果
#[derive(Debug, Clone)]
pub struct ListOutputs {
    pub page: u32,
    pub limit: u32,
}

/// 分页列出指定项目的生成结果
#[derive(Debug, Clone)]
pub struct ListProjectOutputs {
    pub project_id: Uuid,
    pub page: u32,
    pub limit: u32,
}
