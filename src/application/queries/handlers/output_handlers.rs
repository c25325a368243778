//! Output Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{OutputListItem, OutputRepositoryPort};
use crate::application::queries::{ListOutputs, ListProjectOutputs};

/// 生成结果分页
#[derive(Debug, Clone)]
pub struct OutputPage {
    pub outputs: Vec<OutputListItem>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// ListOutputs Handler
pub struct ListOutputsHandler {
    output_repo: Arc<dyn OutputRepositoryPort>,
}

impl ListOutputsHandler {
    pub fn new(output_repo: Arc<dyn OutputRepositoryPort>) -> Self {
        Self { output_repo }
    }

    pub async fn handle(&self, query: ListOutputs) -> Result<OutputPage, ApplicationError> {
        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let offset = (page - 1) * limit;

        let outputs = self.output_repo.find_page(limit, offset).await?;
        let total = self.output_repo.count().await?;

        Ok(OutputPage {
            outputs,
            total,
            page,
            limit,
        })
    }
}

/// ListProjectOutputs Handler
pub struct ListProjectOutputsHandler {
    output_repo: Arc<dyn OutputRepositoryPort>,
}

impl ListProjectOutputsHandler {
    pub fn new(output_repo: Arc<dyn OutputRepositoryPort>) -> Self {
        Self { output_repo }
    }

    pub async fn handle(&self, query: ListProjectOutputs) -> Result<OutputPage, ApplicationError> {
        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let offset = (page - 1) * limit;

        let outputs = self
            .output_repo
            .find_by_project_page(query.project_id, limit, offset)
            .await?;
        let total = self.output_repo.count_by_project(query.project_id).await?;

        Ok(OutputPage {
            outputs,
            total,
            page,
            limit,
        })
    }
}
