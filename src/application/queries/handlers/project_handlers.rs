//! Project Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ProjectRecord, ProjectRepositoryPort};
use crate::application::queries::{GetProject, ListProjects};

/// 项目分页结果
#[derive(Debug, Clone)]
pub struct ProjectPage {
    pub projects: Vec<ProjectRecord>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// GetProject Handler
pub struct GetProjectHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl GetProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, query: GetProject) -> Result<ProjectRecord, ApplicationError> {
        self.project_repo
            .find_active_by_id(query.project_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Project", query.project_id))
    }
}

/// ListProjects Handler
pub struct ListProjectsHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl ListProjectsHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, query: ListProjects) -> Result<ProjectPage, ApplicationError> {
        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let offset = (page - 1) * limit;

        let projects = self.project_repo.find_page(limit, offset).await?;
        let total = self.project_repo.count_active().await?;

        Ok(ProjectPage {
            projects,
            total,
            page,
            limit,
        })
    }
}
