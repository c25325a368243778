//! Project Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateProject, DeleteProject, RenameProject};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    MediaStoragePort, ProjectRecord, ProjectRepositoryPort, ProjectStatus,
};

// ============================================================================
// CreateProject
// ============================================================================

/// CreateProject Handler
pub struct CreateProjectHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl CreateProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, command: CreateProject) -> Result<ProjectRecord, ApplicationError> {
        let title = command.title.trim();
        if title.is_empty() {
            return Err(ApplicationError::validation("Project title is required"));
        }

        let now = Utc::now();
        let project = ProjectRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        };

        self.project_repo.save(&project).await?;

        tracing::info!(project_id = %project.id, title = %project.title, "Project created");

        Ok(project)
    }
}

// ============================================================================
// RenameProject
// ============================================================================

/// RenameProject Handler
pub struct RenameProjectHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl RenameProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, command: RenameProject) -> Result<ProjectRecord, ApplicationError> {
        let title = command.title.trim();
        if title.is_empty() {
            return Err(ApplicationError::validation("Project title is required"));
        }

        let renamed = self.project_repo.rename(command.project_id, title).await?;
        if !renamed {
            return Err(ApplicationError::not_found("Project", command.project_id));
        }

        let project = self
            .project_repo
            .find_active_by_id(command.project_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Project", command.project_id))?;

        tracing::info!(project_id = %project.id, title = %project.title, "Project renamed");

        Ok(project)
    }
}

// ============================================================================
// DeleteProject
// ============================================================================

/// DeleteProject Handler
///
/// 先删除输出目录（整个项目的音频与波形图），再删数据库行，
/// outputs 行通过外键级联删除
pub struct DeleteProjectHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
    media_storage: Arc<dyn MediaStoragePort>,
}

impl DeleteProjectHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepositoryPort>,
        media_storage: Arc<dyn MediaStoragePort>,
    ) -> Self {
        Self {
            project_repo,
            media_storage,
        }
    }

    pub async fn handle(&self, command: DeleteProject) -> Result<(), ApplicationError> {
        self.media_storage
            .delete_project_dir(command.project_id)
            .await;

        self.project_repo.delete(command.project_id).await?;

        tracing::info!(project_id = %command.project_id, "Project deleted");

        Ok(())
    }
}
