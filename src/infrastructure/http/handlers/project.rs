//! Project HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::ProjectRecord;
use crate::application::{
    CreateProject, DeleteProject, GetProject, ListProjects, RenameProject,
};
use crate::infrastructure::http::dto::{ApiResponse, Empty, Pagination};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameProjectRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(10)
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProjectRecord> for ProjectResponse {
    fn from(record: ProjectRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            status: record.status.as_str().to_string(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,
    pub pagination: Pagination,
}

// ============================================================================
// Handlers
// ============================================================================

/// 创建项目
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let project = state
        .create_project_handler
        .handle(CreateProject { title: req.title })
        .await?;

    Ok(Json(ApiResponse::success(project.into())))
}

/// 分页获取项目列表
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<ProjectListResponse>>, ApiError> {
    let page = state
        .list_projects_handler
        .handle(ListProjects {
            page: query.page(),
            limit: query.limit(),
        })
        .await?;

    Ok(Json(ApiResponse::success(ProjectListResponse {
        projects: page.projects.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page.total, page.page, page.limit),
    })))
}

/// 获取项目详情
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let project = state
        .get_project_handler
        .handle(GetProject { project_id })
        .await?;

    Ok(Json(ApiResponse::success(project.into())))
}

/// 重命名项目
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<RenameProjectRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let project = state
        .rename_project_handler
        .handle(RenameProject {
            project_id,
            title: req.title,
        })
        .await?;

    Ok(Json(ApiResponse::success(project.into())))
}

/// 删除项目（连同输出目录）
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_project_handler
        .handle(DeleteProject { project_id })
        .await?;

    Ok(Json(ApiResponse::ok()))
}
