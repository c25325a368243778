//! SQLite Project Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{
    ProjectRecord, ProjectRepositoryPort, ProjectStatus, RepositoryError,
};

/// SQLite Project Repository
pub struct SqliteProjectRepository {
    pool: DbPool,
}

impl SqliteProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ProjectRow {
    id: String,
    title: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ProjectRow> for ProjectRecord {
    type Error = RepositoryError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(ProjectRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            title: row.title,
            status: ProjectStatus::from_str(&row.status).unwrap_or_default(),
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&row.updated_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl ProjectRepositoryPort for SqliteProjectRepository {
    async fn save(&self, project: &ProjectRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, title, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(project.id.to_string())
        .bind(&project.title)
        .bind(project.status.as_str())
        .bind(project.created_at.to_rfc3339())
        .bind(project.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<ProjectRecord>, RepositoryError> {
        let row: Option<ProjectRow> = sqlx::query_as(
            "SELECT id, title, status, created_at, updated_at FROM projects WHERE id = ? AND status = 'active'",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(ProjectRecord::try_from).transpose()
    }

    async fn find_page(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(
            r#"
            SELECT id, title, status, created_at, updated_at FROM projects
            WHERE status = 'active'
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(ProjectRecord::try_from).collect()
    }

    async fn count_active(&self) -> Result<u64, RepositoryError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(total as u64)
    }

    async fn rename(&self, id: Uuid, title: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE projects SET title = ?, updated_at = ? WHERE id = ? AND status = 'active'",
        )
        .bind(title)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn test_repo() -> SqliteProjectRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteProjectRepository::new(pool)
    }

    fn project(title: &str) -> ProjectRecord {
        let now = Utc::now();
        ProjectRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = test_repo().await;
        let p = project("demo");
        repo.save(&p).await.unwrap();

        let found = repo.find_active_by_id(p.id).await.unwrap().unwrap();
        assert_eq!(found.title, "demo");
        assert_eq!(found.status, ProjectStatus::Active);
    }

    #[tokio::test]
    async fn test_rename_misses_unknown_project() {
        let repo = test_repo().await;
        let renamed = repo.rename(Uuid::new_v4(), "x").await.unwrap();
        assert!(!renamed);
    }

    #[tokio::test]
    async fn test_pagination_and_count() {
        let repo = test_repo().await;
        for i in 0..3 {
            repo.save(&project(&format!("p{}", i))).await.unwrap();
        }

        assert_eq!(repo.count_active().await.unwrap(), 3);
        let page = repo.find_page(2, 0).await.unwrap();
        assert_eq!(page.len(), 2);
        let page = repo.find_page(2, 2).await.unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let repo = test_repo().await;
        let p = project("gone");
        repo.save(&p).await.unwrap();
        repo.delete(p.id).await.unwrap();

        assert!(repo.find_active_by_id(p.id).await.unwrap().is_none());
    }
}
