//! SQLite Output Repository
//!
//! 列表查询联表带出音色名与项目标题（LEFT JOIN，音色可能已删除
//! 或为字面量 'default'）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{
    OutputListItem, OutputRecord, OutputRepositoryPort, RepositoryError,
};

/// SQLite Output Repository
pub struct SqliteOutputRepository {
    pool: DbPool,
}

impl SqliteOutputRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct OutputRow {
    id: String,
    project_id: String,
    voice_id: String,
    text: String,
    exaggeration: f64,
    temperature: f64,
    created_at: String,
}

impl TryFrom<OutputRow> for OutputRecord {
    type Error = RepositoryError;

    fn try_from(row: OutputRow) -> Result<Self, Self::Error> {
        Ok(OutputRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            project_id: Uuid::parse_str(&row.project_id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            voice_id: row.voice_id,
            text: row.text,
            exaggeration: row.exaggeration as f32,
            temperature: row.temperature as f32,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[derive(FromRow)]
struct OutputListRow {
    id: String,
    project_id: String,
    project_title: Option<String>,
    voice_id: String,
    voice_name: Option<String>,
    text: String,
    exaggeration: f64,
    temperature: f64,
    created_at: String,
}

impl TryFrom<OutputListRow> for OutputListItem {
    type Error = RepositoryError;

    fn try_from(row: OutputListRow) -> Result<Self, Self::Error> {
        Ok(OutputListItem {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            project_id: Uuid::parse_str(&row.project_id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            project_title: row.project_title,
            voice_id: row.voice_id,
            voice_name: row.voice_name,
            text: row.text,
            exaggeration: row.exaggeration as f32,
            temperature: row.temperature as f32,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

const OUTPUT_LIST_SELECT: &str = r#"
    SELECT o.id, o.project_id, p.title AS project_title,
           o.voice_id, v.name AS voice_name,
           o.text, o.exaggeration, o.temperature, o.created_at
    FROM outputs o
    LEFT JOIN voices v ON o.voice_id = v.id
    LEFT JOIN projects p ON o.project_id = p.id
"#;

#[async_trait]
impl OutputRepositoryPort for SqliteOutputRepository {
    async fn save(&self, output: &OutputRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO outputs (id, project_id, voice_id, text, exaggeration, temperature, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(output.id.to_string())
        .bind(output.project_id.to_string())
        .bind(&output.voice_id)
        .bind(&output.text)
        .bind(output.exaggeration as f64)
        .bind(output.temperature as f64)
        .bind(output.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OutputRecord>, RepositoryError> {
        let row: Option<OutputRow> = sqlx::query_as(
            "SELECT id, project_id, voice_id, text, exaggeration, temperature, created_at FROM outputs WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(OutputRecord::try_from).transpose()
    }

    async fn find_page(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<OutputListItem>, RepositoryError> {
        let sql = format!(
            "{} ORDER BY o.created_at DESC LIMIT ? OFFSET ?",
            OUTPUT_LIST_SELECT
        );
        let rows: Vec<OutputListRow> = sqlx::query_as(&sql)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(OutputListItem::try_from).collect()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM outputs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(total as u64)
    }

    async fn find_by_project_page(
        &self,
        project_id: Uuid,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<OutputListItem>, RepositoryError> {
        let sql = format!(
            "{} WHERE o.project_id = ? ORDER BY o.created_at DESC LIMIT ? OFFSET ?",
            OUTPUT_LIST_SELECT
        );
        let rows: Vec<OutputListRow> = sqlx::query_as(&sql)
            .bind(project_id.to_string())
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(OutputListItem::try_from).collect()
    }

    async fn count_by_project(&self, project_id: Uuid) -> Result<u64, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM outputs WHERE project_id = ?")
            .bind(project_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(total as u64)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM outputs WHERE id = ?")
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
    use crate::application::ports::{
        ProjectRecord, ProjectRepositoryPort, ProjectStatus, VoiceRecord, VoiceRepositoryPort,
    };
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteProjectRepository,
        SqliteVoiceRepository,
    };

    async fn test_pool() -> DbPool {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn output(project_id: Uuid, voice_id: &str) -> OutputRecord {
        OutputRecord {
            id: Uuid::new_v4(),
            project_id,
            voice_id: voice_id.to_string(),
            text: "hello".to_string(),
            exaggeration: 0.5,
            temperature: 0.5,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_and_list_joins_names() {
        let pool = test_pool().await;
        let projects = SqliteProjectRepository::new(pool.clone());
        let voices = SqliteVoiceRepository::new(pool.clone());
        let outputs = SqliteOutputRepository::new(pool);

        let now = Utc::now();
        let project = ProjectRecord {
            id: Uuid::new_v4(),
            title: "demo".to_string(),
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        };
        projects.save(&project).await.unwrap();

        let voice = VoiceRecord {
            id: Uuid::new_v4(),
            name: "Aria".to_string(),
            notes: String::new(),
            gender: None,
            is_favorite: false,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        voices.save(&voice).await.unwrap();

        outputs
            .save(&output(project.id, &voice.id.to_string()))
            .await
            .unwrap();

        let page = outputs.find_page(10, 0).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].voice_name.as_deref(), Some("Aria"));
        assert_eq!(page[0].project_title.as_deref(), Some("demo"));
    }

    #[tokio::test]
    async fn test_default_voice_has_no_joined_name() {
        let pool = test_pool().await;
        let projects = SqliteProjectRepository::new(pool.clone());
        let outputs = SqliteOutputRepository::new(pool);

        let now = Utc::now();
        let project = ProjectRecord {
            id: Uuid::new_v4(),
            title: "demo".to_string(),
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        };
        projects.save(&project).await.unwrap();

        outputs.save(&output(project.id, "default")).await.unwrap();

        let page = outputs.find_page(10, 0).await.unwrap();
        assert_eq!(page[0].voice_id, "default");
        assert!(page[0].voice_name.is_none());
    }

    #[tokio::test]
    async fn test_per_project_listing_and_counts() {
        let pool = test_pool().await;
        let projects = SqliteProjectRepository::new(pool.clone());
        let outputs = SqliteOutputRepository::new(pool);

        let now = Utc::now();
        let a = ProjectRecord {
            id: Uuid::new_v4(),
            title: "a".to_string(),
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let b = ProjectRecord {
            id: Uuid::new_v4(),
            title: "b".to_string(),
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        };
        projects.save(&a).await.unwrap();
        projects.save(&b).await.unwrap();

        outputs.save(&output(a.id, "default")).await.unwrap();
        outputs.save(&output(a.id, "default")).await.unwrap();
        outputs.save(&output(b.id, "default")).await.unwrap();

        assert_eq!(outputs.count().await.unwrap(), 3);
        assert_eq!(outputs.count_by_project(a.id).await.unwrap(), 2);
        assert_eq!(
            outputs.find_by_project_page(b.id, 10, 0).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_project_delete_cascades_outputs() {
        let pool = test_pool().await;
        let projects = SqliteProjectRepository::new(pool.clone());
        let outputs = SqliteOutputRepository::new(pool);

        let now = Utc::now();
        let project = ProjectRecord {
            id: Uuid::new_v4(),
            title: "demo".to_string(),
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        };
        projects.save(&project).await.unwrap();
        outputs.save(&output(project.id, "default")).await.unwrap();

        projects.delete(project.id).await.unwrap();
        assert_eq!(outputs.count().await.unwrap(), 0);
    }
}
