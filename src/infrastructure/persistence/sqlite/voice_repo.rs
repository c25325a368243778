//! SQLite Voice Repository
//!
//! tags 通过 GROUP_CONCAT 聚合；列表/计数排除软删除行。
//! 部分更新针对固定字段集合，每个字段单独一条参数化语句，
//! 调用方键名永不进入 SQL 文本。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{
    RepositoryError, VoiceRecord, VoiceRepositoryPort, VoiceUpdate,
};

/// SQLite Voice Repository
pub struct SqliteVoiceRepository {
    pool: DbPool,
}

impl SqliteVoiceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const VOICE_SELECT: &str = r#"
    SELECT v.id, v.name, v.notes, v.gender, v.is_favorite,
           v.created_at, v.updated_at, GROUP_CONCAT(vt.tag) AS tags
    FROM voices v
    LEFT JOIN voice_tags vt ON v.id = vt.voice_id
"#;

#[derive(FromRow)]
struct VoiceRow {
    id: String,
    name: String,
    notes: String,
    gender: Option<String>,
    is_favorite: i64,
    created_at: String,
    updated_at: String,
    tags: Option<String>,
}

impl TryFrom<VoiceRow> for VoiceRecord {
    type Error = RepositoryError;

    fn try_from(row: VoiceRow) -> Result<Self, Self::Error> {
        Ok(VoiceRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            name: row.name,
            notes: row.notes,
            gender: row.gender,
            is_favorite: row.is_favorite != 0,
            tags: row
                .tags
                .map(|t| t.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&row.updated_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

impl SqliteVoiceRepository {
    async fn replace_tags(&self, id: Uuid, tags: &[String]) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM voice_tags WHERE voice_id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        for tag in tags {
            sqlx::query("INSERT INTO voice_tags (voice_id, tag) VALUES (?, ?)")
                .bind(id.to_string())
                .bind(tag)
                .execute(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }

        Ok(())
    }
}

#[async_trait]
impl VoiceRepositoryPort for SqliteVoiceRepository {
    async fn save(&self, voice: &VoiceRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO voices (id, name, notes, gender, is_favorite, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(voice.id.to_string())
        .bind(&voice.name)
        .bind(&voice.notes)
        .bind(&voice.gender)
        .bind(voice.is_favorite as i64)
        .bind(voice.created_at.to_rfc3339())
        .bind(voice.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if !voice.tags.is_empty() {
            self.replace_tags(voice.id, &voice.tags).await?;
        }

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VoiceRecord>, RepositoryError> {
        let sql = format!("{} WHERE v.id = ? GROUP BY v.id", VOICE_SELECT);
        let row: Option<VoiceRow> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(VoiceRecord::try_from).transpose()
    }

    async fn search_page(
        &self,
        search: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<VoiceRecord>, RepositoryError> {
        // 空搜索词得到 '%%'，对 NOT NULL 的 name 恒为真
        let pattern = format!("%{}%", search);
        let sql = format!(
            r#"{}
            WHERE v.deleted_at IS NULL AND (v.name LIKE ? OR v.notes LIKE ?)
            GROUP BY v.id
            ORDER BY v.created_at DESC
            LIMIT ? OFFSET ?
            "#,
            VOICE_SELECT
        );

        let rows: Vec<VoiceRow> = sqlx::query_as(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(VoiceRecord::try_from).collect()
    }

    async fn count(&self, search: &str) -> Result<u64, RepositoryError> {
        let pattern = format!("%{}%", search);
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM voices v
            WHERE v.deleted_at IS NULL AND (v.name LIKE ? OR v.notes LIKE ?)
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(total as u64)
    }

    async fn find_names(&self) -> Result<Vec<String>, RepositoryError> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT name FROM voices WHERE deleted_at IS NULL")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(names)
    }

    async fn update(
        &self,
        id: Uuid,
        update: &VoiceUpdate,
    ) -> Result<VoiceRecord, RepositoryError> {
        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM voices WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if exists.is_none() {
            return Err(RepositoryError::NotFound(format!("Voice {}", id)));
        }

        if let Some(name) = &update.name {
            sqlx::query("UPDATE voices SET name = ? WHERE id = ?")
                .bind(name)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }
        if let Some(notes) = &update.notes {
            sqlx::query("UPDATE voices SET notes = ? WHERE id = ?")
                .bind(notes)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }
        if let Some(gender) = &update.gender {
            sqlx::query("UPDATE voices SET gender = ? WHERE id = ?")
                .bind(gender)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }
        if let Some(is_favorite) = update.is_favorite {
            sqlx::query("UPDATE voices SET is_favorite = ? WHERE id = ?")
                .bind(is_favorite as i64)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }

        sqlx::query("UPDATE voices SET updated_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if let Some(tags) = &update.tags {
            self.replace_tags(id, tags).await?;
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Voice {}", id)))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE voices SET deleted_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn test_repo() -> SqliteVoiceRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteVoiceRepository::new(pool)
    }

    fn voice(name: &str, notes: &str, tags: &[&str]) -> VoiceRecord {
        let now = Utc::now();
        VoiceRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            notes: notes.to_string(),
            gender: Some("female".to_string()),
            is_favorite: false,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_save_and_find_with_tags() {
        let repo = test_repo().await;
        let v = voice("Aria", "warm", &["calm", "narration"]);
        repo.save(&v).await.unwrap();

        let found = repo.find_by_id(v.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Aria");
        assert_eq!(found.tags.len(), 2);
        assert!(found.tags.contains(&"calm".to_string()));
    }

    #[tokio::test]
    async fn test_search_matches_name_or_notes() {
        let repo = test_repo().await;
        repo.save(&voice("Aria", "warm tone", &[])).await.unwrap();
        repo.save(&voice("Brio", "bright", &[])).await.unwrap();

        let hits = repo.search_page("warm", 10, 0).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Aria");

        let hits = repo.search_page("Brio", 10, 0).await.unwrap();
        assert_eq!(hits.len(), 1);

        // 空搜索词匹配全部
        let hits = repo.search_page("", 10, 0).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(repo.count("").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_listing() {
        let repo = test_repo().await;
        let v = voice("Aria", "", &[]);
        repo.save(&v).await.unwrap();

        assert!(repo.soft_delete(v.id).await.unwrap());
        assert_eq!(repo.search_page("", 10, 0).await.unwrap().len(), 0);
        assert_eq!(repo.count("").await.unwrap(), 0);
        assert!(repo.find_names().await.unwrap().is_empty());

        // 详情接口仍可按 ID 取到
        assert!(repo.find_by_id(v.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_partial_update_touches_only_present_fields() {
        let repo = test_repo().await;
        let v = voice("Aria", "old notes", &["a"]);
        repo.save(&v).await.unwrap();

        let updated = repo
            .update(
                v.id,
                &VoiceUpdate {
                    notes: Some("new notes".to_string()),
                    is_favorite: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Aria");
        assert_eq!(updated.notes, "new notes");
        assert!(updated.is_favorite);
        assert_eq!(updated.tags, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_update_replaces_tags_when_provided() {
        let repo = test_repo().await;
        let v = voice("Aria", "", &["a", "b"]);
        repo.save(&v).await.unwrap();

        let updated = repo
            .update(
                v.id,
                &VoiceUpdate {
                    tags: Some(vec!["c".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.tags, vec!["c".to_string()]);
    }

    #[tokio::test]
    async fn test_update_unknown_voice_is_not_found() {
        let repo = test_repo().await;
        let err = repo
            .update(Uuid::new_v4(), &VoiceUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
