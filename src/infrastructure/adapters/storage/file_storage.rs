//! File Media Storage - 文件系统媒体存储实现
//!
//! 实现 MediaStoragePort trait
//!
//! 布局:
//! - {voices_dir}/{voice_id}.wav / .png
//! - {outputs_dir}/{project_id}/{output_id}.wav / .png

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{MediaStoragePort, StorageError};

/// 文件系统媒体存储
pub struct FileMediaStorage {
    voices_dir: PathBuf,
    outputs_dir: PathBuf,
}

impl FileMediaStorage {
    /// 创建新的文件存储，确保根目录存在
    pub async fn new(
        voices_dir: impl AsRef<Path>,
        outputs_dir: impl AsRef<Path>,
    ) -> Result<Self, StorageError> {
        let voices_dir = voices_dir.as_ref().to_path_buf();
        let outputs_dir = outputs_dir.as_ref().to_path_buf();

        fs::create_dir_all(&voices_dir)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        fs::create_dir_all(&outputs_dir)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(Self {
            voices_dir,
            outputs_dir,
        })
    }

    fn project_dir(&self, project_id: Uuid) -> PathBuf {
        self.outputs_dir.join(project_id.to_string())
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::IoError(e.to_string()))?;
        }
        fs::write(path, data)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))
    }
}

#[async_trait]
impl MediaStoragePort for FileMediaStorage {
    fn voice_audio_path(&self, voice_id: Uuid) -> PathBuf {
        self.voices_dir.join(format!("{}.wav", voice_id))
    }

    fn voice_waveform_path(&self, voice_id: Uuid) -> PathBuf {
        self.voices_dir.join(format!("{}.png", voice_id))
    }

    fn output_audio_path(&self, project_id: Uuid, output_id: Uuid) -> PathBuf {
        self.project_dir(project_id).join(format!("{}.wav", output_id))
    }

    fn output_waveform_path(&self, project_id: Uuid, output_id: Uuid) -> PathBuf {
        self.project_dir(project_id).join(format!("{}.png", output_id))
    }

    async fn save_voice_audio(&self, voice_id: Uuid, data: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.voice_audio_path(voice_id);
        self.write_file(&path, data).await?;

        tracing::debug!(voice_id = %voice_id, size = data.len(), "Saved voice audio");

        Ok(path)
    }

    async fn save_voice_waveform(
        &self,
        voice_id: Uuid,
        data: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let path = self.voice_waveform_path(voice_id);
        self.write_file(&path, data).await?;
        Ok(path)
    }

    async fn read_voice_audio(&self, voice_id: Uuid) -> Result<Vec<u8>, StorageError> {
        let path = self.voice_audio_path(voice_id);
        if !path.exists() {
            return Err(StorageError::FileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        fs::read(&path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    async fn save_output_audio(
        &self,
        project_id: Uuid,
        output_id: Uuid,
        data: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let path = self.output_audio_path(project_id, output_id);
        self.write_file(&path, data).await?;

        tracing::debug!(
            project_id = %project_id,
            output_id = %output_id,
            size = data.len(),
            "Saved output audio"
        );

        Ok(path)
    }

    async fn save_output_waveform(
        &self,
        project_id: Uuid,
        output_id: Uuid,
        data: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let path = self.output_waveform_path(project_id, output_id);
        self.write_file(&path, data).await?;
        Ok(path)
    }

    async fn delete_output_files(&self, project_id: Uuid, output_id: Uuid) {
        for path in [
            self.output_audio_path(project_id, output_id),
            self.output_waveform_path(project_id, output_id),
        ] {
            if let Err(e) = fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %e, "Output file not found or could not be deleted");
            }
        }
    }

    async fn delete_project_dir(&self, project_id: Uuid) {
        let dir = self.project_dir(project_id);
        if let Err(e) = fs::remove_dir_all(&dir).await {
            tracing::warn!(
                path = %dir.display(),
                error = %e,
                "Project directory not found or could not be deleted"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn test_storage() -> (FileMediaStorage, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let storage = FileMediaStorage::new(dir.path().join("voices"), dir.path().join("outputs"))
            .await
            .unwrap();
        (storage, dir)
    }

    #[tokio::test]
    async fn test_voice_audio_roundtrip() {
        let (storage, _dir) = test_storage().await;
        let id = Uuid::new_v4();

        storage.save_voice_audio(id, b"wav-bytes").await.unwrap();
        let data = storage.read_voice_audio(id).await.unwrap();
        assert_eq!(data, b"wav-bytes");
    }

    #[tokio::test]
    async fn test_missing_voice_audio_is_not_found() {
        let (storage, _dir) = test_storage().await;
        let err = storage.read_voice_audio(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StorageError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_output_files_live_under_project_dir() {
        let (storage, _dir) = test_storage().await;
        let project_id = Uuid::new_v4();
        let output_id = Uuid::new_v4();

        let path = storage
            .save_output_audio(project_id, output_id, b"wav")
            .await
            .unwrap();
        assert!(path.to_string_lossy().contains(&project_id.to_string()));
        assert!(path.exists());

        storage
            .save_output_waveform(project_id, output_id, b"png")
            .await
            .unwrap();

        storage.delete_project_dir(project_id).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_delete_output_files_tolerates_missing() {
        let (storage, _dir) = test_storage().await;
        // 不应 panic，仅记录告警
        storage
            .delete_output_files(Uuid::new_v4(), Uuid::new_v4())
            .await;
    }
}
