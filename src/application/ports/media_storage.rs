//! Media Storage Port - 出站端口
//!
//! 定义参考音频 / 生成音频 / 波形图文件的存储抽象接口

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Media Storage Port
///
/// 布局约定:
/// - 音色: {voices_dir}/{voice_id}.wav 与同名 .png 波形图
/// - 输出: {outputs_dir}/{project_id}/{output_id}.wav 与同名 .png
#[async_trait]
pub trait MediaStoragePort: Send + Sync {
    /// 音色参考音频路径
    fn voice_audio_path(&self, voice_id: Uuid) -> PathBuf;

    /// 音色波形图路径
    fn voice_waveform_path(&self, voice_id: Uuid) -> PathBuf;

    /// 输出音频路径
    fn output_audio_path(&self, project_id: Uuid, output_id: Uuid) -> PathBuf;

    /// 输出波形图路径
    fn output_waveform_path(&self, project_id: Uuid, output_id: Uuid) -> PathBuf;

    /// 保存音色参考音频
    async fn save_voice_audio(&self, voice_id: Uuid, data: &[u8]) -> Result<PathBuf, StorageError>;

    /// 保存音色波形图
    async fn save_voice_waveform(
        &self,
        voice_id: Uuid,
        data: &[u8],
    ) -> Result<PathBuf, StorageError>;

    /// 读取音色参考音频
    async fn read_voice_audio(&self, voice_id: Uuid) -> Result<Vec<u8>, StorageError>;

    /// 保存输出音频
    async fn save_output_audio(
        &self,
        project_id: Uuid,
        output_id: Uuid,
        data: &[u8],
    ) -> Result<PathBuf, StorageError>;

    /// 保存输出波形图
    async fn save_output_waveform(
        &self,
        project_id: Uuid,
        output_id: Uuid,
        data: &[u8],
    ) -> Result<PathBuf, StorageError>;

    /// 删除输出音频与波形图（缺失文件仅告警，不报错）
    async fn delete_output_files(&self, project_id: Uuid, output_id: Uuid);

    /// 递归删除项目输出目录（缺失仅告警）
    async fn delete_project_dir(&self, project_id: Uuid);
}
