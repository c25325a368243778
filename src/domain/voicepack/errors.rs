//! Voice Pack Context - Errors
//!
//! 导入管线错误分类:
//! - 结构性错误（manifest 定位/解析/校验）: 任何上传发生前即中止
//! - 条目错误（字段缺失/文件缺失）: 循环中途中止，已上传条目不回滚
//! - 上传错误: 同上
//! - 超限跳过不是错误，由管线记录为 skip

use thiserror::Error;

/// Voice pack 导入错误
///
/// 错误消息原样透传给 UI 层，不做二次包装
#[derive(Debug, Clone, Error)]
pub enum ImportError {
    #[error("Failed to read voice pack archive: {0}")]
    ArchiveError(String),

    #[error("voices.json not found in zip (checked root and first level directories).")]
    ManifestNotFound,

    #[error("Multiple voices.json files found in first level directories.")]
    AmbiguousManifest,

    #[error("voices.json is not valid JSON.")]
    MalformedManifest,

    #[error("voices.json must contain a voices array.")]
    InvalidManifestShape,

    #[error("repository must be a valid URL when provided.")]
    InvalidRepositoryUrl,

    #[error("Invalid entry for voice #{position}. Required: name, file_name, gender, notes.")]
    InvalidEntry { position: usize },

    #[error("File {file_name} not found in zip for voice '{name}'. Expected at: {resolved_path}")]
    FileNotFoundInArchive {
        name: String,
        file_name: String,
        resolved_path: String,
    },

    #[error("Failed to upload voice '{name}'.")]
    UploadFailed { name: String },
}

impl ImportError {
    /// 是否属于结构性错误（发生在任何上传之前）
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ImportError::ArchiveError(_)
                | ImportError::ManifestNotFound
                | ImportError::AmbiguousManifest
                | ImportError::MalformedManifest
                | ImportError::InvalidManifestShape
                | ImportError::InvalidRepositoryUrl
        )
    }
}
