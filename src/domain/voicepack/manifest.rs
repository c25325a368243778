//! Voice Pack Context - Manifest
//!
//! manifest 解析与结构校验。条目级字段采取宽松捕获:
//! 类型不符的值降级为缺失，使条目级错误在上传循环内按位置报出，
//! 而不是在解析阶段整体失败。

use std::collections::HashSet;

use serde_json::Value;
use url::Url;

use super::errors::ImportError;

/// manifest 中的单个音色条目
///
/// 所有字段宽松捕获；必填性在 [`VoiceEntry::is_complete`] 中检查
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceEntry {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub gender: Option<String>,
    /// 必须为字符串类型（允许空串）；非字符串降级为 None
    pub notes: Option<String>,
    /// 非数组值降级为空
    pub tags: Vec<String>,
}

impl VoiceEntry {
    /// 从 JSON 值宽松构造
    fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let tags = value
            .get("tags")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: text("name"),
            file_name: text("file_name"),
            gender: text("gender"),
            notes: text("notes"),
            tags,
        }
    }

    /// 是否具备可导入的 name（非空）
    pub fn has_importable_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// 四个必填字段是否齐备
    ///
    /// name/file_name/gender 需非空字符串；notes 需为字符串（可为空串）
    pub fn is_complete(&self) -> bool {
        self.has_importable_name()
            && self.file_name.as_deref().is_some_and(|f| !f.is_empty())
            && self.gender.as_deref().is_some_and(|g| !g.is_empty())
            && self.notes.is_some()
    }
}

/// 解析后的 voice pack manifest
///
/// 每次导入尝试解析一次，此后不可变
#[derive(Debug, Clone)]
pub struct VoicePackManifest {
    pub version: Option<String>,
    pub author: Option<String>,
    pub repository: Option<String>,
    pub base: Option<String>,
    pub voices: Vec<VoiceEntry>,
    /// manifest 所在目录前缀（根目录为空串，否则以 `/` 结尾）
    manifest_dir: String,
}

impl VoicePackManifest {
    /// 解析 manifest 文本并做结构校验
    ///
    /// - 非法 JSON → `MalformedManifest`
    /// - `voices` 不是数组 → `InvalidManifestShape`
    /// - `repository` 非空但不是合法 URL → `InvalidRepositoryUrl`
    pub fn parse(text: &str, manifest_dir: impl Into<String>) -> Result<Self, ImportError> {
        let value: Value =
            serde_json::from_str(text).map_err(|_| ImportError::MalformedManifest)?;

        let voices = value
            .get("voices")
            .and_then(Value::as_array)
            .ok_or(ImportError::InvalidManifestShape)?
            .iter()
            .map(VoiceEntry::from_value)
            .collect();

        let text_field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let repository = text_field("repository");
        if let Some(repo) = repository.as_deref() {
            if !repo.is_empty() {
                Url::parse(repo).map_err(|_| ImportError::InvalidRepositoryUrl)?;
            }
        }

        Ok(Self {
            version: text_field("version"),
            author: text_field("author"),
            repository,
            base: text_field("base"),
            voices,
            manifest_dir: manifest_dir.into(),
        })
    }

    /// Dedup Filter: 过滤出候选条目
    ///
    /// 保留 name 非空且不在现有名称快照中的条目，保持原有顺序。
    /// manifest 内部的重名条目不做相互去重。
    pub fn candidates<'a>(&'a self, existing_names: &HashSet<String>) -> Vec<&'a VoiceEntry> {
        self.voices
            .iter()
            .filter(|entry| {
                entry
                    .name
                    .as_deref()
                    .is_some_and(|n| !n.is_empty() && !existing_names.contains(n))
            })
            .collect()
    }

    /// Entry Resolver: 计算条目音频在压缩包内的路径
    ///
    /// 路径 = manifest 目录 + (base 非空 ? base + "/" : "") + file_name
    pub fn resolve_entry_path(&self, file_name: &str) -> String {
        let base_path = match self.base.as_deref() {
            Some(base) if !base.is_empty() => {
                format!("{}{}/", self.manifest_dir, base)
            }
            _ => self.manifest_dir.clone(),
        };
        format!("{}{}", base_path, file_name)
    }

    /// 计算最终 notes：repository 非空时追加出处标注
    pub fn final_notes(&self, notes: &str) -> String {
        match self.repository.as_deref() {
            Some(repo) if !repo.is_empty() => format!("{} (via {})", notes, repo),
            _ => notes.to_string(),
        }
    }

    /// repository 是否非空
    pub fn has_repository(&self) -> bool {
        self.repository.as_deref().is_some_and(|r| !r.is_empty())
    }

    pub fn manifest_dir(&self) -> &str {
        &self.manifest_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[&VoiceEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| e.name.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = VoicePackManifest::parse(
            r#"{"version":"1.0","author":"a","repository":"","voices":[]}"#,
            "",
        )
        .unwrap();

        assert_eq!(manifest.version.as_deref(), Some("1.0"));
        assert_eq!(manifest.author.as_deref(), Some("a"));
        assert!(!manifest.has_repository());
        assert!(manifest.voices.is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = VoicePackManifest::parse("{not json", "").unwrap_err();
        assert!(matches!(err, ImportError::MalformedManifest));
    }

    #[test]
    fn test_parse_rejects_missing_voices_array() {
        let err = VoicePackManifest::parse(r#"{"voices":"nope"}"#, "").unwrap_err();
        assert!(matches!(err, ImportError::InvalidManifestShape));

        let err = VoicePackManifest::parse(r#"{"version":"1.0"}"#, "").unwrap_err();
        assert!(matches!(err, ImportError::InvalidManifestShape));
    }

    #[test]
    fn test_parse_rejects_invalid_repository_url() {
        let err = VoicePackManifest::parse(
            r#"{"repository":"not a url","voices":[]}"#,
            "",
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::InvalidRepositoryUrl));
    }

    #[test]
    fn test_parse_accepts_empty_repository() {
        let manifest =
            VoicePackManifest::parse(r#"{"repository":"","voices":[]}"#, "").unwrap();
        assert!(!manifest.has_repository());
    }

    #[test]
    fn test_entry_lenient_capture() {
        let manifest = VoicePackManifest::parse(
            r#"{"voices":[{"name":"V1","file_name":"v1.wav","gender":"female","notes":7,"tags":"x"}]}"#,
            "",
        )
        .unwrap();

        let entry = &manifest.voices[0];
        assert_eq!(entry.name.as_deref(), Some("V1"));
        // 非字符串 notes 降级为缺失，非数组 tags 降级为空
        assert!(entry.notes.is_none());
        assert!(entry.tags.is_empty());
        assert!(!entry.is_complete());
    }

    #[test]
    fn test_entry_completeness() {
        let manifest = VoicePackManifest::parse(
            r#"{"voices":[
                {"name":"A","file_name":"a.wav","gender":"female","notes":""},
                {"name":"B","gender":"male","notes":"n"},
                {"name":"","file_name":"c.wav","gender":"male","notes":"n"}
            ]}"#,
            "",
        )
        .unwrap();

        assert!(manifest.voices[0].is_complete());
        assert!(!manifest.voices[1].is_complete());
        assert!(!manifest.voices[2].has_importable_name());
    }

    #[test]
    fn test_candidates_exclude_existing_and_preserve_order() {
        let manifest = VoicePackManifest::parse(
            r#"{"voices":[
                {"name":"A"},{"name":"B"},{"name":"C"},{"name":""},{"name":"B"}
            ]}"#,
            "",
        )
        .unwrap();

        let existing: HashSet<String> = ["B".to_string()].into_iter().collect();
        let candidates = manifest.candidates(&existing);

        // B 被快照去重，空名被滤除；manifest 内部重名不互相去重
        assert_eq!(names(&candidates), vec!["A", "C"]);

        let candidates = manifest.candidates(&HashSet::new());
        assert_eq!(names(&candidates), vec!["A", "B", "C", "B"]);
    }

    #[test]
    fn test_resolve_entry_path() {
        let manifest =
            VoicePackManifest::parse(r#"{"voices":[]}"#, "pack/").unwrap();
        assert_eq!(manifest.resolve_entry_path("v1.wav"), "pack/v1.wav");

        let manifest =
            VoicePackManifest::parse(r#"{"base":"samples","voices":[]}"#, "pack/").unwrap();
        assert_eq!(
            manifest.resolve_entry_path("v1.wav"),
            "pack/samples/v1.wav"
        );

        let manifest =
            VoicePackManifest::parse(r#"{"base":"samples","voices":[]}"#, "").unwrap();
        assert_eq!(manifest.resolve_entry_path("v1.wav"), "samples/v1.wav");
    }

    #[test]
    fn test_final_notes_attribution() {
        let manifest = VoicePackManifest::parse(
            r#"{"repository":"https://example.com/pack","voices":[]}"#,
            "",
        )
        .unwrap();
        assert_eq!(
            manifest.final_notes("warm voice"),
            "warm voice (via https://example.com/pack)"
        );

        let manifest =
            VoicePackManifest::parse(r#"{"repository":"","voices":[]}"#, "").unwrap();
        assert_eq!(manifest.final_notes("warm voice"), "warm voice");
    }
}
