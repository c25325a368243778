//! Import Command Handlers - voice pack 导入管线
//!
//! 控制流: Archive Reader → Manifest Validator →
//! (循环: Entry Resolver → Size Gate → Upload Submitter) → Reporter
//!
//! 严格串行：每次压缩包读取、每次上传都等待完成后再继续，
//! 保证进度计数稳定有序，也避免压垮音色创建端点。
//! 中途失败不回滚已创建的音色（at-least-once 语义）。

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::application::commands::{BeginPackImport, ConfirmPackImport, DiscardPackImport};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CreatedVoice, ImportManagerPort, ImportState, NewVoiceUpload, VoiceCreatorPort,
    VoiceRepositoryPort,
};
use crate::domain::voicepack::{
    ImportError, PackArchive, VoiceEntry, VoicePackManifest,
};

// ============================================================================
// BeginPackImport
// ============================================================================

/// 解析结果（confirming 暂停点展示给用户的 pack 信息）
#[derive(Debug, Clone)]
pub struct BeginPackImportResponse {
    pub session_id: Uuid,
    pub state: ImportState,
    pub version: Option<String>,
    pub author: Option<String>,
    pub repository: Option<String>,
    pub voice_count: usize,
}

/// BeginPackImport Handler
///
/// 结构性校验全部发生在这里，任何上传之前：
/// manifest 定位 → JSON 解析 → voices 数组形状 → repository URL
pub struct BeginPackImportHandler {
    import_manager: Arc<dyn ImportManagerPort>,
}

impl BeginPackImportHandler {
    pub fn new(import_manager: Arc<dyn ImportManagerPort>) -> Self {
        Self { import_manager }
    }

    pub async fn handle(
        &self,
        command: BeginPackImport,
    ) -> Result<BeginPackImportResponse, ApplicationError> {
        let archive = PackArchive::open(&command.archive)?;
        let (text, location) = archive.manifest_text()?;
        let manifest = VoicePackManifest::parse(&text, location.dir)?;

        let session = self.import_manager.create(manifest, archive);

        tracing::info!(
            session_id = %session.id,
            voice_count = session.manifest.voices.len(),
            manifest_dir = %session.manifest.manifest_dir(),
            "Voice pack parsed, awaiting confirmation"
        );

        Ok(BeginPackImportResponse {
            session_id: session.id,
            state: session.state,
            version: session.manifest.version.clone(),
            author: session.manifest.author.clone(),
            repository: session.manifest.repository.clone(),
            voice_count: session.manifest.voices.len(),
        })
    }
}

// ============================================================================
// ConfirmPackImport
// ============================================================================

/// 导入完成结果
#[derive(Debug, Clone)]
pub struct ConfirmPackImportResponse {
    pub session_id: Uuid,
    /// 本次创建的音色（保持上传顺序）
    pub created: Vec<CreatedVoice>,
    /// 超限跳过的音色名（非致命，作为警告整体上报）
    pub skipped: Vec<String>,
}

/// ConfirmPackImport Handler
///
/// 现有名称快照在管线启动前取一次；Dedup Filter 在循环前执行一次，
/// total 只统计候选（非重名）条目。manifest 内部重名不互相去重。
pub struct ConfirmPackImportHandler {
    import_manager: Arc<dyn ImportManagerPort>,
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    voice_creator: Arc<dyn VoiceCreatorPort>,
    max_voice_file_size: u64,
}

impl ConfirmPackImportHandler {
    pub fn new(
        import_manager: Arc<dyn ImportManagerPort>,
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        voice_creator: Arc<dyn VoiceCreatorPort>,
        max_voice_file_size: u64,
    ) -> Self {
        Self {
            import_manager,
            voice_repo,
            voice_creator,
            max_voice_file_size,
        }
    }

    pub async fn handle(
        &self,
        command: ConfirmPackImport,
    ) -> Result<ConfirmPackImportResponse, ApplicationError> {
        let session_id = command.session_id;
        let session = self
            .import_manager
            .get(session_id)
            .ok_or_else(|| ApplicationError::not_found("Import session", session_id))?;

        let manifest = session.manifest.clone();
        let archive = session.archive.clone();

        // 现有音色名称快照（管线启动前取一次）
        let existing: HashSet<String> =
            self.voice_repo.find_names().await?.into_iter().collect();

        // Dedup Filter：一次性过滤，total 只含候选条目
        let candidates = manifest.candidates(&existing);
        self.import_manager
            .begin_upload(session_id, candidates.len())?;

        tracing::info!(
            session_id = %session_id,
            candidates = candidates.len(),
            existing = existing.len(),
            "Voice pack upload started"
        );

        match self
            .run_pipeline(session_id, &manifest, &archive, &candidates)
            .await
        {
            Ok(()) => {
                let session = self.import_manager.complete(session_id)?;
                if !session.skipped.is_empty() {
                    tracing::warn!(
                        session_id = %session_id,
                        skipped = ?session.skipped,
                        "Some voices exceeded the size limit and were skipped"
                    );
                }
                tracing::info!(
                    session_id = %session_id,
                    created = session.created.len(),
                    skipped = session.skipped.len(),
                    "Voice pack import completed"
                );
                Ok(ConfirmPackImportResponse {
                    session_id,
                    created: session.created,
                    skipped: session.skipped,
                })
            }
            Err(err) => {
                // 已上传的条目保持已创建，不做补偿删除
                let message = err.to_string();
                let _ = self.import_manager.fail(session_id, message);
                tracing::error!(session_id = %session_id, error = %err, "Voice pack import aborted");
                Err(err.into())
            }
        }
    }

    /// 串行上传循环
    async fn run_pipeline(
        &self,
        session_id: Uuid,
        manifest: &VoicePackManifest,
        archive: &PackArchive,
        candidates: &[&VoiceEntry],
    ) -> Result<(), ImportError> {
        for (index, entry) in candidates.iter().enumerate() {
            // Entry Resolver：必填字段检查（位置从 1 起，针对候选列表）
            if !entry.is_complete() {
                return Err(ImportError::InvalidEntry {
                    position: index + 1,
                });
            }

            let name = entry.name.clone().unwrap_or_default();
            let file_name = entry.file_name.clone().unwrap_or_default();

            let resolved_path = manifest.resolve_entry_path(&file_name);
            let payload = archive.entry(&resolved_path).ok_or_else(|| {
                ImportError::FileNotFoundInArchive {
                    name: name.clone(),
                    file_name: file_name.clone(),
                    resolved_path: resolved_path.clone(),
                }
            })?;

            // Size Gate：超限记为 skip，不中止管线
            if payload.len() as u64 > self.max_voice_file_size {
                tracing::warn!(
                    session_id = %session_id,
                    name = %name,
                    size = payload.len(),
                    limit = self.max_voice_file_size,
                    "Voice exceeds size limit, skipping"
                );
                let _ = self.import_manager.record_skipped(session_id, name);
                continue;
            }

            // Upload Submitter：非成功响应立即中止，已创建条目保留
            let upload = NewVoiceUpload {
                file_name,
                payload: payload.to_vec(),
                name: name.clone(),
                notes: manifest.final_notes(entry.notes.as_deref().unwrap_or_default()),
                gender: entry.gender.clone().unwrap_or_default(),
                tags: entry.tags.clone(),
            };

            let created = self.voice_creator.create_voice(upload).await.map_err(|e| {
                tracing::error!(
                    session_id = %session_id,
                    name = %name,
                    error = %e,
                    "Voice upload failed"
                );
                ImportError::UploadFailed { name: name.clone() }
            })?;

            let _ = self.import_manager.record_uploaded(session_id, created);
        }

        Ok(())
    }
}

// ============================================================================
// DiscardPackImport
// ============================================================================

/// DiscardPackImport Handler
pub struct DiscardPackImportHandler {
    import_manager: Arc<dyn ImportManagerPort>,
}

impl DiscardPackImportHandler {
    pub fn new(import_manager: Arc<dyn ImportManagerPort>) -> Self {
        Self { import_manager }
    }

    pub async fn handle(&self, command: DiscardPackImport) -> Result<(), ApplicationError> {
        self.import_manager.discard(command.session_id)?;

        tracing::info!(session_id = %command.session_id, "Import session discarded");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        RepositoryError, VoiceCreatorError, VoiceRecord, VoiceUpdate,
    };
    use crate::infrastructure::memory::InMemoryImportManager;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    // ------------------------------------------------------------------
    // 测试替身
    // ------------------------------------------------------------------

    /// 只提供名称快照的 Voice Repository
    struct StubVoiceRepo {
        names: Vec<String>,
    }

    impl StubVoiceRepo {
        fn new(names: &[&str]) -> Self {
            Self {
                names: names.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl VoiceRepositoryPort for StubVoiceRepo {
        async fn save(&self, _voice: &VoiceRecord) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<VoiceRecord>, RepositoryError> {
            Ok(None)
        }

        async fn search_page(
            &self,
            _search: &str,
            _limit: u32,
            _offset: u32,
        ) -> Result<Vec<VoiceRecord>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn count(&self, _search: &str) -> Result<u64, RepositoryError> {
            Ok(0)
        }

        async fn find_names(&self) -> Result<Vec<String>, RepositoryError> {
            Ok(self.names.clone())
        }

        async fn update(
            &self,
            id: Uuid,
            _update: &VoiceUpdate,
        ) -> Result<VoiceRecord, RepositoryError> {
            Err(RepositoryError::NotFound(id.to_string()))
        }

        async fn soft_delete(&self, _id: Uuid) -> Result<bool, RepositoryError> {
            Ok(false)
        }
    }

    /// 记录所有提交的 Voice Creator；可配置在第 N 次调用时失败
    struct RecordingVoiceCreator {
        calls: Mutex<Vec<NewVoiceUpload>>,
        fail_on_call: Option<usize>,
    }

    impl RecordingVoiceCreator {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on_call: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on_call: Some(call),
            }
        }

        fn calls(&self) -> Vec<NewVoiceUpload> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VoiceCreatorPort for RecordingVoiceCreator {
        async fn create_voice(
            &self,
            upload: NewVoiceUpload,
        ) -> Result<CreatedVoice, VoiceCreatorError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(upload.clone());
            if self.fail_on_call == Some(calls.len()) {
                return Err(VoiceCreatorError::EndpointError("HTTP 500".to_string()));
            }
            let upload = calls.last().unwrap();
            Ok(CreatedVoice {
                id: Uuid::new_v4().to_string(),
                name: upload.name.clone(),
                notes: upload.notes.clone(),
                gender: Some(upload.gender.clone()),
                is_favorite: false,
                tags: upload.tags.clone(),
                created_at: String::new(),
                updated_at: String::new(),
            })
        }
    }

    fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (path, data) in files {
            writer
                .start_file(*path, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    struct Harness {
        manager: Arc<InMemoryImportManager>,
        creator: Arc<RecordingVoiceCreator>,
        begin: BeginPackImportHandler,
        confirm: ConfirmPackImportHandler,
    }

    fn harness(existing: &[&str], creator: RecordingVoiceCreator, max_size: u64) -> Harness {
        let manager = Arc::new(InMemoryImportManager::new());
        let creator = Arc::new(creator);
        let begin = BeginPackImportHandler::new(manager.clone());
        let confirm = ConfirmPackImportHandler::new(
            manager.clone(),
            Arc::new(StubVoiceRepo::new(existing)),
            creator.clone(),
            max_size,
        );
        Harness {
            manager,
            creator,
            begin,
            confirm,
        }
    }

    const MAX_SIZE: u64 = 5 * 1024 * 1024;

    // ------------------------------------------------------------------
    // 端到端：解析 + 确认
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_happy_path_single_voice() {
        let zip = build_zip(&[
            (
                "voices.json",
                br#"{"version":"1.0","author":"a","repository":"","voices":[{"name":"V1","file_name":"v1.wav","gender":"female","notes":"n"}]}"#,
            ),
            ("v1.wav", &[0u8; 1024]),
        ]);
        let h = harness(&[], RecordingVoiceCreator::new(), MAX_SIZE);

        let parsed = h.begin.handle(BeginPackImport { archive: zip }).await.unwrap();
        assert_eq!(parsed.state, ImportState::Confirming);
        assert_eq!(parsed.voice_count, 1);
        assert_eq!(parsed.version.as_deref(), Some("1.0"));

        let result = h
            .confirm
            .handle(ConfirmPackImport {
                session_id: parsed.session_id,
            })
            .await
            .unwrap();

        assert_eq!(result.created.len(), 1);
        assert_eq!(result.created[0].name, "V1");
        assert!(result.skipped.is_empty());

        let session = h.manager.get(parsed.session_id).unwrap();
        assert_eq!(session.state, ImportState::Done);
        assert_eq!(session.progress.current, 1);
        assert_eq!(session.progress.total, 1);
    }

    #[tokio::test]
    async fn test_oversized_voice_is_skipped_not_failed() {
        let big = vec![0u8; 6 * 1024 * 1024];
        let zip = build_zip(&[
            (
                "voices.json",
                br#"{"version":"1.0","author":"a","repository":"","voices":[{"name":"V1","file_name":"v1.wav","gender":"female","notes":"n"}]}"#,
            ),
            ("v1.wav", &big),
        ]);
        let h = harness(&[], RecordingVoiceCreator::new(), MAX_SIZE);

        let parsed = h.begin.handle(BeginPackImport { archive: zip }).await.unwrap();
        let result = h
            .confirm
            .handle(ConfirmPackImport {
                session_id: parsed.session_id,
            })
            .await
            .unwrap();

        // 超限条目跳过且不触发任何创建调用，终态仍为 done
        assert!(result.created.is_empty());
        assert_eq!(result.skipped, vec!["V1".to_string()]);
        assert!(h.creator.calls().is_empty());
        let session = h.manager.get(parsed.session_id).unwrap();
        assert_eq!(session.state, ImportState::Done);
        assert_eq!(session.progress.current, 1);
    }

    #[tokio::test]
    async fn test_second_run_with_refreshed_snapshot_uploads_nothing() {
        let manifest = br#"{"voices":[{"name":"V1","file_name":"v1.wav","gender":"female","notes":"n"}]}"#;
        let zip = build_zip(&[("voices.json", manifest), ("v1.wav", &[0u8; 512])]);

        // 第一轮：空快照，V1 上传
        let h = harness(&[], RecordingVoiceCreator::new(), MAX_SIZE);
        let parsed = h
            .begin
            .handle(BeginPackImport {
                archive: zip.clone(),
            })
            .await
            .unwrap();
        let first = h
            .confirm
            .handle(ConfirmPackImport {
                session_id: parsed.session_id,
            })
            .await
            .unwrap();
        assert_eq!(first.created.len(), 1);

        // 第二轮：快照已包含 V1，零上传
        let h = harness(&["V1"], RecordingVoiceCreator::new(), MAX_SIZE);
        let parsed = h.begin.handle(BeginPackImport { archive: zip }).await.unwrap();
        let second = h
            .confirm
            .handle(ConfirmPackImport {
                session_id: parsed.session_id,
            })
            .await
            .unwrap();
        assert!(second.created.is_empty());
        assert!(h.creator.calls().is_empty());
        let session = h.manager.get(parsed.session_id).unwrap();
        assert_eq!(session.progress.total, 0);
        assert_eq!(session.state, ImportState::Done);
    }

    // ------------------------------------------------------------------
    // 中止语义
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_invalid_entry_aborts_after_earlier_upload() {
        // 顺序 [valid, invalid]：合法条目先完成创建调用，再触发 InvalidEntry 中止
        let zip = build_zip(&[
            (
                "voices.json",
                br#"{"voices":[
                    {"name":"Good","file_name":"g.wav","gender":"female","notes":"n"},
                    {"name":"Bad","gender":"male","notes":"n"}
                ]}"#,
            ),
            ("g.wav", &[0u8; 64]),
        ]);
        let h = harness(&[], RecordingVoiceCreator::new(), MAX_SIZE);

        let parsed = h.begin.handle(BeginPackImport { archive: zip }).await.unwrap();
        let err = h
            .confirm
            .handle(ConfirmPackImport {
                session_id: parsed.session_id,
            })
            .await
            .unwrap_err();

        assert!(err
            .to_string()
            .contains("Invalid entry for voice #2"));

        // 部分副作用可观测：Good 的创建调用已发出且不回滚
        let calls = h.creator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "Good");

        let session = h.manager.get(parsed.session_id).unwrap();
        assert_eq!(session.state, ImportState::Error);
        assert_eq!(session.created.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_with_entry_name() {
        let zip = build_zip(&[
            (
                "voices.json",
                br#"{"voices":[
                    {"name":"A","file_name":"a.wav","gender":"female","notes":""},
                    {"name":"B","file_name":"b.wav","gender":"male","notes":""}
                ]}"#,
            ),
            ("a.wav", &[0u8; 16]),
            ("b.wav", &[0u8; 16]),
        ]);
        let h = harness(&[], RecordingVoiceCreator::failing_on(2), MAX_SIZE);

        let parsed = h.begin.handle(BeginPackImport { archive: zip }).await.unwrap();
        let err = h
            .confirm
            .handle(ConfirmPackImport {
                session_id: parsed.session_id,
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to upload voice 'B'.");
        let session = h.manager.get(parsed.session_id).unwrap();
        assert_eq!(session.state, ImportState::Error);
        assert_eq!(session.created.len(), 1);
        assert_eq!(session.progress.current, 1);
    }

    #[tokio::test]
    async fn test_missing_file_reports_resolved_path() {
        let zip = build_zip(&[(
            "pack/voices.json",
            br#"{"base":"samples","voices":[{"name":"V","file_name":"v.wav","gender":"f","notes":""}]}"#,
        )]);
        let h = harness(&[], RecordingVoiceCreator::new(), MAX_SIZE);

        let parsed = h.begin.handle(BeginPackImport { archive: zip }).await.unwrap();
        let err = h
            .confirm
            .handle(ConfirmPackImport {
                session_id: parsed.session_id,
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "File v.wav not found in zip for voice 'V'. Expected at: pack/samples/v.wav"
        );
        assert!(h.creator.calls().is_empty());
    }

    // ------------------------------------------------------------------
    // 结构性错误在任何上传之前报出
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_invalid_repository_url_fails_before_resolution() {
        let zip = build_zip(&[
            (
                "voices.json",
                br#"{"repository":"not a url","voices":[{"name":"V1","file_name":"v1.wav","gender":"f","notes":""}]}"#,
            ),
            ("v1.wav", &[0u8; 16]),
        ]);
        let h = harness(&[], RecordingVoiceCreator::new(), MAX_SIZE);

        let err = h.begin.handle(BeginPackImport { archive: zip }).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "repository must be a valid URL when provided."
        );
        assert!(h.creator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_repository_attribution_in_notes() {
        let zip = build_zip(&[
            (
                "voices.json",
                br#"{"repository":"https://example.com/p","voices":[{"name":"V1","file_name":"v1.wav","gender":"f","notes":"warm","tags":["calm"]}]}"#,
            ),
            ("v1.wav", &[0u8; 16]),
        ]);
        let h = harness(&[], RecordingVoiceCreator::new(), MAX_SIZE);

        let parsed = h.begin.handle(BeginPackImport { archive: zip }).await.unwrap();
        h.confirm
            .handle(ConfirmPackImport {
                session_id: parsed.session_id,
            })
            .await
            .unwrap();

        let calls = h.creator.calls();
        assert_eq!(calls[0].notes, "warm (via https://example.com/p)");
        assert_eq!(calls[0].tags, vec!["calm".to_string()]);
    }

    #[tokio::test]
    async fn test_dedup_filter_excludes_existing_names() {
        let zip = build_zip(&[
            (
                "voices.json",
                br#"{"voices":[
                    {"name":"A","file_name":"a.wav","gender":"f","notes":""},
                    {"name":"B","file_name":"b.wav","gender":"f","notes":""},
                    {"name":"C","file_name":"c.wav","gender":"f","notes":""}
                ]}"#,
            ),
            ("a.wav", &[0u8; 8]),
            ("b.wav", &[0u8; 8]),
            ("c.wav", &[0u8; 8]),
        ]);
        let h = harness(&["B"], RecordingVoiceCreator::new(), MAX_SIZE);

        let parsed = h.begin.handle(BeginPackImport { archive: zip }).await.unwrap();
        let result = h
            .confirm
            .handle(ConfirmPackImport {
                session_id: parsed.session_id,
            })
            .await
            .unwrap();

        // 快照中的 B 被滤除，其余保持顺序；total 只含候选条目
        let names: Vec<&str> = result.created.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        let session = h.manager.get(parsed.session_id).unwrap();
        assert_eq!(session.progress.total, 2);
    }

    #[tokio::test]
    async fn test_discard_only_from_confirming() {
        let zip = build_zip(&[("voices.json", br#"{"voices":[]}"#)]);
        let h = harness(&[], RecordingVoiceCreator::new(), MAX_SIZE);
        let discard = DiscardPackImportHandler::new(h.manager.clone());

        let parsed = h.begin.handle(BeginPackImport { archive: zip }).await.unwrap();
        discard
            .handle(DiscardPackImport {
                session_id: parsed.session_id,
            })
            .await
            .unwrap();

        // 会话已移除，回到 idle
        assert!(h.manager.get(parsed.session_id).is_none());
    }
}
