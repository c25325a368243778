//! In-Memory Import Manager Implementation
//!
//! 导入会话全部驻留内存：进程重启即回到 idle。
//! 状态机约束在这里强制执行（confirming → uploading → done | error）。

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{
    CreatedVoice, ImportManagerPort, ImportProgress, ImportSession, ImportSessionError,
    ImportState,
};
use crate::domain::voicepack::{PackArchive, VoicePackManifest};

/// 内存导入会话管理器
pub struct InMemoryImportManager {
    /// session_id -> ImportSession
    sessions: DashMap<Uuid, ImportSession>,
}

impl InMemoryImportManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryImportManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportManagerPort for InMemoryImportManager {
    fn create(&self, manifest: VoicePackManifest, archive: PackArchive) -> ImportSession {
        let session = ImportSession {
            id: Uuid::new_v4(),
            state: ImportState::Confirming,
            manifest: Arc::new(manifest),
            archive: Arc::new(archive),
            progress: ImportProgress::default(),
            created: Vec::new(),
            skipped: Vec::new(),
            error: None,
            created_at: Utc::now(),
        };

        self.sessions.insert(session.id, session.clone());

        tracing::debug!(session_id = %session.id, "Import session created");

        session
    }

    fn get(&self, id: Uuid) -> Option<ImportSession> {
        self.sessions.get(&id).map(|s| s.clone())
    }

    fn begin_upload(&self, id: Uuid, total: usize) -> Result<ImportSession, ImportSessionError> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or(ImportSessionError::NotFound(id))?;

        if session.state != ImportState::Confirming {
            return Err(ImportSessionError::InvalidStateTransition(format!(
                "cannot start upload from state '{}'",
                session.state.as_str()
            )));
        }

        session.state = ImportState::Uploading;
        session.progress = ImportProgress { current: 0, total };

        tracing::debug!(session_id = %id, total, "Import session uploading");

        Ok(session.clone())
    }

    fn record_uploaded(&self, id: Uuid, voice: CreatedVoice) -> Result<(), ImportSessionError> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or(ImportSessionError::NotFound(id))?;

        session.progress.current += 1;
        session.created.push(voice);

        Ok(())
    }

    fn record_skipped(&self, id: Uuid, name: String) -> Result<(), ImportSessionError> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or(ImportSessionError::NotFound(id))?;

        session.progress.current += 1;
        session.skipped.push(name);

        Ok(())
    }

    fn complete(&self, id: Uuid) -> Result<ImportSession, ImportSessionError> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or(ImportSessionError::NotFound(id))?;

        if session.state != ImportState::Uploading {
            return Err(ImportSessionError::InvalidStateTransition(format!(
                "cannot complete from state '{}'",
                session.state.as_str()
            )));
        }

        session.state = ImportState::Done;

        Ok(session.clone())
    }

    fn fail(&self, id: Uuid, message: String) -> Result<(), ImportSessionError> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or(ImportSessionError::NotFound(id))?;

        session.state = ImportState::Error;
        session.error = Some(message);

        Ok(())
    }

    fn discard(&self, id: Uuid) -> Result<(), ImportSessionError> {
        let state = self
            .sessions
            .get(&id)
            .map(|s| s.state)
            .ok_or(ImportSessionError::NotFound(id))?;

        if state != ImportState::Confirming {
            return Err(ImportSessionError::InvalidStateTransition(format!(
                "cannot discard from state '{}'",
                state.as_str()
            )));
        }

        self.sessions.remove(&id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> VoicePackManifest {
        VoicePackManifest::parse(r#"{"voices":[]}"#, "").unwrap()
    }

    fn archive() -> PackArchive {
        use std::io::Write;
        use zip::write::SimpleFileOptions;
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("voices.json", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"{\"voices\":[]}").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        PackArchive::open(&bytes).unwrap()
    }

    fn created(name: &str) -> CreatedVoice {
        CreatedVoice {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            notes: String::new(),
            gender: None,
            is_favorite: false,
            tags: Vec::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_lifecycle_to_done() {
        let manager = InMemoryImportManager::new();
        let session = manager.create(manifest(), archive());
        assert_eq!(session.state, ImportState::Confirming);

        let session = manager.begin_upload(session.id, 2).unwrap();
        assert_eq!(session.state, ImportState::Uploading);
        assert_eq!(session.progress.total, 2);

        manager.record_uploaded(session.id, created("A")).unwrap();
        manager.record_skipped(session.id, "B".to_string()).unwrap();

        let session = manager.complete(session.id).unwrap();
        assert_eq!(session.state, ImportState::Done);
        assert_eq!(session.progress.current, 2);
        assert_eq!(session.created.len(), 1);
        assert_eq!(session.skipped, vec!["B".to_string()]);
    }

    #[test]
    fn test_begin_upload_requires_confirming() {
        let manager = InMemoryImportManager::new();
        let session = manager.create(manifest(), archive());
        manager.begin_upload(session.id, 0).unwrap();

        let err = manager.begin_upload(session.id, 0).unwrap_err();
        assert!(matches!(err, ImportSessionError::InvalidStateTransition(_)));
    }

    #[test]
    fn test_fail_keeps_message() {
        let manager = InMemoryImportManager::new();
        let session = manager.create(manifest(), archive());
        manager.begin_upload(session.id, 1).unwrap();
        manager.fail(session.id, "boom".to_string()).unwrap();

        let session = manager.get(session.id).unwrap();
        assert_eq!(session.state, ImportState::Error);
        assert_eq!(session.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_discard_only_from_confirming() {
        let manager = InMemoryImportManager::new();
        let session = manager.create(manifest(), archive());
        manager.begin_upload(session.id, 0).unwrap();

        let err = manager.discard(session.id).unwrap_err();
        assert!(matches!(err, ImportSessionError::InvalidStateTransition(_)));

        let session = manager.create(manifest(), archive());
        manager.discard(session.id).unwrap();
        assert!(manager.get(session.id).is_none());
    }

    #[test]
    fn test_unknown_session() {
        let manager = InMemoryImportManager::new();
        assert!(manager.get(Uuid::new_v4()).is_none());
        assert!(matches!(
            manager.begin_upload(Uuid::new_v4(), 0),
            Err(ImportSessionError::NotFound(_))
        ));
    }
}
