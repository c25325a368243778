//! Import Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ImportManagerPort, ImportProgress, ImportState};
use crate::application::queries::GetImportStatus;

/// 导入会话状态视图
#[derive(Debug, Clone)]
pub struct ImportStatus {
    pub session_id: uuid::Uuid,
    pub state: ImportState,
    pub progress: ImportProgress,
    pub skipped: Vec<String>,
    pub error: Option<String>,
}

/// GetImportStatus Handler
pub struct GetImportStatusHandler {
    import_manager: Arc<dyn ImportManagerPort>,
}

impl GetImportStatusHandler {
    pub fn new(import_manager: Arc<dyn ImportManagerPort>) -> Self {
        Self { import_manager }
    }

    pub async fn handle(&self, query: GetImportStatus) -> Result<ImportStatus, ApplicationError> {
        let session = self
            .import_manager
            .get(query.session_id)
            .ok_or_else(|| ApplicationError::not_found("Import session", query.session_id))?;

        Ok(ImportStatus {
            session_id: session.id,
            state: session.state,
            progress: session.progress,
            skipped: session.skipped,
            error: session.error,
        })
    }
}
