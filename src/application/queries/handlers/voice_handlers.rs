//! Voice Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{VoiceRecord, VoiceRepositoryPort};
use crate::application::queries::{GetVoice, ListVoices};

/// 音色分页结果
#[derive(Debug, Clone)]
pub struct VoicePage {
    pub voices: Vec<VoiceRecord>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// GetVoice Handler
pub struct GetVoiceHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
}

impl GetVoiceHandler {
    pub fn new(voice_repo: Arc<dyn VoiceRepositoryPort>) -> Self {
        Self { voice_repo }
    }

    pub async fn handle(&self, query: GetVoice) -> Result<VoiceRecord, ApplicationError> {
        self.voice_repo
            .find_by_id(query.voice_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Voice", query.voice_id))
    }
}

/// ListVoices Handler
pub struct ListVoicesHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
}

impl ListVoicesHandler {
    pub fn new(voice_repo: Arc<dyn VoiceRepositoryPort>) -> Self {
        Self { voice_repo }
    }

    pub async fn handle(&self, query: ListVoices) -> Result<VoicePage, ApplicationError> {
        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let offset = (page - 1) * limit;

        let voices = self
            .voice_repo
            .search_page(&query.search, limit, offset)
            .await?;
        let total = self.voice_repo.count(&query.search).await?;

        Ok(VoicePage {
            voices,
            total,
            page,
            limit,
        })
    }
}
