//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    BeginPackImportHandler, ConfirmPackImportHandler, CreateProjectHandler, CreateVoiceHandler,
    DeleteOutputHandler, DeleteProjectHandler, DeleteVoiceHandler, DiscardPackImportHandler,
    GenerateSpeechHandler, RenameProjectHandler, UpdateVoiceHandler,
    // Query handlers
    GetImportStatusHandler, GetProjectHandler, GetVoiceHandler, ListOutputsHandler,
    ListProjectOutputsHandler, ListProjectsHandler, ListVoicesHandler,
    // Ports
    ImportManagerPort, MediaStoragePort, OutputRepositoryPort, ProjectRepositoryPort,
    TtsEnginePort, VoiceCreatorPort, VoiceRepositoryPort,
};

/// 导入管线设置
#[derive(Debug, Clone, Copy)]
pub struct ImportSettings {
    /// 单个参考音频的最大字节数
    pub max_voice_file_size: u64,
}

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub project_repo: Arc<dyn ProjectRepositoryPort>,
    pub voice_repo: Arc<dyn VoiceRepositoryPort>,
    pub output_repo: Arc<dyn OutputRepositoryPort>,
    pub media_storage: Arc<dyn MediaStoragePort>,
    pub tts_engine: Arc<dyn TtsEnginePort>,
    pub voice_creator: Arc<dyn VoiceCreatorPort>,
    pub import_manager: Arc<dyn ImportManagerPort>,

    // ========== Command Handlers ==========
    pub create_project_handler: CreateProjectHandler,
    pub rename_project_handler: RenameProjectHandler,
    pub delete_project_handler: DeleteProjectHandler,
    pub create_voice_handler: CreateVoiceHandler,
    pub update_voice_handler: UpdateVoiceHandler,
    pub delete_voice_handler: DeleteVoiceHandler,
    pub generate_speech_handler: GenerateSpeechHandler,
    pub delete_output_handler: DeleteOutputHandler,
    pub begin_pack_import_handler: BeginPackImportHandler,
    pub confirm_pack_import_handler: ConfirmPackImportHandler,
    pub discard_pack_import_handler: DiscardPackImportHandler,

    // ========== Query Handlers ==========
    pub get_project_handler: GetProjectHandler,
    pub list_projects_handler: ListProjectsHandler,
    pub get_voice_handler: GetVoiceHandler,
    pub list_voices_handler: ListVoicesHandler,
    pub list_outputs_handler: ListOutputsHandler,
    pub list_project_outputs_handler: ListProjectOutputsHandler,
    pub get_import_status_handler: GetImportStatusHandler,
}

impl AppState {
    /// 创建应用状态
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        project_repo: Arc<dyn ProjectRepositoryPort>,
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        output_repo: Arc<dyn OutputRepositoryPort>,
        media_storage: Arc<dyn MediaStoragePort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        voice_creator: Arc<dyn VoiceCreatorPort>,
        import_manager: Arc<dyn ImportManagerPort>,
        import_settings: ImportSettings,
    ) -> Self {
        Self {
            // Ports
            project_repo: project_repo.clone(),
            voice_repo: voice_repo.clone(),
            output_repo: output_repo.clone(),
            media_storage: media_storage.clone(),
            tts_engine: tts_engine.clone(),
            voice_creator: voice_creator.clone(),
            import_manager: import_manager.clone(),

            // Command handlers
            create_project_handler: CreateProjectHandler::new(project_repo.clone()),
            rename_project_handler: RenameProjectHandler::new(project_repo.clone()),
            delete_project_handler: DeleteProjectHandler::new(
                project_repo.clone(),
                media_storage.clone(),
            ),
            create_voice_handler: CreateVoiceHandler::new(
                voice_repo.clone(),
                media_storage.clone(),
                tts_engine.clone(),
            ),
            update_voice_handler: UpdateVoiceHandler::new(voice_repo.clone()),
            delete_voice_handler: DeleteVoiceHandler::new(voice_repo.clone()),
            generate_speech_handler: GenerateSpeechHandler::new(
                output_repo.clone(),
                voice_repo.clone(),
                media_storage.clone(),
                tts_engine.clone(),
            ),
            delete_output_handler: DeleteOutputHandler::new(
                output_repo.clone(),
                media_storage.clone(),
            ),
            begin_pack_import_handler: BeginPackImportHandler::new(import_manager.clone()),
            confirm_pack_import_handler: ConfirmPackImportHandler::new(
                import_manager.clone(),
                voice_repo.clone(),
                voice_creator.clone(),
                import_settings.max_voice_file_size,
            ),
            discard_pack_import_handler: DiscardPackImportHandler::new(import_manager.clone()),

            // Query handlers
            get_project_handler: GetProjectHandler::new(project_repo.clone()),
            list_projects_handler: ListProjectsHandler::new(project_repo.clone()),
            get_voice_handler: GetVoiceHandler::new(voice_repo.clone()),
            list_voices_handler: ListVoicesHandler::new(voice_repo.clone()),
            list_outputs_handler: ListOutputsHandler::new(output_repo.clone()),
            list_project_outputs_handler: ListProjectOutputsHandler::new(output_repo.clone()),
            get_import_status_handler: GetImportStatusHandler::new(import_manager.clone()),
        }
    }
}
