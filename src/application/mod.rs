//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repositories、TtsEngine、VoiceCreator、
//!   MediaStorage、ImportManager）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Import commands
    BeginPackImport,
    ConfirmPackImport,
    DiscardPackImport,
    // Output commands
    DeleteOutput,
    GenerateSpeech,
    // Project commands
    CreateProject,
    DeleteProject,
    RenameProject,
    // Voice commands
    CreateVoice,
    DeleteVoice,
    UpdateVoice,
    // Handlers
    handlers::{
        BeginPackImportHandler, BeginPackImportResponse, ConfirmPackImportHandler,
        ConfirmPackImportResponse, CreateProjectHandler, CreateVoiceHandler, DeleteOutputHandler,
        DeleteProjectHandler, DeleteVoiceHandler, DiscardPackImportHandler,
        GenerateSpeechHandler, GenerateSpeechResponse, RenameProjectHandler, UpdateVoiceHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Import manager
    ImportManagerPort,
    ImportProgress,
    ImportSession,
    ImportSessionError,
    ImportState,
    // Media storage
    MediaStoragePort,
    StorageError,
    // Repositories
    OutputListItem,
    OutputRecord,
    OutputRepositoryPort,
    ProjectRecord,
    ProjectRepositoryPort,
    ProjectStatus,
    RepositoryError,
    VoiceRecord,
    VoiceRepositoryPort,
    VoiceUpdate,
    // TTS engine
    SpeechRequest,
    TtsEnginePort,
    TtsError,
    // Voice creator
    CreatedVoice,
    NewVoiceUpload,
    VoiceCreatorError,
    VoiceCreatorPort,
};

pub use queries::{
    // Import queries
    GetImportStatus,
    // Output queries
    ListOutputs,
    ListProjectOutputs,
    // Project queries
    GetProject,
    ListProjects,
    // Voice queries
    GetVoice,
    ListVoices,
    // Handlers
    handlers::{
        GetImportStatusHandler, GetProjectHandler, GetVoiceHandler, ImportStatus,
        ListOutputsHandler, ListProjectOutputsHandler, ListProjectsHandler, ListVoicesHandler,
        OutputPage, ProjectPage, VoicePage,
    },
};
