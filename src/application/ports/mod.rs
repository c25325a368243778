//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod import_manager;
mod media_storage;
mod repositories;
mod tts_engine;
mod voice_creator;

pub use import_manager::{
    ImportManagerPort, ImportProgress, ImportSession, ImportSessionError, ImportState,
};
pub use media_storage::{MediaStoragePort, StorageError};
pub use repositories::{
    OutputListItem, OutputRecord, OutputRepositoryPort, ProjectRecord, ProjectRepositoryPort,
    ProjectStatus, RepositoryError, VoiceRecord, VoiceRepositoryPort, VoiceUpdate,
};
pub use tts_engine::{SpeechRequest, TtsEnginePort, TtsError};
pub use voice_creator::{CreatedVoice, NewVoiceUpload, VoiceCreatorError, VoiceCreatorPort};
