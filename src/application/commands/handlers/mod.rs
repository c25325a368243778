//! Command Handlers

mod import_handlers;
mod output_handlers;
mod project_handlers;
mod voice_handlers;

pub use import_handlers::{
    BeginPackImportHandler, BeginPackImportResponse, ConfirmPackImportHandler,
    ConfirmPackImportResponse, DiscardPackImportHandler,
};
pub use output_handlers::{DeleteOutputHandler, GenerateSpeechHandler, GenerateSpeechResponse};
pub use project_handlers::{CreateProjectHandler, DeleteProjectHandler, RenameProjectHandler};
pub use voice_handlers::{CreateVoiceHandler, DeleteVoiceHandler, UpdateVoiceHandler};
