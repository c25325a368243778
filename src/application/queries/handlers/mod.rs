//! Query Handlers

mod import_handlers;
mod output_handlers;
mod project_handlers;
mod voice_handlers;

pub use import_handlers::{GetImportStatusHandler, ImportStatus};
pub use output_handlers::{ListOutputsHandler, ListProjectOutputsHandler, OutputPage};
pub use project_handlers::{GetProjectHandler, ListProjectsHandler, ProjectPage};
pub use voice_handlers::{GetVoiceHandler, ListVoicesHandler, VoicePage};
