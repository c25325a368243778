//! Uploader Adapters - pack 导入的上传提交端

mod http_voice_creator;

pub use http_voice_creator::{HttpVoiceCreator, HttpVoiceCreatorConfig};
