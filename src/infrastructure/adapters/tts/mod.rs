//! TTS Adapters - 外部 TTS 微服务客户端

mod http_tts_client;

pub use http_tts_client::{HttpTtsClient, HttpTtsClientConfig};
