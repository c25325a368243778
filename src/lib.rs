//! Vocalis - TTS 工作流的项目/音色管理后端
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Pack Context: 批量导入（压缩包 / manifest / 条目解析）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories、TtsEngine、VoiceCreator、
//!   MediaStorage、ImportManager）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Persistence: SQLite 存储
//! - Adapters: TTS Client、Voice Creator Client、File Storage
//! - Memory: 导入会话管理

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
