//! Domain Layer - 领域层
//!
//! 包含一个限界上下文:
//! - Voice Pack Context: 批量导入（压缩包/manifest/条目解析）
//!
//! 项目、音色、输出的持久化模型属于应用层端口（application/ports）

pub mod voicepack;
