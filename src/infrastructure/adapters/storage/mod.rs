//! Storage Adapters - 文件系统媒体存储

mod file_storage;

pub use file_storage::FileMediaStorage;
