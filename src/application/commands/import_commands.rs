//! Import Commands - voice pack 导入

use uuid::Uuid;

/// 解析 voice pack 压缩包（idle → parsing → confirming）
#[derive(Debug, Clone)]
pub struct BeginPackImport {
    /// 上传的 zip 字节
    pub archive: Vec<u8>,
}

/// 确认导入，执行上传循环（confirming → uploading → done | error）
#[derive(Debug, Clone)]
pub struct ConfirmPackImport {
    pub session_id: Uuid,
}

/// 丢弃待确认的导入会话（confirming → idle）
#[derive(Debug, Clone)]
pub struct DiscardPackImport {
    pub session_id: Uuid,
}
