//! KeyValueStore trait 定义
//!
//! 后台客户端的持久化状态（登录令牌、当前课时、课时缓存）都以字符串键值对保存，
//! 存储实现通过依赖注入传给使用方，便于测试替换。

use thiserror::Error;

use crate::models::AppError;

/// 浏览器 localStorage 中沿用的键名
pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const CURRENT_LESSON_ID_KEY: &str = "currentLessonId";
pub const LESSON_CACHE_KEY: &str = "lessonCache";

/// 存储层错误类型
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("存储读写失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("存储文件损坏: {0}")]
    Corrupted(String),
    #[error("存储锁已失效: {0}")]
    Poisoned(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => AppError::file_system(e.to_string()),
            other => AppError::internal(other.to_string()),
        }
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// 统一的键值存储访问 trait
pub trait KeyValueStore: Send + Sync {
    /// 存储后端名称（用于日志）
    fn backend_name(&self) -> &'static str;

    /// 读取键值；不存在时返回 `Ok(None)`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// 写入键值（覆盖旧值）
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// 删除键；键不存在时不报错
    fn remove(&self, key: &str) -> StorageResult<()>;

    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
