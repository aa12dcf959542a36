//! 客户端持久化状态
//!
//! 替代浏览器 localStorage：登录令牌、当前课时 ID、课时缓存都经由
//! [`KeyValueStore`] 读写。
//!
//! ## 存储后端
//! - **FileStore**: 数据目录下的 JSON 文件
//! - **MemoryStore**: 进程内 HashMap（测试用）

mod file_store;
mod memory;
mod traits;

pub use file_store::FileStore;
pub use memory::MemoryStore;
pub use traits::{
    KeyValueStore, StorageError, StorageResult, AUTH_TOKEN_KEY, CURRENT_LESSON_ID_KEY,
    LESSON_CACHE_KEY,
};

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::models::Result;

/// 根据配置打开默认的文件存储
pub fn open_default_store(config: &AdminConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store = FileStore::open(&config.data_dir)?;
    Ok(Arc::new(store))
}
