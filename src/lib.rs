// Hanyu Admin library entry
// 中文学习平台内容管理后台的核心逻辑：REST 客户端、分段拼音、文件上传、编辑提交流程。

pub mod api;
pub mod authoring;
pub mod config;
pub mod lesson_cache;
pub mod models;
pub mod segmentation;
pub mod storage;
pub mod upload;
pub mod utils;

pub use api::ApiClient;
pub use config::AdminConfig;
pub use lesson_cache::LessonCache;
pub use models::{AppError, AppErrorType, Result};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// 安装全局日志订阅器（`RUST_LOG` 覆盖默认的 info 级别），重复调用无副作用
pub fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
