//! 后台客户端配置
//!
//! 加载顺序：`.env`（dotenvy）→ `config/admin.toml`（可选）→ `HANYU_ADMIN__*` 环境变量。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{AppError, Result};
use crate::segmentation::ToneStyle;

const CONFIG_FILE: &str = "config/admin";
const ENV_PREFIX: &str = "HANYU_ADMIN";

fn default_api_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("hanyu-admin")
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_image_max_size_mb() -> u64 {
    5
}

fn default_audio_max_size_mb() -> u64 {
    10
}

fn default_redirect_delay_ms() -> u64 {
    1500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// 后端 REST API 根地址（如 https://api.example.com/api）
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// 客户端状态文件所在目录
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// 图片上传大小上限（MB）
    #[serde(default = "default_image_max_size_mb")]
    pub image_max_size_mb: u64,
    /// 音频上传大小上限（MB）
    #[serde(default = "default_audio_max_size_mb")]
    pub audio_max_size_mb: u64,
    /// 提交成功后跳转列表页前的等待时间
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
    #[serde(default)]
    pub tone_style: ToneStyle,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            data_dir: default_data_dir(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            image_max_size_mb: default_image_max_size_mb(),
            audio_max_size_mb: default_audio_max_size_mb(),
            redirect_delay_ms: default_redirect_delay_ms(),
            tone_style: ToneStyle::default(),
        }
    }
}

impl AdminConfig {
    pub fn from_env_and_file() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut builder = config::Config::builder();
        if std::path::Path::new(&format!("{CONFIG_FILE}.toml")).exists() {
            builder = builder.add_source(config::File::with_name(CONFIG_FILE));
        }
        // 环境变量覆盖配置文件
        let loaded = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("加载配置失败: {e}")))?;
        let parsed: AdminConfig = loaded
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("解析配置失败: {e}")))?;
        parsed.validate()?;
        tracing::info!(
            "配置已加载: api={} data_dir={:?}",
            parsed.api_base_url,
            parsed.data_dir
        );
        Ok(parsed)
    }

    /// 验证配置是否完整
    pub fn validate(&self) -> Result<()> {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(AppError::configuration("api_base_url 不能为空"));
        }
        url::Url::parse(base)?;
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(AppError::configuration("超时时间必须大于 0"));
        }
        if self.image_max_size_mb == 0 || self.audio_max_size_mb == 0 {
            return Err(AppError::configuration("上传大小上限必须大于 0"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AdminConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.redirect_delay(), Duration::from_millis(1500));
        assert_eq!(config.tone_style, ToneStyle::Marks);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AdminConfig {
            api_base_url: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.api_base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.api_base_url = "https://api.example.com/api".into();
        config.image_max_size_mb = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: AdminConfig = serde_json::from_value(serde_json::json!({
            "api_base_url": "https://admin.example.com/api",
            "tone_style": "numbers"
        }))
        .unwrap();
        assert_eq!(parsed.audio_max_size_mb, 10);
        assert_eq!(parsed.tone_style, ToneStyle::Numbers);
    }
}
