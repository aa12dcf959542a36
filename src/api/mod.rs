//! 后端 REST API 客户端
//!
//! 所有请求都携带 `Authorization: Bearer <token>`（令牌存在时），令牌从注入的
//! [`KeyValueStore`] 中读取。后端响应可能是裸数据，也可能包在 `{ "data": … }`
//! 信封里，两种形式都接受。
//!
//! 资源相关的方法按领域拆分在子模块中：
//! - `auth`: 登录、状态、个人资料
//! - `courses`: 课程与课时
//! - `content`: 课时内容与题目
//! - `vocabulary`: 词、义项、翻译
//! - `grammar`: 语法点及翻译
//! - `progress`: 学习进度统计
//! - `files`: 预签名上传地址

mod auth;
mod content;
mod courses;
mod files;
mod grammar;
mod progress;
mod vocabulary;

pub use auth::LoginResponse;
pub use progress::{LessonProgress, ProgressOverview, UserProgress};

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::AdminConfig;
use crate::models::{AppError, AppErrorType, Result};
use crate::storage::{KeyValueStore, AUTH_TOKEN_KEY};
use crate::utils::text::safe_truncate;

/// 响应信封：`{ "data": T }` 或裸 `T`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

pub struct ApiClient {
    http: Client,
    base_url: Url,
    store: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    pub fn new(config: &AdminConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| AppError::internal(format!("构建 HTTP 客户端失败: {e}")))?;
        Self::with_client(http, &config.api_base_url, store)
    }

    pub fn with_client(http: Client, base_url: &str, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(AppError::configuration("API 地址不能为空"));
        }
        // 保证以 `/` 结尾，否则 join 会替换最后一段路径
        let normalized = format!("{}/", trimmed.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)?;
        Ok(Self {
            http,
            base_url,
            store,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// 当前保存的登录令牌
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(AUTH_TOKEN_KEY)?
            .filter(|t| !t.trim().is_empty()))
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        let builder = self.http.request(method, url);
        Ok(match self.token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_status(status, &body))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.execute(builder).await?;
        let bytes = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::with_details(
                AppErrorType::Internal,
                format!("无法解析后端响应: {e}"),
                serde_json::Value::String(safe_truncate(&String::from_utf8_lossy(&bytes), 200)),
            )
        })?;
        Ok(envelope.into_inner())
    }

    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.execute(builder).await?;
        Ok(())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path)?;
        self.send_json(builder).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, path)?;
        self.send_empty(builder).await
    }
}

/// 从后端错误体中提取 `message`（字符串或字符串数组）
fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        ),
        _ => None,
    }
}

pub(crate) fn error_from_status(status: StatusCode, body: &str) -> AppError {
    let detail = backend_message(body)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
    let message = format!("请求失败 ({}): {}", status.as_u16(), detail);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::unauthorized(message),
        StatusCode::NOT_FOUND => AppError::not_found(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT => {
            AppError::validation(message)
        }
        _ => AppError::network(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(Client::new(), base, Arc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("https://admin.example.com/api");
        assert_eq!(
            api.endpoint("/courses/3").unwrap().as_str(),
            "https://admin.example.com/api/courses/3"
        );
        let api = client("https://admin.example.com/api/");
        assert_eq!(
            api.endpoint("lessons").unwrap().as_str(),
            "https://admin.example.com/api/lessons"
        );
    }

    #[test]
    fn test_envelope_accepts_both_shapes() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Item {
            id: i64,
        }
        let wrapped: Envelope<Item> = serde_json::from_str(r#"{"data":{"id":1}}"#).unwrap();
        assert_eq!(wrapped.into_inner(), Item { id: 1 });
        let bare: Envelope<Vec<Item>> = serde_json::from_str(r#"[{"id":2}]"#).unwrap();
        assert_eq!(bare.into_inner(), vec![Item { id: 2 }]);
    }

    #[test]
    fn test_error_from_status() {
        let err = error_from_status(StatusCode::UNAUTHORIZED, r#"{"message":"token expired"}"#);
        assert_eq!(err.error_type, AppErrorType::Unauthorized);
        assert!(err.message.contains("token expired"));

        let err = error_from_status(
            StatusCode::BAD_REQUEST,
            r#"{"message":["title should not be empty","hskLevel must be an integer"]}"#,
        );
        assert!(err.is_validation());
        assert!(err.message.contains("title should not be empty; hskLevel"));

        let err = error_from_status(StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(err.error_type, AppErrorType::Network);
        assert!(err.message.contains("502"));
    }
}
