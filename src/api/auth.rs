use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ApiClient;
use crate::models::{AppError, AuthStatus, Result, UserProfile};
use crate::storage::AUTH_TOKEN_KEY;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl ApiClient {
    /// 登录并保存令牌
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::validation("请输入邮箱和密码"));
        }
        let builder = self
            .request(Method::POST, "auth/login")?
            .json(&json!({ "email": email.trim(), "password": password }));
        let response: LoginResponse = self.send_json(builder).await?;
        self.store().set(AUTH_TOKEN_KEY, &response.token)?;
        tracing::info!("登录成功: {}", email.trim());
        Ok(response)
    }

    /// 退出登录：仅清除本地令牌
    pub fn logout(&self) -> Result<()> {
        self.store().remove(AUTH_TOKEN_KEY)?;
        Ok(())
    }

    pub async fn auth_status(&self) -> Result<AuthStatus> {
        if self.token()?.is_none() {
            return Ok(AuthStatus {
                authenticated: false,
                user: None,
            });
        }
        self.get_json("auth/status").await
    }

    pub async fn profile(&self) -> Result<UserProfile> {
        self.get_json("auth/profile").await
    }
}
