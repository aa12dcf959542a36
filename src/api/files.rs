use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::models::{AppError, Result};
use crate::upload::{PresignProvider, PresignRequest, PresignedTarget};

impl ApiClient {
    /// `POST /file-upload/presigned-url`
    pub async fn request_presigned_url(
        &self,
        request: &PresignRequest<'_>,
    ) -> Result<PresignedTarget> {
        if request.filename.trim().is_empty() {
            return Err(AppError::validation("文件名不能为空"));
        }
        let builder = self
            .request(Method::POST, "file-upload/presigned-url")?
            .json(request);
        let target: PresignedTarget = self.send_json(builder).await?;
        if target.upload_url.trim().is_empty() || target.file_url.trim().is_empty() {
            return Err(AppError::internal("后端返回的上传地址为空"));
        }
        Ok(target)
    }
}

#[async_trait]
impl PresignProvider for ApiClient {
    async fn presigned_target(&self, request: &PresignRequest<'_>) -> Result<PresignedTarget> {
        self.request_presigned_url(request).await
    }
}
