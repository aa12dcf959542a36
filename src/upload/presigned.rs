//! 预签名上传
//!
//! 1. 向后端申请预签名写入地址与最终公开 URL；
//! 2. 直接 PUT 原始文件字节到存储服务，按字节上报进度。

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio_util::io::ReaderStream;

use super::validate::LocalFile;
use crate::models::{AppError, Result};

/// 字节级进度回调 (uploaded_bytes, total_bytes)
pub type ByteProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedTarget {
    /// 临时写入地址（PUT）
    pub upload_url: String,
    /// 上传完成后的公开访问地址
    pub file_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignRequest<'a> {
    pub filename: &'a str,
    pub content_type: &'a str,
    pub folder: &'a str,
}

/// 预签名地址来源（生产环境为 [`crate::api::ApiClient`]）
#[async_trait]
pub trait PresignProvider: Send + Sync {
    async fn presigned_target(&self, request: &PresignRequest<'_>) -> Result<PresignedTarget>;
}

/// 直传存储服务的 HTTP 客户端，不携带后端认证头
#[derive(Clone)]
pub struct DirectUploader {
    http: Client,
}

impl DirectUploader {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// 流式 PUT 文件，返回存储服务的 HTTP 状态码
    pub async fn put_file(
        &self,
        upload_url: &str,
        file: &LocalFile,
        progress: Option<ByteProgressCallback>,
    ) -> Result<StatusCode> {
        let handle = tokio::fs::File::open(&file.path)
            .await
            .map_err(|e| AppError::file_system(format!("打开文件失败: {e}")))?;
        let total = file.size;
        if let Some(cb) = progress.as_ref() {
            cb(0, total);
        }

        let uploaded = Arc::new(AtomicU64::new(0));
        let progress_cb = progress.clone();
        let stream = ReaderStream::new(handle).map(move |chunk| {
            if let Ok(ref bytes) = chunk {
                let new_total =
                    uploaded.fetch_add(bytes.len() as u64, Ordering::SeqCst) + bytes.len() as u64;
                if let Some(cb) = progress_cb.as_ref() {
                    cb(new_total.min(total), total);
                }
            }
            chunk
        });

        let res = self
            .http
            .put(upload_url)
            .header(header::CONTENT_TYPE, &file.content_type)
            .header(header::CONTENT_LENGTH, total)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await
            .map_err(|e| AppError::network(format!("上传请求失败: {e}")))?;

        let status = res.status();
        if status == StatusCode::OK {
            if let Some(cb) = progress.as_ref() {
                cb(total, total);
            }
        }
        Ok(status)
    }
}

impl Default for DirectUploader {
    fn default() -> Self {
        Self::new(Client::new())
    }
}
