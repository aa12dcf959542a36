//! 上传协调器
//!
//! 图片与音频同时待上传时并发执行，合并进度按权重计算（两个文件各占 50%，
//! 只有一个文件时占 100%）。等待全部上传结束后才给出整体结果；任意一个失败
//! 整体即失败，已成功的文件不会回滚。

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

use super::presigned::{
    ByteProgressCallback, DirectUploader, PresignProvider, PresignRequest,
};
use super::slots::UploadSlot;
use super::validate::{AssetKind, LocalFile};
use crate::utils::unicode::sanitize_file_name;

/// 百分比进度回调（0-100）
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// 单个文件的上传结果，失败不会以 `Err` 返回
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadOutcome {
    fn succeeded(url: String) -> Self {
        Self {
            success: true,
            url: Some(url),
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            error: Some(message.into()),
        }
    }
}

/// 一次批量上传（最多图片 + 音频）的整体结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub uploaded: Vec<(AssetKind, String)>,
    /// 整体失败时已成功上传、但不会被提交引用的文件
    pub orphaned_urls: Vec<String>,
}

/// 图片与音频两个槽位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSlots {
    pub image: UploadSlot,
    pub audio: UploadSlot,
}

impl Default for UploadSlots {
    fn default() -> Self {
        Self {
            image: UploadSlot::new(AssetKind::Image),
            audio: UploadSlot::new(AssetKind::Audio),
        }
    }
}

impl UploadSlots {
    /// 根据表单中已有的 URL 初始化（编辑模式）
    pub fn from_form(form: &Map<String, Value>) -> Self {
        let slot = |kind: AssetKind| match form.get(kind.url_field()).and_then(Value::as_str) {
            Some(url) if !url.trim().is_empty() => UploadSlot::with_url(kind, url),
            _ => UploadSlot::new(kind),
        };
        Self {
            image: slot(AssetKind::Image),
            audio: slot(AssetKind::Audio),
        }
    }

    pub fn get(&self, kind: AssetKind) -> &UploadSlot {
        match kind {
            AssetKind::Image => &self.image,
            AssetKind::Audio => &self.audio,
        }
    }

    pub fn get_mut(&mut self, kind: AssetKind) -> &mut UploadSlot {
        match kind {
            AssetKind::Image => &mut self.image,
            AssetKind::Audio => &mut self.audio,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.image.pending_file().is_some() || self.audio.pending_file().is_some()
    }
}

fn percent(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done.min(total) * 100) / total) as u8
}

pub struct UploadCoordinator {
    presign: Arc<dyn PresignProvider>,
    uploader: DirectUploader,
}

impl UploadCoordinator {
    pub fn new(presign: Arc<dyn PresignProvider>) -> Self {
        Self::with_uploader(presign, DirectUploader::default())
    }

    pub fn with_uploader(presign: Arc<dyn PresignProvider>, uploader: DirectUploader) -> Self {
        Self { presign, uploader }
    }

    /// 上传单个文件：申请预签名地址 → PUT 原始字节 → HTTP 200 时返回公开 URL
    pub async fn upload(
        &self,
        file: &LocalFile,
        folder: &str,
        on_progress: Option<ProgressFn>,
    ) -> UploadOutcome {
        let file_name = sanitize_file_name(&file.file_name);
        let request = PresignRequest {
            filename: &file_name,
            content_type: &file.content_type,
            folder,
        };

        let target = match self.presign.presigned_target(&request).await {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!("获取预签名地址失败 {}: {}", file_name, e);
                return UploadOutcome::failed(format!("获取上传地址失败: {e}"));
            }
        };

        let byte_progress: Option<ByteProgressCallback> = on_progress.map(|cb| {
            Arc::new(move |done: u64, total: u64| cb(percent(done, total))) as ByteProgressCallback
        });

        match self
            .uploader
            .put_file(&target.upload_url, file, byte_progress)
            .await
        {
            Ok(StatusCode::OK) => {
                tracing::info!("文件上传成功: {} → {}", file_name, target.file_url);
                UploadOutcome::succeeded(target.file_url)
            }
            Ok(status) => UploadOutcome::failed(format!(
                "上传失败: HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )),
            Err(e) => UploadOutcome::failed(e.message),
        }
    }

    /// 上传所有待上传槽位，成功的 URL 写回表单
    pub async fn upload_pending<F>(
        &self,
        slots: &mut UploadSlots,
        folder_for: F,
        form: &mut Map<String, Value>,
        on_progress: Option<ProgressFn>,
    ) -> BatchOutcome
    where
        F: Fn(AssetKind) -> String,
    {
        let mut pending: Vec<(AssetKind, LocalFile, String)> = Vec::new();
        for kind in [AssetKind::Image, AssetKind::Audio] {
            if let Some(file) = slots.get_mut(kind).begin() {
                pending.push((kind, file, folder_for(kind)));
            }
        }

        if pending.is_empty() {
            return BatchOutcome {
                success: true,
                ..Default::default()
            };
        }

        let count = pending.len();
        let percents: Arc<Vec<AtomicU8>> = Arc::new((0..count).map(|_| AtomicU8::new(0)).collect());

        let uploads = pending.iter().enumerate().map(|(idx, (kind, file, folder))| {
            let per_file: Option<ProgressFn> = on_progress.as_ref().map(|user_cb| {
                let user_cb = user_cb.clone();
                let percents = percents.clone();
                Arc::new(move |pct: u8| {
                    percents[idx].store(pct, Ordering::SeqCst);
                    let sum: u32 = percents
                        .iter()
                        .map(|p| p.load(Ordering::SeqCst) as u32)
                        .sum();
                    user_cb((sum / count as u32) as u8);
                }) as ProgressFn
            });
            async move { (*kind, self.upload(file, folder, per_file).await) }
        });
        let results = futures::future::join_all(uploads).await;

        let mut outcome = BatchOutcome::default();
        let mut failure: Option<String> = None;
        for (kind, result) in results {
            let slot = slots.get_mut(kind);
            match (result.success, result.url) {
                (true, Some(url)) => {
                    form.insert(kind.url_field().to_string(), Value::String(url.clone()));
                    slot.complete(url.clone());
                    outcome.uploaded.push((kind, url));
                }
                _ => {
                    let message = result.error.unwrap_or_else(|| "未知错误".to_string());
                    slot.fail(message.clone());
                    if failure.is_none() {
                        failure = Some(format!("{}上传失败: {}", kind.label(), message));
                    }
                }
            }
        }

        match failure {
            Some(message) => {
                outcome.orphaned_urls = outcome.uploaded.iter().map(|(_, url)| url.clone()).collect();
                if !outcome.orphaned_urls.is_empty() {
                    tracing::warn!(
                        "部分文件上传失败，已上传文件未回滚: {:?}",
                        outcome.orphaned_urls
                    );
                }
                outcome.success = false;
                outcome.error = Some(message);
            }
            None => outcome.success = true,
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 200), 0);
        assert_eq!(percent(50, 200), 25);
        assert_eq!(percent(500, 200), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn test_slots_from_form() {
        let form = serde_json::json!({ "audio_url": "https://cdn.example.com/a.mp3", "image_url": "" });
        let slots = UploadSlots::from_form(form.as_object().unwrap());
        assert!(slots.audio.is_locked());
        assert!(slots.image.is_empty());
        assert!(!slots.has_pending());
    }

    use crate::models::{AppError, Result};
    use crate::upload::PresignedTarget;

    struct UnreachablePresign;

    #[async_trait::async_trait]
    impl PresignProvider for UnreachablePresign {
        async fn presigned_target(&self, _request: &PresignRequest<'_>) -> Result<PresignedTarget> {
            Err(AppError::internal("不应请求预签名地址"))
        }
    }

    #[tokio::test]
    async fn test_upload_pending_skips_settled_slots() {
        let coordinator = UploadCoordinator::new(Arc::new(UnreachablePresign));
        let mut form = serde_json::json!({ "image_url": "https://cdn.example.com/a.png" })
            .as_object()
            .cloned()
            .unwrap();
        let mut slots = UploadSlots::from_form(&form);

        let batch = coordinator
            .upload_pending(&mut slots, |kind| kind.folder_name().to_string(), &mut form, None)
            .await;
        assert!(batch.success);
        assert!(batch.error.is_none());
        assert!(batch.uploaded.is_empty());
        assert!(slots.image.is_locked());
        assert!(slots.audio.is_empty());
    }
}
