//! 提交编排
//!
//! 一次提交的顺序固定：
//! 1. 预校验（必需的图片/音频、类型化数据）
//! 2. 上传待上传文件，URL 写回表单
//! 3. 重新读取表单并去除临时字段
//! 4. 构建类型化数据，调用后端创建或更新
//! 5. 返回跳转到课时列表的指令
//!
//! 任一步失败都保留表单内容。后端写入失败时不删除已上传的文件。

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::content::ContentItem;
use super::form::{apply_segmentation, nested_mut, restore_source, stripped, FormValues};
use super::preview::{build_payload, preview, Payload};
use super::question::{QuestionItem, QuestionType};
use super::{AssetRequirement, AuthoringKind, MATCHING_PAIR_BINDING};
use crate::config::AdminConfig;
use crate::models::{AppError, Result};
use crate::segmentation::{SegmentationMode, ToneStyle};
use crate::upload::{
    validate_file, AssetKind, LocalFile, PresignProvider, ProgressFn, UploadCoordinator,
    UploadSlots,
};

/// 后端对内容与题目的写操作
#[async_trait]
pub trait AuthoringBackend: Send + Sync {
    async fn create_content(&self, item: &ContentItem) -> Result<ContentItem>;
    async fn update_content(&self, id: i64, item: &ContentItem) -> Result<ContentItem>;
    async fn create_question(&self, item: &QuestionItem) -> Result<QuestionItem>;
    async fn update_question(&self, id: i64, item: &QuestionItem) -> Result<QuestionItem>;
}

/// 提交成功后的跳转指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: String,
    pub delay: Duration,
}

impl Navigation {
    /// 等待提示展示完毕
    pub async fn settle(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Busy,
    Validation,
    Upload,
    Backend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Succeeded {
        id: Option<i64>,
        navigation: Navigation,
    },
    Failed {
        message: String,
        stage: SubmissionStage,
    },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Succeeded { .. })
    }

    fn failed(stage: SubmissionStage, message: impl Into<String>) -> Self {
        SubmissionOutcome::Failed {
            message: message.into(),
            stage,
        }
    }
}

/// 单个内容/题目编辑表单的状态
#[derive(Debug, Clone)]
pub struct AuthoringForm {
    pub kind: AuthoringKind,
    pub lesson_id: i64,
    pub editing_id: Option<i64>,
    pub values: FormValues,
    pub slots: UploadSlots,
    pub segmentation_mode: SegmentationMode,
}

impl AuthoringForm {
    pub fn new(kind: AuthoringKind, lesson_id: i64) -> Self {
        Self {
            kind,
            lesson_id,
            editing_id: None,
            values: FormValues::new(),
            slots: UploadSlots::default(),
            segmentation_mode: SegmentationMode::default(),
        }
    }

    pub fn edit_content(item: &ContentItem) -> Self {
        let values = item.data.as_object().cloned().unwrap_or_default();
        Self::editing(AuthoringKind::Content(item.content_type), item.lesson_id, item.id, values)
    }

    pub fn edit_question(item: &QuestionItem) -> Self {
        let mut values = item.data.as_object().cloned().unwrap_or_default();
        values.insert("is_active".to_string(), Value::Bool(item.is_active));
        Self::editing(AuthoringKind::Question(item.question_type), item.lesson_id, item.id, values)
    }

    /// 已保存的分段还原成原文输入，切换模式时才能重新分段
    fn editing(kind: AuthoringKind, lesson_id: i64, editing_id: Option<i64>, mut values: FormValues) -> Self {
        let segmentation_mode = values
            .get("segmentation_mode")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        for binding in kind.segment_bindings() {
            restore_source(&mut values, binding, segmentation_mode);
        }
        if kind == AuthoringKind::Question(QuestionType::Matching) {
            let count = values.get("pairs").and_then(Value::as_array).map_or(0, Vec::len);
            for idx in 0..count {
                if let Some(pair) = nested_mut(&mut values, "pairs", idx) {
                    restore_source(pair, &MATCHING_PAIR_BINDING, segmentation_mode);
                }
            }
        }
        Self {
            kind,
            lesson_id,
            editing_id,
            slots: UploadSlots::from_form(&values),
            values,
            segmentation_mode,
        }
    }

    pub fn set(&mut self, field: &str, value: Value) {
        self.values.insert(field.to_string(), value);
    }

    /// 选择文件：校验类型与大小后放入槽位
    pub fn select_file(&mut self, asset: AssetKind, file: LocalFile, config: &AdminConfig) -> Result<()> {
        if !self.kind.asset_requirement(asset).is_supported() {
            return Err(AppError::validation(format!("{} 不支持上传{}", self.kind, asset.label())));
        }
        let max_size_mb = match asset {
            AssetKind::Image => config.image_max_size_mb,
            AssetKind::Audio => config.audio_max_size_mb,
        };
        validate_file(&file, asset, max_size_mb).into_result()?;
        self.slots.get_mut(asset).select(file)
    }

    pub fn clear_asset(&mut self, asset: AssetKind) {
        self.slots.get_mut(asset).clear(&mut self.values);
    }

    pub fn set_segmentation_mode(&mut self, mode: SegmentationMode, tone: ToneStyle) {
        self.segmentation_mode = mode;
        self.segment(tone);
    }

    /// 按当前模式重新生成所有分段字段
    pub fn segment(&mut self, tone: ToneStyle) {
        let mode = self.segmentation_mode;
        for binding in self.kind.segment_bindings() {
            apply_segmentation(&mut self.values, binding, mode, tone);
        }
        match self.kind {
            AuthoringKind::Content(super::ContentType::Sentence) => {
                self.values.insert(
                    "segmentation_mode".to_string(),
                    Value::String(mode.as_str().to_string()),
                );
            }
            AuthoringKind::Question(QuestionType::Matching) => {
                let count = self
                    .values
                    .get("pairs")
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                for idx in 0..count {
                    if let Some(pair) = nested_mut(&mut self.values, "pairs", idx) {
                        apply_segmentation(pair, &MATCHING_PAIR_BINDING, mode, tone);
                    }
                }
            }
            _ => {}
        }
    }

    pub fn preview(&self) -> Value {
        preview(self.kind, self.lesson_id, &self.values)
    }

    /// 必需的图片/音频既没有 URL 也没有待上传文件
    fn missing_assets(&self) -> Option<String> {
        [AssetKind::Image, AssetKind::Audio]
            .into_iter()
            .filter(|asset| self.kind.asset_requirement(*asset) == AssetRequirement::Required)
            .find(|asset| {
                let slot = self.slots.get(*asset);
                slot.url().is_none() && slot.pending_file().is_none()
            })
            .map(|asset| format!("请上传{}", asset.label()))
    }

    /// 上传前的数据校验，待上传文件用占位 URL 代替
    fn prevalidate(&self) -> Result<()> {
        let mut values = stripped(&self.values);
        for asset in [AssetKind::Image, AssetKind::Audio] {
            if self.slots.get(asset).pending_file().is_some() {
                values.insert(
                    asset.url_field().to_string(),
                    Value::String(format!("pending://{}", asset)),
                );
            }
        }
        build_payload(self.kind, self.lesson_id, values).map(|_| ())
    }
}

/// 提交结束时复位进行中标记
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SubmissionOrchestrator<B: AuthoringBackend> {
    backend: Arc<B>,
    uploads: UploadCoordinator,
    redirect_delay: Duration,
    in_flight: AtomicBool,
}

impl<B: AuthoringBackend> SubmissionOrchestrator<B> {
    pub fn new(backend: Arc<B>, presign: Arc<dyn PresignProvider>, config: &AdminConfig) -> Self {
        Self::with_uploads(backend, UploadCoordinator::new(presign), config.redirect_delay())
    }

    pub fn with_uploads(backend: Arc<B>, uploads: UploadCoordinator, redirect_delay: Duration) -> Self {
        Self {
            backend,
            uploads,
            redirect_delay,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn submit(&self, form: &mut AuthoringForm, on_progress: Option<ProgressFn>) -> SubmissionOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SubmissionOutcome::failed(SubmissionStage::Busy, "正在提交，请稍候");
        }
        let _guard = InFlight(&self.in_flight);

        if let Some(message) = form.missing_assets() {
            return SubmissionOutcome::failed(SubmissionStage::Validation, message);
        }
        if let Err(e) = form.prevalidate() {
            return SubmissionOutcome::failed(SubmissionStage::Validation, e.message);
        }

        let kind = form.kind;
        let batch = self
            .uploads
            .upload_pending(
                &mut form.slots,
                |asset| kind.upload_folder(asset),
                &mut form.values,
                on_progress,
            )
            .await;
        if !batch.success {
            let message = batch.error.unwrap_or_else(|| "文件上传失败".to_string());
            return SubmissionOutcome::failed(SubmissionStage::Upload, message);
        }

        // 上传后重新读取表单，URL 已写回
        let payload = match build_payload(kind, form.lesson_id, stripped(&form.values)) {
            Ok(payload) => payload,
            Err(e) => return SubmissionOutcome::failed(SubmissionStage::Validation, e.message),
        };

        let action = if form.editing_id.is_some() { "更新" } else { "创建" };
        tracing::info!("提交 {} (lesson={}, {})", kind, form.lesson_id, action);

        let saved_id = match self.persist(form.editing_id, &payload).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("保存 {} 失败: {}", kind, e);
                return SubmissionOutcome::failed(SubmissionStage::Backend, format!("保存失败: {}", e.message));
            }
        };

        if form.editing_id.is_none() {
            form.editing_id = saved_id;
        }
        SubmissionOutcome::Succeeded {
            id: saved_id,
            navigation: Navigation {
                route: kind.listing_route(form.lesson_id),
                delay: self.redirect_delay,
            },
        }
    }

    async fn persist(&self, editing_id: Option<i64>, payload: &Payload) -> Result<Option<i64>> {
        Ok(match (payload, editing_id) {
            (Payload::Content(item), None) => self.backend.create_content(item).await?.id,
            (Payload::Content(item), Some(id)) => {
                self.backend.update_content(id, item).await?.id.or(Some(id))
            }
            (Payload::Question(item), None) => self.backend.create_question(item).await?.id,
            (Payload::Question(item), Some(id)) => {
                self.backend.update_question(id, item).await?.id.or(Some(id))
            }
        })
    }
}
