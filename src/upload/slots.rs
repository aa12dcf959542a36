//! 单个上传槽位的状态机
//!
//! `Empty → Selected → Uploading → {Uploaded | Failed}`。
//! `Uploaded` 锁定槽位，只有 `clear` 能回到 `Empty`，同时移除表单中的 URL 字段。

use serde_json::{Map, Value};

use super::validate::{AssetKind, LocalFile};
use crate::models::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Selected(LocalFile),
    Uploading(LocalFile),
    Uploaded { url: String },
    Failed { file: LocalFile, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSlot {
    kind: AssetKind,
    state: SlotState,
}

impl UploadSlot {
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            state: SlotState::Empty,
        }
    }

    /// 编辑已有条目时，已存在的 URL 直接视为已上传
    pub fn with_url(kind: AssetKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            state: SlotState::Uploaded { url: url.into() },
        }
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, SlotState::Empty)
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, SlotState::Uploaded { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match &self.state {
            SlotState::Uploaded { url } => Some(url),
            _ => None,
        }
    }

    /// 等待上传的文件（已选择，或上次失败可重试）
    pub fn pending_file(&self) -> Option<&LocalFile> {
        match &self.state {
            SlotState::Selected(file) | SlotState::Failed { file, .. } => Some(file),
            _ => None,
        }
    }

    pub fn select(&mut self, file: LocalFile) -> Result<()> {
        match self.state {
            SlotState::Uploaded { .. } => Err(AppError::validation(format!(
                "{}已上传，请先移除后再重新选择",
                self.kind.label()
            ))),
            SlotState::Uploading(_) => Err(AppError::validation(format!(
                "{}正在上传中",
                self.kind.label()
            ))),
            _ => {
                self.state = SlotState::Selected(file);
                Ok(())
            }
        }
    }

    /// 有待上传文件时进入上传中状态并返回该文件
    pub(crate) fn begin(&mut self) -> Option<LocalFile> {
        let file = self.pending_file().cloned()?;
        self.state = SlotState::Uploading(file.clone());
        Some(file)
    }

    pub(crate) fn complete(&mut self, url: String) {
        self.state = SlotState::Uploaded { url };
    }

    pub(crate) fn fail(&mut self, message: String) {
        let file = match std::mem::replace(&mut self.state, SlotState::Empty) {
            SlotState::Uploading(file) | SlotState::Selected(file) => file,
            SlotState::Failed { file, .. } => file,
            other => {
                self.state = other;
                return;
            }
        };
        self.state = SlotState::Failed { file, message };
    }

    /// 清空槽位，并移除表单中对应的 URL 字段
    pub fn clear(&mut self, form: &mut Map<String, Value>) {
        self.state = SlotState::Empty;
        form.remove(self.kind.url_field());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn png() -> LocalFile {
        LocalFile::new("/tmp/a.png", "a.png", "image/png", 10)
    }

    #[test]
    fn test_state_transitions() {
        let mut slot = UploadSlot::new(AssetKind::Image);
        assert!(slot.is_empty());
        slot.select(png()).unwrap();
        assert_eq!(slot.pending_file(), Some(&png()));

        let file = slot.begin().unwrap();
        assert_eq!(file, png());
        assert!(slot.select(png()).is_err());

        slot.fail("网络错误".into());
        assert!(matches!(slot.state(), SlotState::Failed { .. }));
        assert!(slot.pending_file().is_some());

        slot.begin().unwrap();
        slot.complete("https://cdn.example.com/a.png".into());
        assert!(slot.is_locked());
        assert_eq!(slot.url(), Some("https://cdn.example.com/a.png"));
    }

    #[test]
    fn test_uploaded_slot_is_locked_until_cleared() {
        let mut form = json!({ "image_url": "https://cdn.example.com/a.png", "english": "hi" })
            .as_object()
            .cloned()
            .unwrap();
        let mut slot = UploadSlot::with_url(AssetKind::Image, "https://cdn.example.com/a.png");
        assert!(slot.select(png()).is_err());

        slot.clear(&mut form);
        assert!(slot.is_empty());
        assert!(!form.contains_key("image_url"));
        assert!(form.contains_key("english"));
        slot.select(png()).unwrap();
    }

    #[test]
    fn test_begin_without_file_is_noop() {
        let mut slot = UploadSlot::new(AssetKind::Audio);
        assert!(slot.begin().is_none());
        assert!(slot.is_empty());
    }
}
