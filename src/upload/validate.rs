//! 本地文件描述与上传前校验

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::models::{AppError, Result};

/// 上传槽位的资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Audio,
}

impl AssetKind {
    pub fn mime_prefix(&self) -> &'static str {
        match self {
            AssetKind::Image => "image/",
            AssetKind::Audio => "audio/",
        }
    }

    /// 上传完成后写回表单的字段名
    pub fn url_field(&self) -> &'static str {
        match self {
            AssetKind::Image => "image_url",
            AssetKind::Audio => "audio_url",
        }
    }

    pub fn folder_name(&self) -> &'static str {
        match self {
            AssetKind::Image => "images",
            AssetKind::Audio => "audio",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Image => "图片",
            AssetKind::Audio => "音频",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Image => write!(f, "image"),
            AssetKind::Audio => write!(f, "audio"),
        }
    }
}

/// 待上传的本地文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

impl LocalFile {
    pub fn new(
        path: impl Into<PathBuf>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            path: path.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            size,
        }
    }

    /// 读取文件元信息，按扩展名推断 MIME 类型
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| AppError::file_system(format!("读取文件元信息失败: {e}")))?;
        if !metadata.is_file() {
            return Err(AppError::validation(format!("不是文件: {}", path.display())));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AppError::validation("文件名无效"))?;
        Ok(Self {
            path: path.to_path_buf(),
            content_type: infer_mime_from_path(path).to_string(),
            file_name,
            size: metadata.len(),
        })
    }
}

pub fn infer_mime_from_path(path: &Path) -> &'static str {
    let lower = path.to_string_lossy().to_lowercase();
    let ext = lower.rsplit('.').next().unwrap_or("");
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "webm" => "audio/webm",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

/// 校验结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileValidation {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileValidation {
    fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    fn invalid(message: String) -> Self {
        Self {
            is_valid: false,
            error: Some(message),
        }
    }

    pub fn into_result(self) -> Result<()> {
        match self.error {
            Some(message) if !self.is_valid => Err(AppError::validation(message)),
            _ => Ok(()),
        }
    }
}

/// 检查 MIME 前缀与大小上限（`max_size_mb` 以 MiB 计）
pub fn validate_file(file: &LocalFile, kind: AssetKind, max_size_mb: u64) -> FileValidation {
    if !file
        .content_type
        .to_ascii_lowercase()
        .starts_with(kind.mime_prefix())
    {
        return FileValidation::invalid(format!(
            "请选择{}文件（当前类型: {}）",
            kind.label(),
            if file.content_type.is_empty() {
                "未知"
            } else {
                &file.content_type
            }
        ));
    }

    let limit = max_size_mb.saturating_mul(1024 * 1024);
    if file.size > limit {
        return FileValidation::invalid(format!(
            "{}文件不能超过 {}MB（当前 {:.1}MB）",
            kind.label(),
            max_size_mb,
            file.size as f64 / 1024.0 / 1024.0
        ));
    }

    FileValidation::ok()
}
