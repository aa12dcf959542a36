//! 文件上传
//!
//! 编辑表单最多有两个上传槽位（图片、音频）。上传走预签名直传：
//! 后端签发写入地址，客户端直接 PUT 到对象存储，成功后把公开 URL 写回表单。
//!
//! ## 使用示例
//! ```rust,ignore
//! let coordinator = UploadCoordinator::new(api.clone());
//! let file = LocalFile::from_path(Path::new("rain.mp3"))?;
//! validate_file(&file, AssetKind::Audio, 10).into_result()?;
//! let outcome = coordinator.upload(&file, "questions/audio_bool/audio", None).await;
//! ```

mod coordinator;
mod presigned;
mod slots;
mod validate;

pub use coordinator::{BatchOutcome, ProgressFn, UploadCoordinator, UploadOutcome, UploadSlots};
pub use presigned::{
    ByteProgressCallback, DirectUploader, PresignProvider, PresignRequest, PresignedTarget,
};
pub use slots::{SlotState, UploadSlot};
pub use validate::{infer_mime_from_path, validate_file, AssetKind, FileValidation, LocalFile};
