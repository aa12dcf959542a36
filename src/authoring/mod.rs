//! 课时内容与题目的编辑流程
//!
//! - `content` / `question`: 各类型的数据记录及校验
//! - `form`: 表单值、临时字段、分段写回
//! - `preview`: 表单 → 预览 JSON
//! - `orchestrator`: 上传 → 写回 → 清理 → 创建/更新 → 跳转

pub mod content;
pub mod form;
pub mod orchestrator;
pub mod preview;
pub mod question;

pub use content::{
    ContentData, ContentItem, ContentType, ItemType, SentenceData, WordDefinitionData,
};
pub use form::{
    apply_segmentation, nested_mut, restore_source, strip_transient, strip_transient_map, stripped,
    FormValues, SegmentBinding, TRANSIENT_FIELDS,
};
pub use orchestrator::{
    AuthoringBackend, AuthoringForm, Navigation, SubmissionOrchestrator, SubmissionOutcome,
    SubmissionStage,
};
pub use preview::{preview, preview_content, preview_question, BACKEND_PLACEHOLDER};
pub use question::{
    AudioBoolData, AudioImageData, FillBlankData, MatchingData, MatchingPair, MultipleChoiceData,
    QuestionData, QuestionItem, QuestionType,
};

use std::fmt;

use crate::upload::AssetKind;

/// 某类型对图片/音频的要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRequirement {
    Unsupported,
    Optional,
    Required,
}

impl AssetRequirement {
    pub fn is_supported(&self) -> bool {
        !matches!(self, AssetRequirement::Unsupported)
    }
}

const SENTENCE_BINDING: SegmentBinding =
    SegmentBinding::new("chinese_sentence_input", "chinese", "pinyin");
const FILL_BLANK_BINDING: SegmentBinding =
    SegmentBinding::new("chinese_sentence_input", "sentence", "pinyin");
const TRANSCRIPT_BINDING: SegmentBinding =
    SegmentBinding::new("transcript_input", "transcript", "transcript_pinyin");
const LABEL_BINDING: SegmentBinding = SegmentBinding::new("label_zh_input", "label_zh", "label_pinyin");

/// 连线题的分段作用在 `pairs[i]` 上
pub const MATCHING_PAIR_BINDING: SegmentBinding = LABEL_BINDING;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthoringKind {
    Content(ContentType),
    Question(QuestionType),
}

impl AuthoringKind {
    pub fn all() -> Vec<AuthoringKind> {
        ContentType::ALL
            .into_iter()
            .map(AuthoringKind::Content)
            .chain(QuestionType::ALL.into_iter().map(AuthoringKind::Question))
            .collect()
    }

    pub fn type_slug(&self) -> &'static str {
        match self {
            AuthoringKind::Content(t) => t.as_str(),
            AuthoringKind::Question(t) => t.as_str(),
        }
    }

    fn family(&self) -> &'static str {
        match self {
            AuthoringKind::Content(_) => "content",
            AuthoringKind::Question(_) => "questions",
        }
    }

    pub fn asset_requirement(&self, kind: AssetKind) -> AssetRequirement {
        use AssetRequirement::*;
        match (self, kind) {
            (AuthoringKind::Question(QuestionType::Matching), _) => Unsupported,
            (AuthoringKind::Question(QuestionType::FillBlank), AssetKind::Image) => Unsupported,
            (AuthoringKind::Question(QuestionType::AudioBool), AssetKind::Audio) => Required,
            (AuthoringKind::Question(QuestionType::AudioImage), _) => Required,
            _ => Optional,
        }
    }

    /// 上传目录：`{content|questions}/{type}/{images|audio}`
    pub fn upload_folder(&self, kind: AssetKind) -> String {
        format!("{}/{}/{}", self.family(), self.type_slug(), kind.folder_name())
    }

    /// 表单顶层的分段绑定（连线题的配对见 [`MATCHING_PAIR_BINDING`]）
    pub fn segment_bindings(&self) -> &'static [SegmentBinding] {
        match self {
            AuthoringKind::Content(ContentType::Sentence) => &[SENTENCE_BINDING],
            AuthoringKind::Question(QuestionType::FillBlank) => &[FILL_BLANK_BINDING],
            AuthoringKind::Question(QuestionType::AudioBool) => &[TRANSCRIPT_BINDING],
            AuthoringKind::Question(QuestionType::AudioImage) => {
                &[TRANSCRIPT_BINDING, LABEL_BINDING]
            }
            _ => &[],
        }
    }

    /// 提交成功后跳转的课时列表页
    pub fn listing_route(&self, lesson_id: i64) -> String {
        match self {
            AuthoringKind::Content(_) => format!("/lessons/{lesson_id}/content"),
            AuthoringKind::Question(_) => format!("/lessons/{lesson_id}/questions"),
        }
    }
}

impl fmt::Display for AuthoringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family(), self.type_slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_folder() {
        let kind = AuthoringKind::Question(QuestionType::AudioBool);
        assert_eq!(kind.upload_folder(AssetKind::Audio), "questions/audio_bool/audio");
        let kind = AuthoringKind::Content(ContentType::WordDefinition);
        assert_eq!(kind.upload_folder(AssetKind::Image), "content/word_definition/images");
    }

    #[test]
    fn test_asset_requirements() {
        let audio_image = AuthoringKind::Question(QuestionType::AudioImage);
        assert_eq!(audio_image.asset_requirement(AssetKind::Image), AssetRequirement::Required);
        let matching = AuthoringKind::Question(QuestionType::Matching);
        assert!(!matching.asset_requirement(AssetKind::Audio).is_supported());
        let sentence = AuthoringKind::Content(ContentType::Sentence);
        assert_eq!(sentence.asset_requirement(AssetKind::Audio), AssetRequirement::Optional);
    }

    #[test]
    fn test_every_kind_listed_once() {
        let kinds = AuthoringKind::all();
        assert_eq!(kinds.len(), 7);
        assert_eq!(kinds[0].to_string(), "content/word_definition");
        assert_eq!(
            AuthoringKind::Question(QuestionType::Matching).listing_route(4),
            "/lessons/4/questions"
        );
    }
}
