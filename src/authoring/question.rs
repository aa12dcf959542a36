//! 练习题（选择、连线、填空、听音判断、听音看图）

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::content::{parse_record, require_parallel, require_text};
use crate::models::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    Matching,
    FillBlank,
    AudioBool,
    AudioImage,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::MultipleChoice,
        QuestionType::Matching,
        QuestionType::FillBlank,
        QuestionType::AudioBool,
        QuestionType::AudioImage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Matching => "matching",
            QuestionType::FillBlank => "fill_blank",
            QuestionType::AudioBool => "audio_bool",
            QuestionType::AudioImage => "audio_image",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleChoiceData {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_pinyin: Option<String>,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub label_zh: Vec<String>,
    pub label_pinyin: Vec<String>,
    pub label_en: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    pub pairs: Vec<MatchingPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillBlankData {
    pub sentence: Vec<String>,
    pub pinyin: Vec<String>,
    /// 被挖空的分段下标，答案即 `sentence[blank_index]`
    pub blank_index: usize,
    pub distractors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioBoolData {
    pub audio_url: String,
    pub transcript: Vec<String>,
    pub transcript_pinyin: Vec<String>,
    pub statement: String,
    pub is_true: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// 听音频，判断图片及其中文标签是否与音频一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioImageData {
    pub audio_url: String,
    pub image_url: String,
    pub transcript: Vec<String>,
    pub transcript_pinyin: Vec<String>,
    pub label_zh: Vec<String>,
    pub label_pinyin: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_en: Option<String>,
    pub is_match: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuestionData {
    MultipleChoice(MultipleChoiceData),
    Matching(MatchingData),
    FillBlank(FillBlankData),
    AudioBool(AudioBoolData),
    AudioImage(AudioImageData),
}

impl MultipleChoiceData {
    pub fn validate(&self) -> Result<()> {
        require_text(&self.prompt, "prompt")?;
        if self.options.len() < 2 {
            return Err(AppError::validation("选择题至少需要两个选项"));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(AppError::validation("选项不能为空"));
        }
        if self.correct_index >= self.options.len() {
            return Err(AppError::validation("正确答案下标超出选项范围"));
        }
        Ok(())
    }
}

impl MatchingData {
    pub fn validate(&self) -> Result<()> {
        if self.pairs.len() < 2 {
            return Err(AppError::validation("连线题至少需要两组配对"));
        }
        for (idx, pair) in self.pairs.iter().enumerate() {
            require_parallel(&pair.label_zh, &pair.label_pinyin, &format!("pairs[{idx}].label_zh"))?;
            require_text(&pair.label_en, &format!("pairs[{idx}].label_en"))?;
        }
        Ok(())
    }
}

impl FillBlankData {
    pub fn validate(&self) -> Result<()> {
        require_parallel(&self.sentence, &self.pinyin, "sentence")?;
        if self.blank_index >= self.sentence.len() {
            return Err(AppError::validation("挖空位置超出句子分段范围"));
        }
        if self.distractors.iter().all(|d| d.trim().is_empty()) {
            return Err(AppError::validation("至少需要一个干扰项"));
        }
        Ok(())
    }

    pub fn answer(&self) -> Option<&str> {
        self.sentence.get(self.blank_index).map(String::as_str)
    }
}

impl AudioBoolData {
    pub fn validate(&self) -> Result<()> {
        require_text(&self.audio_url, "audio_url")?;
        require_parallel(&self.transcript, &self.transcript_pinyin, "transcript")?;
        require_text(&self.statement, "statement")
    }
}

impl AudioImageData {
    pub fn validate(&self) -> Result<()> {
        require_text(&self.audio_url, "audio_url")?;
        require_text(&self.image_url, "image_url")?;
        require_parallel(&self.transcript, &self.transcript_pinyin, "transcript")?;
        require_parallel(&self.label_zh, &self.label_pinyin, "label_zh")
    }
}

impl QuestionData {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionData::MultipleChoice(_) => QuestionType::MultipleChoice,
            QuestionData::Matching(_) => QuestionType::Matching,
            QuestionData::FillBlank(_) => QuestionType::FillBlank,
            QuestionData::AudioBool(_) => QuestionType::AudioBool,
            QuestionData::AudioImage(_) => QuestionType::AudioImage,
        }
    }

    pub fn from_form(question_type: QuestionType, form: &Map<String, Value>) -> Result<Self> {
        let kind = question_type.as_str();
        let data = match question_type {
            QuestionType::MultipleChoice => QuestionData::MultipleChoice(parse_record(form, kind)?),
            QuestionType::Matching => QuestionData::Matching(parse_record(form, kind)?),
            QuestionType::FillBlank => QuestionData::FillBlank(parse_record(form, kind)?),
            QuestionType::AudioBool => QuestionData::AudioBool(parse_record(form, kind)?),
            QuestionType::AudioImage => QuestionData::AudioImage(parse_record(form, kind)?),
        };
        data.validate()?;
        Ok(data)
    }

    pub fn from_value(question_type: QuestionType, value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_form(question_type, &map),
            _ => Err(AppError::validation("题目 data 必须是对象")),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            QuestionData::MultipleChoice(d) => d.validate(),
            QuestionData::Matching(d) => d.validate(),
            QuestionData::FillBlank(d) => d.validate(),
            QuestionData::AudioBool(d) => d.validate(),
            QuestionData::AudioImage(d) => d.validate(),
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(match self {
            QuestionData::MultipleChoice(d) => serde_json::to_value(d)?,
            QuestionData::Matching(d) => serde_json::to_value(d)?,
            QuestionData::FillBlank(d) => serde_json::to_value(d)?,
            QuestionData::AudioBool(d) => serde_json::to_value(d)?,
            QuestionData::AudioImage(d) => serde_json::to_value(d)?,
        })
    }
}

/// 发送给后端 / 从后端读取的题目。`order_index` 由后端维护，创建时不发送。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub lesson_id: i64,
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub data: Value,
}

fn default_active() -> bool {
    true
}

impl QuestionItem {
    pub fn new(lesson_id: i64, data: &QuestionData, is_active: bool) -> Result<Self> {
        Ok(Self {
            id: None,
            lesson_id,
            question_type: data.question_type(),
            order_index: None,
            is_active,
            data: data.to_value()?,
        })
    }

    pub fn typed_data(&self) -> Result<QuestionData> {
        QuestionData::from_value(self.question_type, self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_multiple_choice_validation() {
        let err = QuestionData::from_form(
            QuestionType::MultipleChoice,
            &form(json!({ "prompt": "猫", "options": ["cat", "dog"], "correct_index": 2 })),
        )
        .unwrap_err();
        assert!(err.message.contains("下标"));

        let ok = QuestionData::from_form(
            QuestionType::MultipleChoice,
            &form(json!({ "prompt": "猫", "options": ["cat", "dog"], "correct_index": 0 })),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_fill_blank_answer() {
        let data = QuestionData::from_form(
            QuestionType::FillBlank,
            &form(json!({
                "sentence": ["我", "喜欢", "猫"],
                "pinyin": ["wǒ", "xǐ huan", "māo"],
                "blank_index": 1,
                "distractors": ["讨厌"]
            })),
        )
        .unwrap();
        match data {
            QuestionData::FillBlank(d) => assert_eq!(d.answer(), Some("喜欢")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_audio_bool_requires_audio() {
        let err = QuestionData::from_form(
            QuestionType::AudioBool,
            &form(json!({
                "audio_url": " ",
                "transcript": ["下雨"],
                "transcript_pinyin": ["xià yǔ"],
                "statement": "It is raining",
                "is_true": true
            })),
        )
        .unwrap_err();
        assert!(err.message.contains("audio_url"));
    }

    #[test]
    fn test_item_omits_order_index_on_create() {
        let data = QuestionData::Matching(MatchingData {
            instruction: None,
            pairs: vec![
                MatchingPair {
                    label_zh: vec!["猫".into()],
                    label_pinyin: vec!["māo".into()],
                    label_en: "cat".into(),
                },
                MatchingPair {
                    label_zh: vec!["狗".into()],
                    label_pinyin: vec!["gǒu".into()],
                    label_en: "dog".into(),
                },
            ],
        });
        let item = QuestionItem::new(3, &data, true).unwrap();
        let wire = serde_json::to_value(&item).unwrap();
        assert!(wire.get("orderIndex").is_none());
        assert_eq!(wire["questionType"], "matching");
        assert_eq!(wire["isActive"], true);
        assert_eq!(item.typed_data().unwrap(), data);
    }
}
