//! 课时学习内容（词语释义、例句）

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::models::{AppError, Result};
use crate::segmentation::SegmentationMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    WordDefinition,
    Sentence,
}

impl ContentType {
    pub const ALL: [ContentType; 2] = [ContentType::WordDefinition, ContentType::Sentence];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::WordDefinition => "word_definition",
            ContentType::Sentence => "sentence",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 条目类别（课时内容列表同时包含内容与题目）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Content,
    Question,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDefinitionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_id: Option<i64>,
    pub chinese: String,
    pub pinyin: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceData {
    /// 分段后的中文
    pub chinese: Vec<String>,
    /// 与 `chinese` 一一对应的拼音
    pub pinyin: Vec<String>,
    pub english: String,
    #[serde(default)]
    pub segmentation_mode: SegmentationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentData {
    WordDefinition(WordDefinitionData),
    Sentence(SentenceData),
}

pub(crate) fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(AppError::validation(format!("{field} 不能为空")))
    } else {
        Ok(())
    }
}

/// 分段与拼音必须非空且等长
pub(crate) fn require_parallel(segments: &[String], romanizations: &[String], field: &str) -> Result<()> {
    if segments.is_empty() {
        return Err(AppError::validation(format!("{field} 不能为空")));
    }
    if segments.len() != romanizations.len() {
        return Err(AppError::validation(format!(
            "{field} 分段数 ({}) 与拼音数 ({}) 不一致",
            segments.len(),
            romanizations.len()
        )));
    }
    Ok(())
}

pub(crate) fn parse_record<T: DeserializeOwned>(form: &Map<String, Value>, kind: &str) -> Result<T> {
    serde_json::from_value(Value::Object(form.clone()))
        .map_err(|e| AppError::validation(format!("{kind} 表单数据无效: {e}")))
}

impl WordDefinitionData {
    pub fn validate(&self) -> Result<()> {
        require_text(&self.chinese, "chinese")?;
        require_text(&self.pinyin, "pinyin")?;
        require_text(&self.definition, "definition")
    }
}

impl SentenceData {
    pub fn validate(&self) -> Result<()> {
        require_parallel(&self.chinese, &self.pinyin, "chinese")?;
        require_text(&self.english, "english")
    }
}

impl ContentData {
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentData::WordDefinition(_) => ContentType::WordDefinition,
            ContentData::Sentence(_) => ContentType::Sentence,
        }
    }

    /// 从已去除临时字段的表单值构建并校验
    pub fn from_form(content_type: ContentType, form: &Map<String, Value>) -> Result<Self> {
        let data = match content_type {
            ContentType::WordDefinition => {
                ContentData::WordDefinition(parse_record(form, content_type.as_str())?)
            }
            ContentType::Sentence => ContentData::Sentence(parse_record(form, content_type.as_str())?),
        };
        data.validate()?;
        Ok(data)
    }

    pub fn from_value(content_type: ContentType, value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_form(content_type, &map),
            _ => Err(AppError::validation("内容 data 必须是对象")),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ContentData::WordDefinition(d) => d.validate(),
            ContentData::Sentence(d) => d.validate(),
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(match self {
            ContentData::WordDefinition(d) => serde_json::to_value(d)?,
            ContentData::Sentence(d) => serde_json::to_value(d)?,
        })
    }
}

/// 发送给后端 / 从后端读取的内容条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub lesson_id: i64,
    pub item_type: ItemType,
    pub content_type: ContentType,
    pub data: Value,
}

impl ContentItem {
    pub fn new(lesson_id: i64, data: &ContentData) -> Result<Self> {
        Ok(Self {
            id: None,
            lesson_id,
            item_type: ItemType::Content,
            content_type: data.content_type(),
            data: data.to_value()?,
        })
    }

    pub fn typed_data(&self) -> Result<ContentData> {
        ContentData::from_value(self.content_type, self.data.clone())
    }
}
