//! 预览：表单状态 → 与提交数据同形的 JSON
//!
//! 纯函数。先按提交时的同一路径构建类型化条目，再把后端分配的字段换成占位文本；
//! 表单尚未填完、无法构建条目时，退回展示去除临时字段后的原始表单。

use serde_json::{json, Value};

use super::content::{ContentData, ContentItem, ContentType, ItemType};
use super::form::{stripped, FormValues};
use super::question::{QuestionData, QuestionItem, QuestionType};
use super::AuthoringKind;
use crate::models::Result;

pub const BACKEND_PLACEHOLDER: &str = "Auto-assigned by backend";

/// 提交给后端的条目
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Payload {
    Content(ContentItem),
    Question(QuestionItem),
}

impl Payload {
    fn to_value(&self) -> Result<Value> {
        Ok(match self {
            Payload::Content(item) => serde_json::to_value(item)?,
            Payload::Question(item) => serde_json::to_value(item)?,
        })
    }
}

/// 由已去除临时字段的表单构建类型化条目。`is_active` 提到题目顶层，缺省为 `true`。
pub(crate) fn build_payload(kind: AuthoringKind, lesson_id: i64, mut values: FormValues) -> Result<Payload> {
    match kind {
        AuthoringKind::Content(content_type) => {
            let data = ContentData::from_form(content_type, &values)?;
            Ok(Payload::Content(ContentItem::new(lesson_id, &data)?))
        }
        AuthoringKind::Question(question_type) => {
            let is_active = values
                .remove("is_active")
                .and_then(|v| v.as_bool())
                .unwrap_or(true);
            let data = QuestionData::from_form(question_type, &values)?;
            Ok(Payload::Question(QuestionItem::new(lesson_id, &data, is_active)?))
        }
    }
}

fn typed_preview(kind: AuthoringKind, lesson_id: i64, form: &FormValues) -> Option<Value> {
    let mut value = build_payload(kind, lesson_id, stripped(form))
        .and_then(|payload| payload.to_value())
        .ok()?;
    let map = value.as_object_mut()?;
    map.insert("id".to_string(), json!(BACKEND_PLACEHOLDER));
    if matches!(kind, AuthoringKind::Question(_)) {
        map.insert("orderIndex".to_string(), json!(BACKEND_PLACEHOLDER));
    }
    Some(value)
}

fn raw_content(content_type: ContentType, lesson_id: i64, form: &FormValues) -> Value {
    json!({
        "id": BACKEND_PLACEHOLDER,
        "lessonId": lesson_id,
        "itemType": ItemType::Content,
        "contentType": content_type,
        "data": Value::Object(stripped(form)),
    })
}

fn raw_question(question_type: QuestionType, lesson_id: i64, form: &FormValues) -> Value {
    let mut data = stripped(form);
    let is_active = data
        .remove("is_active")
        .and_then(|v| v.as_bool())
        .unwrap_or(true);
    json!({
        "id": BACKEND_PLACEHOLDER,
        "lessonId": lesson_id,
        "questionType": question_type,
        "orderIndex": BACKEND_PLACEHOLDER,
        "isActive": is_active,
        "data": Value::Object(data),
    })
}

pub fn preview_content(content_type: ContentType, lesson_id: i64, form: &FormValues) -> Value {
    preview(AuthoringKind::Content(content_type), lesson_id, form)
}

pub fn preview_question(question_type: QuestionType, lesson_id: i64, form: &FormValues) -> Value {
    preview(AuthoringKind::Question(question_type), lesson_id, form)
}

pub fn preview(kind: AuthoringKind, lesson_id: i64, form: &FormValues) -> Value {
    if let Some(value) = typed_preview(kind, lesson_id, form) {
        return value;
    }
    match kind {
        AuthoringKind::Content(t) => raw_content(t, lesson_id, form),
        AuthoringKind::Question(t) => raw_question(t, lesson_id, form),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_preview_shape() {
        let form = json!({
            "transcript_input": "下雨了",
            "transcript": ["下雨", "了"],
            "transcript_pinyin": ["xià yǔ", "le"],
            "statement": "It is raining",
            "is_true": true,
            "is_active": false
        });
        let value = preview_question(QuestionType::AudioBool, 9, form.as_object().unwrap());
        assert_eq!(value["orderIndex"], BACKEND_PLACEHOLDER);
        assert_eq!(value["isActive"], false);
        assert_eq!(value["questionType"], "audio_bool");
        assert!(value["data"].get("transcript_input").is_none());
        assert!(value["data"].get("is_active").is_none());
    }

    #[test]
    fn test_content_preview_is_pure() {
        let form = json!({ "chinese_sentence_input": "你好", "english": "hello" });
        let form = form.as_object().unwrap();
        let first = preview(AuthoringKind::Content(ContentType::Sentence), 1, form);
        let second = preview(AuthoringKind::Content(ContentType::Sentence), 1, form);
        assert_eq!(first, second);
        assert_eq!(first["id"], BACKEND_PLACEHOLDER);
        assert!(form.contains_key("chinese_sentence_input"));
    }

    #[test]
    fn test_preview_matches_typed_payload() {
        let form = json!({
            "chinese": "猫",
            "pinyin": "māo",
            "definition": "cat",
            "notes": "only for editors",
            "example": null
        });
        let form = form.as_object().unwrap();
        let value = preview_content(ContentType::WordDefinition, 4, form);
        let payload = build_payload(AuthoringKind::Content(ContentType::WordDefinition), 4, stripped(form)).unwrap();
        let Payload::Content(item) = payload else { panic!("expected content payload") };

        assert_eq!(value["data"], item.data);
        assert!(value["data"].get("notes").is_none());
        assert!(value["data"].get("example").is_none());
        assert_eq!(value["id"], BACKEND_PLACEHOLDER);
        assert_eq!(value["lessonId"], 4);
        assert_eq!(value["contentType"], "word_definition");
    }

    #[test]
    fn test_question_preview_overlays_placeholders() {
        let form = json!({
            "prompt": "哪个是猫？",
            "options": ["猫", "狗", "鸟"],
            "correct_index": 0,
            "is_active": false
        });
        let value = preview_question(QuestionType::MultipleChoice, 2, form.as_object().unwrap());
        assert_eq!(value["orderIndex"], BACKEND_PLACEHOLDER);
        assert_eq!(value["id"], BACKEND_PLACEHOLDER);
        assert_eq!(value["isActive"], false);
        assert!(value["data"].get("is_active").is_none());
    }
}
