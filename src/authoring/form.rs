//! 表单值与临时字段处理
//!
//! 表单状态用一个 JSON 对象表示。带 `_input` 后缀的字段只保存原始输入，
//! 用于驱动分段预览，不能出现在预览或提交的数据中。

use serde_json::{Map, Value};

use crate::segmentation::{segment_text, Segmentation, SegmentationMode, ToneStyle};

pub type FormValues = Map<String, Value>;

/// 仅在编辑期间存在的原始输入字段
pub const TRANSIENT_FIELDS: [&str; 3] = [
    "transcript_input",
    "label_zh_input",
    "chinese_sentence_input",
];

pub fn is_transient(key: &str) -> bool {
    TRANSIENT_FIELDS.contains(&key)
}

/// 递归移除临时字段（包括连线题配对、选项等嵌套对象）
pub fn strip_transient(value: &mut Value) {
    match value {
        Value::Object(map) => strip_transient_map(map),
        Value::Array(items) => items.iter_mut().for_each(strip_transient),
        _ => {}
    }
}

pub fn strip_transient_map(map: &mut FormValues) {
    map.retain(|key, _| !is_transient(key));
    for value in map.values_mut() {
        strip_transient(value);
    }
}

/// 返回去除临时字段后的副本
pub fn stripped(form: &FormValues) -> FormValues {
    let mut copy = form.clone();
    strip_transient_map(&mut copy);
    copy
}

/// 原文字段 → 分段字段 + 拼音字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentBinding {
    pub source: &'static str,
    pub segments_field: &'static str,
    pub romanizations_field: &'static str,
}

impl SegmentBinding {
    pub const fn new(
        source: &'static str,
        segments_field: &'static str,
        romanizations_field: &'static str,
    ) -> Self {
        Self {
            source,
            segments_field,
            romanizations_field,
        }
    }
}

fn string_list(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

/// 读取原文字段重新分段，无条件覆盖两个目标字段
pub fn apply_segmentation(
    form: &mut FormValues,
    binding: &SegmentBinding,
    mode: SegmentationMode,
    tone: ToneStyle,
) -> Segmentation {
    let source = form
        .get(binding.source)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let segmentation = segment_text(&source, mode, tone);
    form.insert(
        binding.segments_field.to_string(),
        string_list(segmentation.segments.clone()),
    );
    form.insert(
        binding.romanizations_field.to_string(),
        string_list(segmentation.romanizations.clone()),
    );
    segmentation
}

/// 编辑已有条目时由已保存的分段还原原文字段，已有原文时不覆盖。
/// 手动模式用 `;` 连接以保留分段边界。
pub fn restore_source(form: &mut FormValues, binding: &SegmentBinding, mode: SegmentationMode) {
    let has_source = form
        .get(binding.source)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty());
    if has_source {
        return;
    }
    let text = match form.get(binding.segments_field) {
        Some(Value::Array(items)) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if mode == SegmentationMode::Manual {
                parts.join(";")
            } else {
                parts.concat()
            }
        }
        Some(Value::String(s)) => s.clone(),
        _ => return,
    };
    if !text.is_empty() {
        form.insert(binding.source.to_string(), Value::String(text));
    }
}

/// 取出数组字段中第 `index` 个对象（如 `pairs[1]`）
pub fn nested_mut<'a>(form: &'a mut FormValues, field: &str, index: usize) -> Option<&'a mut FormValues> {
    form.get_mut(field)?
        .as_array_mut()?
        .get_mut(index)?
        .as_object_mut()
}
