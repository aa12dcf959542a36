//! 分词策略
//!
//! 每种分段模式对应一串按顺序尝试的策略，第一个成功的结果生效；
//! 链条最后一个策略（逐字切分）保证不会失败。

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::LazyLock;

use jieba_rs::Jieba;
use regex::Regex;
use thiserror::Error;

use super::is_han;

static JIEBA: LazyLock<Jieba> = LazyLock::new(Jieba::new);

/// 单个策略失败的原因（只记录日志，不展示给用户）
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("分词库 panic: {0}")]
    LibraryPanic(String),
    #[error("分词结果与原文不一致: 期望 {expected:?}, 实际 {actual:?}")]
    UnexpectedShape { expected: String, actual: String },
    #[error("分词结果为空")]
    Empty,
    #[error("分组正则无效: {0}")]
    Pattern(#[from] regex::Error),
}

pub type SegmentResult = std::result::Result<Vec<String>, SegmentError>;

pub trait Segmenter: Send + Sync {
    fn name(&self) -> &'static str;

    fn segment(&self, text: &str) -> SegmentResult;
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 清理库输出：去掉空白分段，并校验拼接后与原文（去空白）一致
fn normalize_output(text: &str, raw: Vec<&str>) -> SegmentResult {
    let segments: Vec<String> = raw
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let expected = strip_whitespace(text);
    if !expected.is_empty() && segments.is_empty() {
        return Err(SegmentError::Empty);
    }
    let actual = strip_whitespace(&segments.concat());
    if actual != expected {
        return Err(SegmentError::UnexpectedShape { expected, actual });
    }
    Ok(segments)
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// jieba 分词方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JiebaMode {
    /// 纯词典切分（不启用 HMM）
    Dictionary,
    /// 最大概率切分，HMM 识别未登录词
    Probabilistic,
    /// 最少分段：在 HMM 结果上合并相邻汉字词，单段不超过 `max_chars`
    Merged { max_chars: usize },
}

pub struct JiebaSegmenter {
    mode: JiebaMode,
}

impl JiebaSegmenter {
    pub fn new(mode: JiebaMode) -> Self {
        Self { mode }
    }

    fn cut(&self, text: &str) -> SegmentResult {
        let hmm = !matches!(self.mode, JiebaMode::Dictionary);
        let raw = catch_unwind(AssertUnwindSafe(|| JIEBA.cut(text, hmm)))
            .map_err(|p| SegmentError::LibraryPanic(panic_message(p)))?;
        normalize_output(text, raw)
    }
}

fn merge_han_runs(words: Vec<String>, max_chars: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(words.len());
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in words {
        let len = word.chars().count();
        let all_han = word.chars().all(is_han);
        if all_han && current_len + len <= max_chars {
            current.push_str(&word);
            current_len += len;
            continue;
        }
        if !current.is_empty() {
            merged.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if all_han {
            current_len = len;
            current = word;
        } else {
            merged.push(word);
        }
    }
    if !current.is_empty() {
        merged.push(current);
    }
    merged
}

impl Segmenter for JiebaSegmenter {
    fn name(&self) -> &'static str {
        match self.mode {
            JiebaMode::Dictionary => "jieba-dictionary",
            JiebaMode::Probabilistic => "jieba-hmm",
            JiebaMode::Merged { .. } => "jieba-merged",
        }
    }

    fn segment(&self, text: &str) -> SegmentResult {
        let words = self.cut(text)?;
        match self.mode {
            JiebaMode::Merged { max_chars } => Ok(merge_han_runs(words, max_chars.max(1))),
            _ => Ok(words),
        }
    }
}

/// 正则分组兜底：连续汉字按 `min..=max` 个一组，非汉字串整体保留
pub struct RunGroupingSegmenter {
    min: usize,
    max: usize,
}

impl RunGroupingSegmenter {
    pub fn new(min: usize, max: usize) -> Self {
        let min = min.max(1);
        Self {
            min,
            max: max.max(min),
        }
    }
}

impl Segmenter for RunGroupingSegmenter {
    fn name(&self) -> &'static str {
        "run-grouping"
    }

    fn segment(&self, text: &str) -> SegmentResult {
        let pattern = Regex::new(&format!(
            r"\p{{Han}}{{{},{}}}|\p{{Han}}|[^\p{{Han}}\s]+",
            self.min, self.max
        ))?;
        let raw: Vec<&str> = pattern.find_iter(text).map(|m| m.as_str()).collect();
        normalize_output(text, raw)
    }
}

/// 逐字切分，永不失败
pub struct CharacterSegmenter;

impl Segmenter for CharacterSegmenter {
    fn name(&self) -> &'static str {
        "character"
    }

    fn segment(&self, text: &str) -> SegmentResult {
        Ok(split_characters(text))
    }
}

pub fn split_characters(text: &str) -> Vec<String> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_string())
        .collect()
}

/// 按作者插入的分号切分（半角 `;` 与全角 `；` 均可）
pub struct ManualSegmenter;

pub const MANUAL_DELIMITERS: [char; 2] = [';', '；'];

impl Segmenter for ManualSegmenter {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn segment(&self, text: &str) -> SegmentResult {
        Ok(text
            .split(&MANUAL_DELIMITERS[..])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// 依次尝试策略，返回第一个成功的结果及其名称
pub fn run_chain(chain: &[Box<dyn Segmenter>], text: &str) -> (Vec<String>, &'static str) {
    for strategy in chain {
        let attempt = catch_unwind(AssertUnwindSafe(|| strategy.segment(text)))
            .unwrap_or_else(|p| Err(SegmentError::LibraryPanic(panic_message(p))));
        match attempt {
            Ok(segments) => return (segments, strategy.name()),
            Err(e) => {
                tracing::debug!("分词策略 {} 失败，降级到下一层: {}", strategy.name(), e);
            }
        }
    }
    (split_characters(text), CharacterSegmenter.name())
}
