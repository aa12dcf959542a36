//! 中文分段与拼音预览
//!
//! 给定原文与分段模式，产出两个等长、一一对应的序列：分段 `segments` 与拼音
//! `romanizations`。每次原文或模式变化都整体重新生成，不做增量修补。
//!
//! ## 分段模式
//! - **character**: 逐字
//! - **word**: jieba 词典切分，失败时逐字
//! - **phrase**: jieba 最大概率切分 → 2-4 字正则分组 → 逐字
//! - **long_phrase**: 合并相邻词的最少分段 → 3-6 字正则分组 → 逐字
//! - **manual**: 按 `;` 切分，每段拼音音节直接拼接
//!
//! ## 使用示例
//! ```rust,ignore
//! let seg = segment_text("我喜欢学习中文", SegmentationMode::Word, ToneStyle::Marks);
//! assert_eq!(seg.segments.len(), seg.romanizations.len());
//! ```

mod romanize;
mod strategies;

pub use romanize::{romanize_fused, romanize_spaced, syllables, ToneStyle};
pub use strategies::{
    run_chain, CharacterSegmenter, JiebaMode, JiebaSegmenter, ManualSegmenter,
    RunGroupingSegmenter, SegmentError, Segmenter, MANUAL_DELIMITERS,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// 判断是否为汉字（CJK 统一表意文字及扩展区）
pub fn is_han(c: char) -> bool {
    matches!(
        c,
        '\u{4E00}'..='\u{9FFF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{20000}'..='\u{2A6DF}'
            | '\u{2A700}'..='\u{2EBEF}'
            | '\u{30000}'..='\u{3134F}'
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationMode {
    #[default]
    Character,
    Word,
    Phrase,
    LongPhrase,
    Manual,
}

impl SegmentationMode {
    pub const ALL: [SegmentationMode; 5] = [
        SegmentationMode::Character,
        SegmentationMode::Word,
        SegmentationMode::Phrase,
        SegmentationMode::LongPhrase,
        SegmentationMode::Manual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentationMode::Character => "character",
            SegmentationMode::Word => "word",
            SegmentationMode::Phrase => "phrase",
            SegmentationMode::LongPhrase => "long_phrase",
            SegmentationMode::Manual => "manual",
        }
    }

    /// 该模式的策略链，最后一项总是逐字切分
    pub fn strategies(&self) -> Vec<Box<dyn Segmenter>> {
        match self {
            SegmentationMode::Character => vec![Box::new(CharacterSegmenter)],
            SegmentationMode::Word => vec![
                Box::new(JiebaSegmenter::new(JiebaMode::Dictionary)),
                Box::new(CharacterSegmenter),
            ],
            SegmentationMode::Phrase => vec![
                Box::new(JiebaSegmenter::new(JiebaMode::Probabilistic)),
                Box::new(RunGroupingSegmenter::new(2, 4)),
                Box::new(CharacterSegmenter),
            ],
            SegmentationMode::LongPhrase => vec![
                Box::new(JiebaSegmenter::new(JiebaMode::Merged { max_chars: 6 })),
                Box::new(RunGroupingSegmenter::new(3, 6)),
                Box::new(CharacterSegmenter),
            ],
            SegmentationMode::Manual => vec![Box::new(ManualSegmenter)],
        }
    }
}

impl fmt::Display for SegmentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SegmentationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "character" => Ok(SegmentationMode::Character),
            "word" => Ok(SegmentationMode::Word),
            "phrase" => Ok(SegmentationMode::Phrase),
            "long_phrase" | "long-phrase" => Ok(SegmentationMode::LongPhrase),
            "manual" => Ok(SegmentationMode::Manual),
            other => Err(format!("未知的分段模式: {other}")),
        }
    }
}

/// 分段结果：`segments[i]` 的拼音是 `romanizations[i]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub segments: Vec<String>,
    pub romanizations: Vec<String>,
}

impl Segmentation {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.segments
            .iter()
            .map(String::as_str)
            .zip(self.romanizations.iter().map(String::as_str))
    }
}

/// 对原文分段并生成逐段拼音，永不失败
pub fn segment_text(text: &str, mode: SegmentationMode, tone: ToneStyle) -> Segmentation {
    if text.trim().is_empty() {
        return Segmentation::default();
    }

    let chain = mode.strategies();
    let (segments, used) = run_chain(&chain, text);
    tracing::debug!("分段完成: mode={} strategy={} count={}", mode, used, segments.len());

    let romanizations = segments
        .iter()
        .map(|segment| match mode {
            SegmentationMode::Manual => romanize_fused(segment, tone),
            _ => romanize_spaced(segment, tone),
        })
        .collect();

    Segmentation {
        segments,
        romanizations,
    }
}
