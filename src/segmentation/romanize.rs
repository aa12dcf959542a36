//! 拼音生成
//!
//! 基于 `pinyin` crate 把汉字转换为拼音。非汉字字符（标点、字母、数字）原样保留，
//! 连续的非汉字字符视为一个音节单位。

use pinyin::ToPinyin;
use serde::{Deserialize, Serialize};

use super::is_han;

/// 声调呈现方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneStyle {
    /// 声调符号：nǐ hǎo
    #[default]
    Marks,
    /// 数字声调（置于末尾）：ni3 hao3
    Numbers,
    /// 不带声调：ni hao
    Plain,
}

impl std::str::FromStr for ToneStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "marks" | "symbol" => Ok(ToneStyle::Marks),
            "numbers" | "num" => Ok(ToneStyle::Numbers),
            "plain" | "none" => Ok(ToneStyle::Plain),
            other => Err(format!("未知的声调格式: {other}")),
        }
    }
}

fn render(ch: char, tone: ToneStyle) -> Option<&'static str> {
    let py = ch.to_pinyin()?;
    Some(match tone {
        ToneStyle::Marks => py.with_tone(),
        ToneStyle::Numbers => py.with_tone_num_end(),
        ToneStyle::Plain => py.plain(),
    })
}

/// 将文本拆成拼音音节列表，空白字符被丢弃
pub fn syllables(text: &str, tone: ToneStyle) -> Vec<String> {
    let mut out = Vec::new();
    let mut passthrough = String::new();

    for ch in text.chars() {
        let rendered = if is_han(ch) { render(ch, tone) } else { None };
        match rendered {
            Some(syllable) => {
                if !passthrough.is_empty() {
                    out.push(std::mem::take(&mut passthrough));
                }
                out.push(syllable.to_string());
            }
            None if ch.is_whitespace() => {
                if !passthrough.is_empty() {
                    out.push(std::mem::take(&mut passthrough));
                }
            }
            None => passthrough.push(ch),
        }
    }
    if !passthrough.is_empty() {
        out.push(passthrough);
    }
    out
}

/// 音节以空格分隔：`你好` → `nǐ hǎo`
pub fn romanize_spaced(text: &str, tone: ToneStyle) -> String {
    syllables(text, tone).join(" ")
}

/// 音节直接拼接（手动分段使用）：`你好` → `nǐhǎo`
pub fn romanize_fused(text: &str, tone: ToneStyle) -> String {
    syllables(text, tone).concat()
}
