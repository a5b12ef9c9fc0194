//! 照合パターン生成モジュール
//!
//! EANの後ろに付けて探すファイル名サフィックスを決める。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub const SUFFIXED_PNG: &str = "_1.png";
pub const SUFFIXED_JPG: &str = "_1.jpg";
pub const BARE_PNG: &str = ".png";
pub const BARE_JPG: &str = ".jpg";

/// 照合モードの設定（4つの独立したフラグ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// `{EAN}_1.png`
    #[serde(default = "enabled")]
    pub suffixed_png: bool,
    /// `{EAN}_1.jpg`
    #[serde(default = "enabled")]
    pub suffixed_jpg: bool,
    /// `{EAN}.png`
    #[serde(default)]
    pub bare_png: bool,
    /// `{EAN}.jpg`
    #[serde(default)]
    pub bare_jpg: bool,
}

fn enabled() -> bool {
    true
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            suffixed_png: true,
            suffixed_jpg: true,
            bare_png: false,
            bare_jpg: false,
        }
    }
}

impl MatchOptions {
    /// すべて無効な設定
    pub fn none() -> Self {
        Self {
            suffixed_png: false,
            suffixed_jpg: false,
            bare_png: false,
            bare_jpg: false,
        }
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        Ok(options)
    }
}

/// 有効なフラグに対応するサフィックスを固定の優先順で返す
pub fn build_patterns(options: &MatchOptions) -> Vec<&'static str> {
    [
        (options.suffixed_png, SUFFIXED_PNG),
        (options.suffixed_jpg, SUFFIXED_JPG),
        (options.bare_png, BARE_PNG),
        (options.bare_jpg, BARE_JPG),
    ]
    .into_iter()
    .filter(|(on, _)| *on)
    .map(|(_, pattern)| pattern)
    .collect()
}

/// 空でない照合パターン列（先頭ほど優先）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<String>,
}

impl PatternSet {
    /// 呼び出し側が指定した順序でパターン列を作る
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        if patterns.is_empty() {
            return Err(Error::Config(
                "照合パターンが1つも選択されていません".into(),
            ));
        }
        Ok(Self { patterns })
    }

    pub fn from_options(options: &MatchOptions) -> Result<Self> {
        Self::new(build_patterns(options))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
