//! カットライン（カット・ダイライン・スジ入れ等のガイド）判定
//!
//! 判定順:
//! 1. 要素名にパターンを含む
//! 2. パス系要素の塗り/線がスポットカラーを参照し、そのスポット名がパターンを含む
//!
//! カラー情報の読み取り失敗は「該当なし」として扱う。

use crate::error::{Error, Result};
use crate::model::{Color, Item, SpotColor};
use serde::{Deserialize, Serialize};

/// 既定のパターン（小文字・部分一致）
pub const DEFAULT_PATTERNS: &[&str] = &[
    "cutcontour",
    "cut contour",
    "cut_contour",
    "cut-contour",
    "cutline",
    "cut line",
    "dieline",
    "die line",
    "die-line",
    "die cut",
    "diecut",
    "kiss cut",
    "kisscut",
    "thru cut",
    "thrucut",
    "perf",
    "score",
    "crease",
];

/// 大文字小文字を区別しない部分一致パターン
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ContourPatterns {
    patterns: Vec<String>,
}

impl ContourPatterns {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.patterns.iter().any(|p| text.contains(p.as_str()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for ContourPatterns {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERNS)
    }
}

impl From<Vec<String>> for ContourPatterns {
    fn from(patterns: Vec<String>) -> Self {
        Self::new(patterns)
    }
}

impl From<ContourPatterns> for Vec<String> {
    fn from(p: ContourPatterns) -> Self {
        p.patterns
    }
}

/// カットライン要素かどうか
pub fn is_contour(item: &Item, spots: &[SpotColor], patterns: &ContourPatterns) -> bool {
    if item.name.as_deref().is_some_and(|name| patterns.matches(name)) {
        return true;
    }

    let Some(style) = item.path_style() else {
        return false;
    };

    [style.effective_stroke(), style.effective_fill()]
        .into_iter()
        .flatten()
        .any(|color| match spot_matches(color, spots, patterns) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::debug!(item = ?item.name, "カラー判定をスキップ: {}", e);
                false
            }
        })
}

/// 参照スポットカラー名がパターンに一致するか
fn spot_matches(color: &Color, spots: &[SpotColor], patterns: &ContourPatterns) -> Result<bool> {
    let Some(name) = color.spot_name()? else {
        return Ok(false);
    };
    let spot = spots
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| Error::Color(format!("未定義のスポットカラー: {}", name)))?;
    Ok(patterns.matches(&spot.name))
}
