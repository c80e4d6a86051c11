//! レイヤー名 → 出力サイズ解決
//!
//! 1. サイズ表に完全一致 → Known
//! 2. `幅x高さ` 形式 → Derived（裁ち落とし込みサイズは各辺 bleed_per_side を加算）
//! 3. 数字のみで表に無い → Unrecognized（警告してスキップ）
//! 4. それ以外 → NotApplicable（黙って無視）

use regex::Regex;
use serde::{Deserialize, Serialize};

/// サイズ表の1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeEntry {
    /// レイヤー名
    pub key: String,
    /// 出力ファイル名（拡張子なし）
    pub output: String,
    /// 裁ち落とし込み幅（pt）
    pub bleed_width: f64,
    /// 裁ち落とし込み高さ（pt）
    pub bleed_height: f64,
    /// テンプレートグループのタグ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// サイズ解決の結果
#[derive(Debug, Clone, PartialEq)]
pub enum SizeResolution {
    Known(SizeEntry),
    Derived(SizeEntry),
    Unrecognized,
    NotApplicable,
}

impl SizeResolution {
    /// 書き出し対象のエントリ
    pub fn entry(&self) -> Option<&SizeEntry> {
        match self {
            SizeResolution::Known(entry) | SizeResolution::Derived(entry) => Some(entry),
            _ => None,
        }
    }
}

/// サイズ表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeTable {
    entries: Vec<SizeEntry>,
}

fn entry(key: &str, output: &str, bleed_width: f64, bleed_height: f64, template: &str) -> SizeEntry {
    SizeEntry {
        key: key.to_string(),
        output: output.to_string(),
        bleed_width,
        bleed_height,
        template: Some(template.to_string()),
    }
}

impl SizeTable {
    pub fn new(entries: Vec<SizeEntry>) -> Self {
        Self { entries }
    }

    /// 組み込みのサイズ表
    pub fn builtin() -> Self {
        Self::new(vec![
            entry("35", "79x90", 85.04, 95.67, "acrylic-35"),
            entry("50", "91x55", 97.0, 61.0, "card-50"),
            entry("63", "63x88", 69.0, 94.0, "card-63"),
        ])
    }

    /// 同じキーは後から追加した方で上書きする
    pub fn extend(&mut self, extra: impl IntoIterator<Item = SizeEntry>) {
        for entry in extra {
            self.entries.retain(|e| e.key != entry.key);
            self.entries.push(entry);
        }
    }

    pub fn get(&self, key: &str) -> Option<&SizeEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn entries(&self) -> &[SizeEntry] {
        &self.entries
    }

    /// レイヤー名を解決する（前後の空白は無視）
    pub fn resolve(&self, layer_name: &str, bleed_per_side: f64) -> SizeResolution {
        lazy_static::lazy_static! {
            static ref DIMENSIONS_RE: Regex = Regex::new(r"^([0-9]+)x([0-9]+)$").unwrap();
            static ref NUMERIC_RE: Regex = Regex::new(r"^[0-9]+$").unwrap();
        }

        let name = layer_name.trim();

        if let Some(found) = self.get(name) {
            return SizeResolution::Known(found.clone());
        }

        if let Some(caps) = DIMENSIONS_RE.captures(name) {
            // 巨大な値も算出対象（画素数の上限は描画側で判定）
            if let (Ok(width), Ok(height)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
                return SizeResolution::Derived(SizeEntry {
                    key: name.to_string(),
                    output: name.to_string(),
                    bleed_width: width + bleed_per_side * 2.0,
                    bleed_height: height + bleed_per_side * 2.0,
                    template: None,
                });
            }
        }

        if NUMERIC_RE.is_match(name) {
            return SizeResolution::Unrecognized;
        }

        SizeResolution::NotApplicable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_key_resolves_to_itself() {
        let table = SizeTable::builtin();
        for e in table.entries() {
            assert_eq!(table.resolve(&e.key, 3.0), SizeResolution::Known(e.clone()));
        }
    }

    #[test]
    fn test_known_35() {
        let table = SizeTable::builtin();
        let resolved = table.resolve(" 35 ", 3.0);
        let entry = resolved.entry().unwrap();
        assert_eq!(entry.output, "79x90");
        assert_eq!(entry.bleed_width, 85.04);
        assert_eq!(entry.bleed_height, 95.67);
        assert!(matches!(resolved, SizeResolution::Known(_)));
    }

    #[test]
    fn test_derived_dimensions() {
        let table = SizeTable::builtin();
        for (w, h) in [(54u32, 72u32), (1, 1), (100, 250)] {
            let name = format!("{}x{}", w, h);
            match table.resolve(&name, 3.0) {
                SizeResolution::Derived(e) => {
                    assert_eq!(e.output, name);
                    assert_eq!(e.bleed_width, w as f64 + 6.0);
                    assert_eq!(e.bleed_height, h as f64 + 6.0);
                    assert!(e.template.is_none());
                }
                other => panic!("{} → {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_derived_respects_bleed_policy() {
        let table = SizeTable::builtin();
        let e = table.resolve("54x72", 1.5).entry().cloned().unwrap();
        assert_eq!(e.bleed_width, 57.0);
        assert_eq!(e.bleed_height, 75.0);
    }

    #[test]
    fn test_derived_beyond_u32() {
        let table = SizeTable::builtin();
        let e = table.resolve("4294967296x1", 3.0).entry().cloned().unwrap();
        assert_eq!(e.output, "4294967296x1");
        assert_eq!(e.bleed_width, 4294967302.0);
        assert_eq!(e.bleed_height, 7.0);
    }

    #[test]
    fn test_table_wins_over_pattern() {
        let mut table = SizeTable::builtin();
        table.extend(vec![entry("54x72", "custom", 1.0, 2.0, "t")]);
        assert!(matches!(table.resolve("54x72", 3.0), SizeResolution::Known(_)));
    }

    #[test]
    fn test_unrecognized_numeric() {
        let table = SizeTable::builtin();
        assert_eq!(table.resolve("999", 3.0), SizeResolution::Unrecognized);
        assert_eq!(table.resolve(" 0 ", 3.0), SizeResolution::Unrecognized);
    }

    #[test]
    fn test_not_applicable() {
        let table = SizeTable::builtin();
        for name in ["abc", "", "54X72", "54x", "x72", "35 cards", "54x72x3", "３５"] {
            assert_eq!(table.resolve(name, 3.0), SizeResolution::NotApplicable, "{:?}", name);
        }
    }

    #[test]
    fn test_extend_overrides_same_key() {
        let mut table = SizeTable::builtin();
        let before = table.entries().len();
        table.extend(vec![entry("35", "override", 1.0, 1.0, "x")]);
        assert_eq!(table.entries().len(), before);
        assert_eq!(table.get("35").unwrap().output, "override");
    }
}
