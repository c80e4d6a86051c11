//! カットライン要素の一時非表示と復元
//!
//! 深さ優先で要素を走査し、カットラインと判定した要素を非表示にして台帳へ記録する。
//! 復元は台帳の要素をすべて表示に戻すだけ。
//!
//! - 最初から非表示の要素は記録せず、子孫も走査しない
//! - グループ自身が非表示になっても子要素はそれぞれ判定する

use crate::contour::{is_contour, ContourPatterns};
use crate::model::{Document, Item, SpotColor};
use std::ops::Deref;

/// レイヤー内の要素位置（各階層のインデックス）
pub type ItemPath = Vec<usize>;

/// 非表示にした要素の台帳（記録順）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HiddenLedger {
    entries: Vec<ItemPath>,
}

impl HiddenLedger {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> &[ItemPath] {
        &self.entries
    }
}

/// カットライン要素を非表示にし、台帳を返す
pub fn hide_contours(items: &mut [Item], spots: &[SpotColor], patterns: &ContourPatterns) -> HiddenLedger {
    let mut ledger = HiddenLedger::default();
    let mut path = Vec::new();
    hide_in(items, spots, patterns, &mut path, &mut ledger);
    ledger
}

fn hide_in(
    items: &mut [Item],
    spots: &[SpotColor],
    patterns: &ContourPatterns,
    path: &mut ItemPath,
    ledger: &mut HiddenLedger,
) {
    for (index, item) in items.iter_mut().enumerate() {
        if item.hidden {
            continue;
        }

        path.push(index);

        if is_contour(item, spots, patterns) {
            item.hidden = true;
            ledger.entries.push(path.clone());
            tracing::debug!(path = ?path, name = ?item.name, "カットラインを非表示");
        }

        if let Some(children) = item.children_mut() {
            hide_in(children, spots, patterns, path, ledger);
        }

        path.pop();
    }
}

/// 台帳の要素をすべて表示に戻す
pub fn restore_hidden(items: &mut [Item], ledger: &HiddenLedger) {
    for path in &ledger.entries {
        match item_at_mut(items, path) {
            Some(item) => item.hidden = false,
            None => tracing::warn!(path = ?path, "復元対象の要素が見つかりません"),
        }
    }
}

fn item_at_mut<'a>(items: &'a mut [Item], path: &[usize]) -> Option<&'a mut Item> {
    let (&first, rest) = path.split_first()?;
    let item = items.get_mut(first)?;
    if rest.is_empty() {
        Some(item)
    } else {
        item_at_mut(item.children_mut()?, rest)
    }
}

/// レイヤーのカットラインを非表示にし、破棄時に必ず復元するガード
///
/// 保持中はドキュメントを読み取り専用で参照できる（構造が変わらないので台帳の位置が有効なまま）。
pub struct ContourGuard<'a> {
    doc: &'a mut Document,
    layer: usize,
    ledger: HiddenLedger,
}

impl<'a> ContourGuard<'a> {
    /// `layer` が範囲外なら何もしない（台帳は空）
    pub fn hide(doc: &'a mut Document, layer: usize, patterns: &ContourPatterns) -> Self {
        let Document { layers, spot_colors, .. } = &mut *doc;
        let ledger = match layers.get_mut(layer) {
            Some(target) => hide_contours(&mut target.items, spot_colors, patterns),
            None => HiddenLedger::default(),
        };
        Self { doc, layer, ledger }
    }

    pub fn hidden_count(&self) -> usize {
        self.ledger.len()
    }
}

impl Deref for ContourGuard<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        &*self.doc
    }
}

impl Drop for ContourGuard<'_> {
    fn drop(&mut self) {
        if let Some(target) = self.doc.layers.get_mut(self.layer) {
            restore_hidden(&mut target.items, &self.ledger);
        }
    }
}
