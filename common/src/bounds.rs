//! 表示中要素の外接矩形
//!
//! 非表示要素と非表示グループの中身は除外する。
//! 座標が読めない要素は飛ばし、全体の集計は止めない。

use crate::geometry::Bounds;
use crate::model::{Item, Layer};

/// レイヤーの表示中要素の外接矩形。何も寄与しなければ None
pub fn layer_bounds(layer: &Layer) -> Option<Bounds> {
    if !layer.visible {
        return None;
    }
    items_bounds(&layer.items)
}

/// 要素列の表示中要素の外接矩形
pub fn items_bounds(items: &[Item]) -> Option<Bounds> {
    let mut acc = Bounds::EMPTY;
    accumulate(items, &mut acc);
    if acc.is_empty() {
        None
    } else {
        Some(acc)
    }
}

fn accumulate(items: &[Item], acc: &mut Bounds) {
    for item in items.iter().filter(|item| !item.hidden) {
        if let Some(children) = item.children() {
            accumulate(children, acc);
            continue;
        }
        match item.geometric_bounds() {
            Ok(b) => *acc = acc.union(&b),
            Err(e) => tracing::debug!(name = ?item.name, "座標を読めない要素をスキップ: {}", e),
        }
    }
}
