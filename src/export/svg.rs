//! SVGバックアップ
//!
//! レイヤーを `<g>`、要素を外接矩形の `<rect>` として書き出す。
//! 非表示の要素・レイヤーは `display="none"` で残す。

use super::png::item_colors;
use super::DocumentBackend;
use crate::error::{ExportError, Result};
use contour_export_common::{items_bounds, Bounds, Document, Item, ItemKind};
use quick_xml::escape::escape;
use std::fmt::Write;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct SvgBackend;

/// 全要素（非表示含む）を覆う矩形。何も無ければ 1pt 四方
fn document_extent(doc: &Document) -> Bounds {
    let mut all = Bounds::EMPTY;
    for layer in &doc.layers {
        let mut shown = layer.items.clone();
        unhide(&mut shown);
        if let Some(b) = items_bounds(&shown) {
            all = all.union(&b);
        }
    }
    if all.is_empty() {
        Bounds::new(0.0, 1.0, 1.0, 0.0)
    } else {
        all
    }
}

fn unhide(items: &mut [Item]) {
    for item in items {
        item.hidden = false;
        if let Some(children) = item.children_mut() {
            unhide(children);
        }
    }
}

fn rgb_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// SVG文字列を組み立てる
pub fn render_svg(doc: &Document) -> String {
    let extent = document_extent(doc);
    let mut svg = String::new();

    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}pt" height="{h}pt" viewBox="0 0 {w} {h}">"#,
        w = extent.width(),
        h = extent.height()
    );
    if !doc.name.is_empty() {
        let _ = writeln!(svg, "<title>{}</title>", escape(doc.name.as_str()));
    }

    for layer in &doc.layers {
        let display = if layer.visible { "" } else { r#" display="none""# };
        let _ = writeln!(svg, r#"<g data-layer="{}"{}>"#, escape(layer.name.as_str()), display);
        write_items(&mut svg, &layer.items, doc, &extent, 1);
        let _ = writeln!(svg, "</g>");
    }

    let _ = writeln!(svg, "</svg>");
    svg
}

fn write_items(svg: &mut String, items: &[Item], doc: &Document, extent: &Bounds, depth: usize) {
    let indent = "  ".repeat(depth);
    // 先頭の要素が最前面なので逆順に書く
    for item in items.iter().rev() {
        let mut attrs = String::new();
        if let Some(name) = &item.name {
            let _ = write!(attrs, r#" data-name="{}""#, escape(name.as_str()));
        }
        if item.hidden {
            attrs.push_str(r#" display="none""#);
        }

        if let ItemKind::Group { items: children } = &item.kind {
            let _ = writeln!(svg, "{}<g{}>", indent, attrs);
            write_items(svg, children, doc, extent, depth + 1);
            let _ = writeln!(svg, "{}</g>", indent);
            continue;
        }

        let Ok(b) = item.geometric_bounds() else {
            tracing::debug!(name = ?item.name, "座標を読めない要素はバックアップに含めません");
            continue;
        };

        let (fill, stroke) = item_colors(item, doc);
        let fill = fill.map(rgb_hex).unwrap_or_else(|| "none".to_string());
        let stroke = stroke.map(rgb_hex).unwrap_or_else(|| "none".to_string());
        if let Some(spot) = item
            .path_style()
            .and_then(|s| s.effective_fill().or(s.effective_stroke()))
            .and_then(|c| c.spot_name().ok().flatten())
        {
            let _ = write!(attrs, r#" data-spot="{}""#, escape(spot));
        }
        let class = match item.kind {
            ItemKind::Text { .. } => " class=\"text\"",
            ItemKind::Raster { .. } => " class=\"raster\"",
            _ => "",
        };

        let _ = writeln!(
            svg,
            r#"{}<rect{} x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}"{}/>"#,
            indent,
            class,
            b.left - extent.left,
            extent.top - b.top,
            b.width(),
            b.height(),
            fill,
            stroke,
            attrs
        );
    }
}

impl DocumentBackend for SvgBackend {
    fn save(&mut self, doc: &Document, destination: &Path) -> Result<()> {
        std::fs::write(destination, render_svg(doc))
            .map_err(|e| ExportError::Backup(format!("{}: {}", destination.display(), e)))
    }
}
