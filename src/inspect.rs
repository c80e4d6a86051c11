//! 書き出し前の確認（ドキュメントは変更しない）

use contour_export_common::{hide_contours, items_bounds, Bounds, Document, ExportSettings, SizeResolution};
use std::fmt;

/// レイヤーごとの判定結果
#[derive(Debug, Clone, PartialEq)]
pub struct LayerInspection {
    pub layer: String,
    pub visible: bool,
    pub resolution: SizeResolution,
    /// 書き出し時に非表示になるカットライン要素数
    pub contours: usize,
    /// カットラインを除いた内容の外接矩形
    pub content: Option<Bounds>,
}

pub fn inspect_document(doc: &Document, settings: &ExportSettings) -> Vec<LayerInspection> {
    doc.layers
        .iter()
        .map(|layer| {
            let name = layer.name.trim().to_string();
            let resolution = settings.resolve(&name);
            let mut items = layer.items.clone();
            let ledger = hide_contours(&mut items, &doc.spot_colors, &settings.patterns);
            LayerInspection {
                layer: name,
                visible: layer.visible,
                resolution,
                contours: ledger.len(),
                content: items_bounds(&items),
            }
        })
        .collect()
}

impl fmt::Display for LayerInspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = match &self.resolution {
            SizeResolution::Known(e) => format!(
                "{} ({:.2} × {:.2} pt{})",
                e.output,
                e.bleed_width,
                e.bleed_height,
                e.template.as_deref().map(|t| format!(", {}", t)).unwrap_or_default()
            ),
            SizeResolution::Derived(e) => format!("{} ({:.2} × {:.2} pt, 名前から算出)", e.output, e.bleed_width, e.bleed_height),
            SizeResolution::Unrecognized => "サイズ表に無い数字（スキップ）".to_string(),
            SizeResolution::NotApplicable => "対象外".to_string(),
        };
        let content = match &self.content {
            Some(b) => format!("{:.2} × {:.2} pt", b.width(), b.height()),
            None => "内容なし".to_string(),
        };
        write!(
            f,
            "{}{}: {} / カットライン {}件 / {}",
            self.layer,
            if self.visible { "" } else { " (非表示)" },
            size,
            self.contours,
            content
        )
    }
}
