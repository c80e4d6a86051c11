//! PNG描画
//!
//! 表示中レイヤーの表示中要素を、外接矩形の塗り・線として透明キャンバスに描く。
//! 入稿前の確認用ラスタで、パスの形状そのものは扱わない。

use super::{RenderedImage, Renderer};
use crate::error::{ExportError, Result};
use contour_export_common::{Bounds, Document, Item, ItemKind, Region};
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;

/// 線幅（pt）
const STROKE_WIDTH_PT: f64 = 1.0;

/// テキスト・配置画像の代替色
const PLACEHOLDER_RGB: [u8; 3] = [128, 128, 128];

/// 1辺の最大ピクセル数
const DEFAULT_MAX_SIDE_PX: u32 = 40_000;

/// 総ピクセル数の上限（RGBAで約1GB）
const DEFAULT_MAX_PIXELS: u64 = 256_000_000;

#[derive(Debug, Clone)]
pub struct PngRenderer {
    max_side_px: u32,
    max_pixels: u64,
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self {
            max_side_px: DEFAULT_MAX_SIDE_PX,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl PngRenderer {
    pub fn with_max_side(max_side_px: u32) -> Self {
        Self {
            max_side_px,
            ..Self::default()
        }
    }

    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    /// キャンバスを確保する前に総ピクセル数を確認する
    fn check_area(&self, width_px: u32, height_px: u32) -> Result<()> {
        let total = width_px as u64 * height_px as u64;
        if total > self.max_pixels {
            return Err(ExportError::Render(format!(
                "画像が大きすぎます: {}×{}px (上限 {}px)",
                width_px, height_px, self.max_pixels
            )));
        }
        Ok(())
    }

    fn pixel_len(&self, points: f64, pixels_per_point: f64) -> Result<u32> {
        let px = (points * pixels_per_point).round();
        if !px.is_finite() || px < 1.0 || px > self.max_side_px as f64 {
            return Err(ExportError::Render(format!(
                "画像サイズが範囲外です: {}px (上限 {}px)",
                px, self.max_side_px
            )));
        }
        Ok(px as u32)
    }
}

/// 描画する矩形1つ分
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Paint {
    pub bounds: Bounds,
    pub fill: Option<[u8; 3]>,
    pub stroke: Option<[u8; 3]>,
}

/// 要素の塗り色・線色（読めない色は描かない）
pub(crate) fn item_colors(item: &Item, doc: &Document) -> (Option<[u8; 3]>, Option<[u8; 3]>) {
    let resolve = |color: Option<&contour_export_common::Color>| {
        color.and_then(|c| match c.to_rgb(doc) {
            Ok(rgb) => Some(rgb),
            Err(e) => {
                tracing::debug!(name = ?item.name, "色を解決できません: {}", e);
                None
            }
        })
    };

    match &item.kind {
        ItemKind::Path(style) | ItemKind::CompoundPath(style) => {
            (resolve(style.effective_fill()), resolve(style.effective_stroke()))
        }
        ItemKind::Text { .. } | ItemKind::Raster { .. } => (Some(PLACEHOLDER_RGB), None),
        ItemKind::Group { .. } => (None, None),
    }
}

/// 表示中レイヤーの表示中要素を描画順に集める
pub(crate) fn visible_paints(doc: &Document) -> Vec<Paint> {
    let mut paints = Vec::new();
    for layer in doc.layers.iter().filter(|l| l.visible) {
        collect(&layer.items, doc, &mut paints);
    }
    paints
}

fn collect(items: &[Item], doc: &Document, paints: &mut Vec<Paint>) {
    // 先頭の要素が最前面なので逆順に積む
    for item in items.iter().rev().filter(|i| !i.hidden) {
        if let Some(children) = item.children() {
            collect(children, doc, paints);
            continue;
        }
        let Ok(bounds) = item.geometric_bounds() else {
            continue;
        };
        let (fill, stroke) = item_colors(item, doc);
        if fill.is_some() || stroke.is_some() {
            paints.push(Paint { bounds, fill, stroke });
        }
    }
}

struct Canvas<'a> {
    image: &'a mut RgbaImage,
    region: &'a Region,
    pixels_per_point: f64,
}

impl Canvas<'_> {
    fn fill(&mut self, bounds: &Bounds, rgb: [u8; 3]) {
        let Some(clipped) = bounds.intersection(self.region) else {
            return;
        };
        let (w, h) = self.image.dimensions();
        let to_px = |v: f64, limit: u32| (v * self.pixels_per_point).max(0.0).min(limit as f64);
        let x0 = to_px(clipped.left - self.region.left, w).floor() as u32;
        let x1 = to_px(clipped.right - self.region.left, w).ceil() as u32;
        let y0 = to_px(self.region.top - clipped.top, h).floor() as u32;
        let y1 = to_px(self.region.top - clipped.bottom, h).ceil() as u32;

        let pixel = Rgba([rgb[0], rgb[1], rgb[2], 255]);
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, pixel);
            }
        }
    }

    fn stroke(&mut self, b: &Bounds, rgb: [u8; 3]) {
        let t = STROKE_WIDTH_PT.min(b.width() / 2.0).min(b.height() / 2.0).max(0.0);
        let edges = [
            Bounds::new(b.left, b.top, b.right, b.top - t),
            Bounds::new(b.left, b.bottom + t, b.right, b.bottom),
            Bounds::new(b.left, b.top, b.left + t, b.bottom),
            Bounds::new(b.right - t, b.top, b.right, b.bottom),
        ];
        for edge in &edges {
            self.fill(edge, rgb);
        }
    }
}

impl Renderer for PngRenderer {
    fn render(
        &mut self,
        doc: &Document,
        region: &Region,
        pixels_per_point: f64,
        destination: &Path,
    ) -> Result<RenderedImage> {
        let width_px = self.pixel_len(region.width(), pixels_per_point)?;
        let height_px = self.pixel_len(region.height(), pixels_per_point)?;
        self.check_area(width_px, height_px)?;

        let mut image = RgbaImage::new(width_px, height_px);
        let mut canvas = Canvas {
            image: &mut image,
            region,
            pixels_per_point,
        };
        for paint in visible_paints(doc) {
            if let Some(rgb) = paint.fill {
                canvas.fill(&paint.bounds, rgb);
            }
            if let Some(rgb) = paint.stroke {
                canvas.stroke(&paint.bounds, rgb);
            }
        }

        image
            .save_with_format(destination, ImageFormat::Png)
            .map_err(|e| ExportError::Render(format!("{}: {}", destination.display(), e)))?;

        Ok(RenderedImage { width_px, height_px })
    }
}
