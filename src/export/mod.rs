//! レイヤー別書き出し
//!
//! ## 処理フロー（レイヤーごと）
//! 1. レイヤー名からサイズを解決（対象外・未登録はここで終わり）
//! 2. 対象レイヤーだけを表示
//! 3. カットラインを非表示
//! 4. 表示中要素の外接矩形を計算（空ならスキップ）
//! 5. 中心を合わせた裁ち落とし込み領域をPNGに描画
//! 6. カットラインを復元（描画失敗時も必ず）
//!
//! 全レイヤー終了後に元の表示状態へ戻す。

pub mod png;
pub mod report;
pub mod svg;

use crate::error::Result;
use contour_export_common::{
    layer_bounds, ContourGuard, Document, ExportSettings, Region, SizeEntry, SizeResolution, VisibilityGuard,
};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub use png::PngRenderer;
pub use report::{prepare_output_dir, sanitize_identifier, BackupStatus, RunReport};
pub use svg::SvgBackend;

/// 描画結果のピクセルサイズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedImage {
    pub width_px: u32,
    pub height_px: u32,
}

/// 指定領域をラスタ画像として保存する
pub trait Renderer {
    fn render(
        &mut self,
        doc: &Document,
        region: &Region,
        pixels_per_point: f64,
        destination: &Path,
    ) -> Result<RenderedImage>;
}

/// ドキュメント全体をベクター形式で保存する
pub trait DocumentBackend {
    fn save(&mut self, doc: &Document, destination: &Path) -> Result<()>;
}

/// レイヤーごとの結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerOutcome {
    pub layer: String,
    #[serde(flatten)]
    pub status: LayerStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LayerStatus {
    #[serde(rename_all = "camelCase")]
    Exported {
        output: String,
        file: PathBuf,
        width: f64,
        height: f64,
        image: RenderedImage,
        hidden: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        template: Option<String>,
    },
    /// 数字のみだがサイズ表に無い
    SkippedUnrecognized,
    /// 表示中の要素が無い
    SkippedEmpty { hidden: usize },
    RenderFailed {
        output: String,
        reason: String,
        hidden: usize,
    },
}

impl LayerStatus {
    fn hidden(&self) -> usize {
        match self {
            LayerStatus::Exported { hidden, .. }
            | LayerStatus::SkippedEmpty { hidden }
            | LayerStatus::RenderFailed { hidden, .. } => *hidden,
            LayerStatus::SkippedUnrecognized => 0,
        }
    }
}

impl fmt::Display for LayerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            LayerStatus::Exported { output, width, height, image, hidden, .. } => write!(
                f,
                "✔ {} → {}.png ({:.2} × {:.2} pt, {}×{}px, カットライン{}件を非表示)",
                self.layer, output, width, height, image.width_px, image.height_px, hidden
            ),
            LayerStatus::SkippedUnrecognized => {
                write!(f, "⚠ {}: サイズ表に無いレイヤー名のためスキップ", self.layer)
            }
            LayerStatus::SkippedEmpty { .. } => {
                write!(f, "⚠ {}: 表示中の要素が無いためスキップ", self.layer)
            }
            LayerStatus::RenderFailed { output, reason, .. } => {
                write!(f, "✖ {}: {}.png の書き出しに失敗 ({})", self.layer, output, reason)
            }
        }
    }
}

/// 書き出し全体の集計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    /// 書き出しに成功したレイヤー数
    pub exported: usize,
    /// 非表示にしたカットライン要素の合計
    pub hidden_total: usize,
    pub outcomes: Vec<LayerOutcome>,
}

impl ExportSummary {
    fn push(&mut self, outcome: LayerOutcome) {
        if matches!(outcome.status, LayerStatus::Exported { .. }) {
            self.exported += 1;
        }
        self.hidden_total += outcome.status.hidden();
        self.outcomes.push(outcome);
    }

    /// 出力済みファイルの一覧
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            LayerStatus::Exported { file, .. } => Some(file.as_path()),
            _ => None,
        })
    }
}

/// 全レイヤーを順に書き出す
///
/// 描画の失敗やスキップで止まらず、終了時にはレイヤー表示とカットラインの状態が実行前と同じになる。
pub fn export_layers<R: Renderer + ?Sized>(
    doc: &mut Document,
    settings: &ExportSettings,
    renderer: &mut R,
    output_dir: &Path,
) -> ExportSummary {
    let mut summary = ExportSummary::default();
    let mut visibility = VisibilityGuard::capture(doc);

    for index in 0..visibility.layers.len() {
        let layer = visibility.layers[index].name.trim().to_string();

        let entry = match settings.resolve(&layer) {
            SizeResolution::Known(entry) | SizeResolution::Derived(entry) => entry,
            SizeResolution::Unrecognized => {
                tracing::warn!(layer = %layer, "サイズ表に無いレイヤー名");
                summary.push(LayerOutcome {
                    layer,
                    status: LayerStatus::SkippedUnrecognized,
                });
                continue;
            }
            SizeResolution::NotApplicable => {
                tracing::debug!(layer = %layer, "対象外のレイヤー");
                continue;
            }
        };

        visibility.solo(index);
        let status = export_layer(&mut visibility, index, &entry, settings, renderer, output_dir);
        summary.push(LayerOutcome { layer, status });
    }

    summary
}

fn export_layer<R: Renderer + ?Sized>(
    doc: &mut Document,
    index: usize,
    entry: &SizeEntry,
    settings: &ExportSettings,
    renderer: &mut R,
    output_dir: &Path,
) -> LayerStatus {
    let guard = ContourGuard::hide(doc, index, &settings.patterns);
    let hidden = guard.hidden_count();

    let Some(content) = layer_bounds(&guard.layers[index]) else {
        tracing::warn!(layer = %entry.key, "表示中の要素がありません");
        return LayerStatus::SkippedEmpty { hidden };
    };

    let region = Region::centered(content.center(), entry.bleed_width, entry.bleed_height);
    let file = output_dir.join(format!("{}.png", entry.output));
    tracing::debug!(layer = %entry.key, ?content, ?region, "領域を描画");

    match renderer.render(&guard, &region, settings.pixels_per_point(), &file) {
        Ok(image) => LayerStatus::Exported {
            output: entry.output.clone(),
            file,
            width: entry.bleed_width,
            height: entry.bleed_height,
            image,
            hidden,
            template: entry.template.clone(),
        },
        Err(e) => {
            tracing::warn!(layer = %entry.key, "描画に失敗: {}", e);
            LayerStatus::RenderFailed {
                output: entry.output.clone(),
                reason: e.to_string(),
                hidden,
            }
        }
    }
}

/// 書き出し・バックアップ・レポートを一括実行
pub fn run<R, B>(
    doc: &mut Document,
    settings: &ExportSettings,
    renderer: &mut R,
    backend: Option<&mut B>,
    output_dir: &Path,
    identifier: &str,
) -> Result<RunReport>
where
    R: Renderer + ?Sized,
    B: DocumentBackend + ?Sized,
{
    let summary = export_layers(doc, settings, renderer, output_dir);

    let backup = backend.map(|backend| {
        let path = output_dir.join(format!("{}.svg", sanitize_identifier(identifier)));
        save_backup(doc, backend, &path)
    });

    let report = RunReport::new(identifier, summary, backup);
    report.write(output_dir)?;
    Ok(report)
}

/// 全レイヤーを表示した状態で保存し、表示状態を戻す
fn save_backup<B: DocumentBackend + ?Sized>(doc: &mut Document, backend: &mut B, path: &Path) -> BackupStatus {
    let mut visibility = VisibilityGuard::capture(doc);
    visibility.show_all();
    match backend.save(&visibility, path) {
        Ok(()) => BackupStatus::Saved { file: path.to_path_buf() },
        Err(e) => {
            tracing::warn!("バックアップ保存に失敗: {}", e);
            BackupStatus::Failed { reason: e.to_string() }
        }
    }
}
