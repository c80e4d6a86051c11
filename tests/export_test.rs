//! PNG/SVG出力の統合テスト
//!
//! demos/sample-document.json（レイヤー "35" / "999" / "abc" / "54x72"）を使用

use contour_export::common::{Document, ExportSettings, Item, Layer, PathStyle};
use contour_export::export::{self, BackupStatus, LayerStatus, PngRenderer, SvgBackend};
use image::Rgba;
use tempfile::tempdir;

const SAMPLE: &str = include_str!("../demos/sample-document.json");

fn sample() -> Document {
    Document::from_json_str(SAMPLE).expect("サンプルの読み込みに失敗")
}

fn settings_at(dpi: f64) -> ExportSettings {
    ExportSettings { dpi, ..ExportSettings::default() }
}

#[test]
fn test_export_sample_document() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut doc = sample();
    let before = doc.clone();

    let summary = export::export_layers(&mut doc, &settings_at(72.0), &mut PngRenderer::default(), dir.path());

    assert_eq!(summary.exported, 2);
    assert_eq!(summary.hidden_total, 2);

    let layers: Vec<&str> = summary.outcomes.iter().map(|o| o.layer.as_str()).collect();
    assert_eq!(layers, vec!["35", "999", "54x72"]);
    assert_eq!(summary.outcomes[1].status, LayerStatus::SkippedUnrecognized);

    let first = image::open(dir.path().join("79x90.png")).unwrap().to_rgba8();
    assert_eq!(first.dimensions(), (85, 96));

    let second = image::open(dir.path().join("54x72.png")).unwrap().to_rgba8();
    assert_eq!(second.dimensions(), (60, 78));
    // ダイラインは非表示なので縁も塗り色のまま
    assert_eq!(second.get_pixel(3, 39), &Rgba([255, 0, 0, 255]));
    assert_eq!(second.get_pixel(30, 39), &Rgba([255, 0, 0, 255]));
    // 裁ち落とし部分は透明
    assert_eq!(second.get_pixel(0, 39)[3], 0);

    let files: Vec<_> = summary.files().collect();
    assert_eq!(files.len(), 2);
    assert!(!dir.path().join("999.png").exists());
    assert!(!dir.path().join("abc.png").exists());

    // 表示状態・非表示状態は実行前と同じ
    assert_eq!(doc, before);
    assert_eq!(doc.layer_visibility(), vec![true, true, false, false]);
}

#[test]
fn test_default_resolution_image_size() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut doc = sample();
    doc.layers.retain(|l| l.name == "35");

    let summary = export::export_layers(&mut doc, &ExportSettings::default(), &mut PngRenderer::default(), dir.path());

    match &summary.outcomes[0].status {
        LayerStatus::Exported { image, width, height, .. } => {
            assert_eq!((*width, *height), (85.04, 95.67));
            // 1400dpi: 85.04pt → 1654px, 95.67pt → 1860px
            assert_eq!((image.width_px, image.height_px), (1654, 1860));
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_run_writes_backup_and_report() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_dir = export::prepare_output_dir(dir.path(), "A-001").unwrap();
    let mut doc = sample();
    let before = doc.clone();

    let report = export::run(
        &mut doc,
        &settings_at(72.0),
        &mut PngRenderer::default(),
        Some(&mut SvgBackend),
        &output_dir,
        "A-001",
    )
    .unwrap();

    assert_eq!(doc, before);
    assert_eq!(report.summary.exported, 2);
    assert_eq!(
        report.backup,
        Some(BackupStatus::Saved { file: output_dir.join("A-001.svg") })
    );

    let svg = std::fs::read_to_string(output_dir.join("A-001.svg")).unwrap();
    // バックアップは全レイヤー表示・カットラインも表示
    assert!(!svg.contains(r#"data-layer="abc" display="none""#));
    assert!(svg.contains(r#"data-name="CutContour_35" data-spot="CutContour"/>"#));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output_dir.join("export-report.json")).unwrap()).unwrap();
    assert_eq!(json["identifier"], "A-001");
    assert_eq!(json["exported"], 2);
    assert_eq!(json["hiddenTotal"], 2);
    assert_eq!(json["outcomes"].as_array().unwrap().len(), 3);
}

#[test]
fn test_run_without_backup() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut doc = sample();

    let report = export::run::<_, SvgBackend>(
        &mut doc,
        &settings_at(36.0),
        &mut PngRenderer::default(),
        None,
        dir.path(),
        "B",
    )
    .unwrap();

    assert!(report.backup.is_none());
    assert!(!dir.path().join("B.svg").exists());
    assert!(dir.path().join("export-report.json").exists());
}

#[test]
fn test_render_failure_is_reported() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut doc = sample();
    let before = doc.clone();

    // 出力先が存在しないので描画は失敗する
    let missing = dir.path().join("missing");
    let summary = export::export_layers(&mut doc, &settings_at(72.0), &mut PngRenderer::default(), &missing);

    assert_eq!(summary.exported, 0);
    assert_eq!(summary.hidden_total, 2);
    assert!(matches!(summary.outcomes[0].status, LayerStatus::RenderFailed { .. }));
    assert!(matches!(summary.outcomes[2].status, LayerStatus::RenderFailed { .. }));
    assert!(summary.outcomes[0].to_string().contains("79x90.png"));
    assert_eq!(doc, before);
}

#[test]
fn test_oversized_layer_fails_without_stopping() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut doc = sample();
    doc.layers
        .insert(0, Layer::new("2000x2000", vec![Item::path(PathStyle::new([0.0, 2000.0, 2000.0, 0.0]))]));

    let summary = export::export_layers(&mut doc, &ExportSettings::default(), &mut PngRenderer::default(), dir.path());

    assert!(matches!(
        &summary.outcomes[0].status,
        LayerStatus::RenderFailed { output, .. } if output == "2000x2000"
    ));
    assert!(!dir.path().join("2000x2000.png").exists());
    assert_eq!(summary.exported, 2);
}
