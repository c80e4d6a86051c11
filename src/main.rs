use clap::Parser;
use contour_export::common::Document;
use contour_export::{cli, config, error, export, inspect};
use cli::{Cli, Commands};
use config::Config;
use dialoguer::Input;
use error::{ExportError, Result};
use export::{PngRenderer, SvgBackend};
use std::path::{Path, PathBuf};

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_document(input: &Path) -> Result<Document> {
    if !input.exists() {
        return Err(ExportError::FileNotFound(input.display().to_string()));
    }
    Document::from_json_file(input).map_err(|e| ExportError::InvalidDocument(format!("{}: {}", input.display(), e)))
}

/// 出力フォルダ名に使う識別子を対話入力
fn prompt_identifier() -> Result<String> {
    let id: String = Input::new()
        .with_prompt("識別子（注文番号など）")
        .validate_with(|s: &String| -> std::result::Result<(), &str> {
            if export::sanitize_identifier(s).is_empty() {
                Err("空の識別子は使えません")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(id)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Export { input, output, id, dpi, no_backup } => {
            println!("✂ contour-export - レイヤー書き出し\n");

            // 1. 読み込み
            println!("[1/3] ドキュメントを読み込み中...");
            let mut doc = load_document(&input)?;
            println!("✔ {}レイヤーを検出\n", doc.layers.len());

            let identifier = match id {
                Some(id) => id,
                None => prompt_identifier()?,
            };
            let base = output.unwrap_or_else(|| input.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(".")));
            let output_dir = export::prepare_output_dir(&base, &identifier)?;

            let mut settings = config.settings();
            if let Some(dpi) = dpi {
                Config { dpi, ..config.clone() }.validate()?;
                settings.dpi = dpi;
            }

            // 2. 書き出し
            println!("[2/3] 書き出し中... ({} dpi)", settings.dpi);
            let mut renderer = PngRenderer::default();
            let mut backend = SvgBackend;
            let backend = if no_backup || !config.write_backup { None } else { Some(&mut backend) };
            let report = export::run(
                &mut doc,
                &settings,
                &mut renderer,
                backend,
                &output_dir,
                &export::sanitize_identifier(&identifier),
            )?;
            println!("✔ 書き出し完了\n");

            // 3. 結果
            println!("[3/3] 結果");
            for line in report.lines() {
                println!("  {}", line);
            }

            println!("\n✅ 完了: {}", output_dir.display());
        }

        Commands::Inspect { input } => {
            let doc = load_document(&input)?;
            let settings = config.settings();
            println!("🔍 {} ({}レイヤー)\n", input.display(), doc.layers.len());
            for layer in inspect::inspect_document(&doc, &settings) {
                println!("  {}", layer);
            }
        }

        Commands::Config { set_dpi, reset, show } => {
            let mut config = config;

            if reset {
                config = Config::default();
                config.save()?;
                println!("✔ 設定を初期値に戻しました");
            }

            if let Some(dpi) = set_dpi {
                config.set_dpi(dpi)?;
                println!("✔ 解像度を {} dpi に設定しました", dpi);
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!("  解像度: {} dpi", config.dpi);
                println!("  裁ち落とし: 片側 {} pt", config.bleed_per_side);
                println!("  カットライン判定: {}", config.contour_patterns.as_slice().join(", "));
                println!("  追加サイズ: {}件", config.extra_sizes.len());
                println!("  バックアップ: {}", if config.write_backup { "保存する" } else { "保存しない" });
            }
        }
    }

    Ok(())
}
