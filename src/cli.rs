use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "contour-export")]
#[command(about = "レイヤー別に裁ち落とし付きPNGを書き出す（カットラインは自動で非表示）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ドキュメントの各レイヤーをPNGに書き出す
    Export {
        /// ドキュメントJSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力先ディレクトリ（デフォルト: 入力ファイルと同じ場所）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力フォルダ名に使う識別子（省略時は対話入力）
        #[arg(long)]
        id: Option<String>,

        /// 書き出し解像度（設定ファイルより優先）
        #[arg(long)]
        dpi: Option<f64>,

        /// SVGバックアップを保存しない
        #[arg(long)]
        no_backup: bool,
    },

    /// 書き出さずにレイヤーの判定結果を表示
    Inspect {
        /// ドキュメントJSONファイル
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 書き出し解像度を設定
        #[arg(long)]
        set_dpi: Option<f64>,

        /// 設定を初期値に戻す
        #[arg(long)]
        reset: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
