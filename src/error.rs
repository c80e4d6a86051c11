use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ドキュメントが不正です: {0}")]
    InvalidDocument(String),

    #[error("識別子が空です。出力フォルダ名に使う識別子を入力してください")]
    EmptyIdentifier,

    #[error("描画エラー: {0}")]
    Render(String),

    #[error("バックアップ保存エラー: {0}")]
    Backup(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Common(#[from] contour_export_common::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
