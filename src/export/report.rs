//! 実行レポートと出力フォルダ

use super::ExportSummary;
use crate::error::{ExportError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

const REPORT_FILE_NAME: &str = "export-report.json";

/// バックアップ保存の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BackupStatus {
    Saved { file: PathBuf },
    Failed { reason: String },
}

/// 実行レポート
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub identifier: String,
    /// 実行日時（RFC 3339）
    pub generated_at: String,
    #[serde(flatten)]
    pub summary: ExportSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<BackupStatus>,
}

impl RunReport {
    pub fn new(identifier: &str, summary: ExportSummary, backup: Option<BackupStatus>) -> Self {
        Self {
            identifier: identifier.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary,
            backup,
        }
    }

    /// レポートJSONを保存してパスを返す
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(REPORT_FILE_NAME);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// 画面表示用の行
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.summary.outcomes.iter().map(|o| o.to_string()).collect();
        lines.push(format!(
            "書き出し {}件 / カットライン非表示 {}件",
            self.summary.exported, self.summary.hidden_total
        ));
        match &self.backup {
            Some(BackupStatus::Saved { file }) => lines.push(format!("✔ バックアップ: {}", file.display())),
            Some(BackupStatus::Failed { reason }) => lines.push(format!("✖ バックアップ失敗: {}", reason)),
            None => {}
        }
        lines
    }
}

/// ファイル名に使えない文字を `_` に置き換える
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// `<base>/<identifier>/` を作成して返す
pub fn prepare_output_dir(base: &Path, identifier: &str) -> Result<PathBuf> {
    let name = sanitize_identifier(identifier);
    if name.is_empty() || name.chars().all(|c| c == '.') {
        return Err(ExportError::EmptyIdentifier);
    }
    let dir = base.join(name);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
