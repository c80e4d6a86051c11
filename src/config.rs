use crate::error::{ExportError, Result};
use contour_export_common::settings::{DEFAULT_BLEED_PER_SIDE, DEFAULT_DPI};
use contour_export_common::{ContourPatterns, ExportSettings, SizeEntry, SizeTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// 書き出し解像度
    pub dpi: f64,
    /// 裁ち落とし（片側、pt）
    pub bleed_per_side: f64,
    /// カットライン判定パターン
    pub contour_patterns: ContourPatterns,
    /// 組み込みサイズ表への追加・上書き
    pub extra_sizes: Vec<SizeEntry>,
    /// 全レイヤー表示のSVGバックアップを保存する
    pub write_backup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            bleed_per_side: DEFAULT_BLEED_PER_SIDE,
            contour_patterns: ContourPatterns::default(),
            extra_sizes: Vec::new(),
            write_backup: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ExportError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("contour-export").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(ExportError::Config(format!("dpiは正の数で指定してください: {}", self.dpi)));
        }
        if !(self.bleed_per_side.is_finite() && self.bleed_per_side >= 0.0) {
            return Err(ExportError::Config(format!(
                "bleedPerSideは0以上で指定してください: {}",
                self.bleed_per_side
            )));
        }
        Ok(())
    }

    pub fn set_dpi(&mut self, dpi: f64) -> Result<()> {
        self.dpi = dpi;
        self.validate()?;
        self.save()
    }

    /// オーケストレータへ渡す設定を組み立てる
    pub fn settings(&self) -> ExportSettings {
        let mut sizes = SizeTable::builtin();
        sizes.extend(self.extra_sizes.iter().cloned());
        ExportSettings {
            sizes,
            patterns: self.contour_patterns.clone(),
            dpi: self.dpi,
            bleed_per_side: self.bleed_per_side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.settings(), ExportSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            dpi: 600.0,
            extra_sizes: vec![SizeEntry {
                key: "70".into(),
                output: "70x70".into(),
                bleed_width: 76.0,
                bleed_height: 76.0,
                template: None,
            }],
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        let settings = loaded.settings();
        assert_eq!(settings.dpi, 600.0);
        assert!(settings.sizes.get("70").is_some());
        assert!(settings.sizes.get("35").is_some());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "contourPatterns": ["ThruCut"] }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.dpi, DEFAULT_DPI);
        assert!(config.write_backup);
        assert!(config.contour_patterns.matches("THRUCUT line"));
        assert!(!config.contour_patterns.matches("dieline"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "dpi": 0 }"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(ExportError::Config(_))));

        std::fs::write(&path, "{ broken").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ExportError::JsonParse(_))));
    }
}
