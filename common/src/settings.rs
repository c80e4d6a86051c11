//! 書き出し設定（サイズ表・カットラインパターン・解像度）

use crate::contour::ContourPatterns;
use crate::size::{SizeResolution, SizeTable};

/// 既定の書き出し解像度
pub const DEFAULT_DPI: f64 = 1400.0;

/// 既定の裁ち落とし（片側、pt）
pub const DEFAULT_BLEED_PER_SIDE: f64 = 3.0;

/// 1インチ = 72pt
pub const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub sizes: SizeTable,
    pub patterns: ContourPatterns,
    pub dpi: f64,
    pub bleed_per_side: f64,
}

impl ExportSettings {
    /// 1ptあたりのサンプル数
    pub fn pixels_per_point(&self) -> f64 {
        self.dpi / POINTS_PER_INCH
    }

    pub fn resolve(&self, layer_name: &str) -> SizeResolution {
        self.sizes.resolve(layer_name, self.bleed_per_side)
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            sizes: SizeTable::builtin(),
            patterns: ContourPatterns::default(),
            dpi: DEFAULT_DPI,
            bleed_per_side: DEFAULT_BLEED_PER_SIDE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolution() {
        let settings = ExportSettings::default();
        assert!((settings.pixels_per_point() - 1400.0 / 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_uses_bleed_policy() {
        let settings = ExportSettings {
            bleed_per_side: 1.5,
            ..ExportSettings::default()
        };
        let entry = settings.resolve("54x72").entry().cloned().unwrap();
        assert_eq!((entry.bleed_width, entry.bleed_height), (57.0, 75.0));
    }
}
