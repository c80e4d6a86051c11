//! ドキュメントモデル
//!
//! Document → Layer → Item（Group は子 Item を持つ木構造）
//! JSONで読み書きできる。座標は `[left, top, right, bottom]`。

use crate::error::{Error, Result};
use crate::geometry::Bounds;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_true() -> bool {
    true
}

fn default_tint() -> f64 {
    1.0
}

/// ドキュメント（レイヤーとスポットカラーを所有する）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub spot_colors: Vec<SpotColor>,

    #[serde(default)]
    pub layers: Vec<Layer>,
}

/// 名前付きスポットカラー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotColor {
    pub name: String,

    /// ラスタ描画用の代替色
    #[serde(default)]
    pub rgb: [u8; 3],
}

/// レイヤー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub name: String,

    #[serde(default = "default_true")]
    pub visible: bool,

    #[serde(default)]
    pub items: Vec<Item>,
}

/// 描画要素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(flatten)]
    pub kind: ItemKind,
}

/// 要素の種類
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemKind {
    Path(PathStyle),
    CompoundPath(PathStyle),
    Text {
        #[serde(default)]
        bounds: Option<[f64; 4]>,
    },
    Raster {
        #[serde(default)]
        bounds: Option<[f64; 4]>,
    },
    Group {
        #[serde(default)]
        items: Vec<Item>,
    },
}

/// パス系要素の塗り・線・座標
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathStyle {
    pub bounds: Option<[f64; 4]>,
    pub filled: bool,
    pub stroked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
}

/// カラー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "camelCase")]
pub enum Color {
    Rgb { r: u8, g: u8, b: u8 },
    Cmyk { c: f64, m: f64, y: f64, k: f64 },
    Gray { gray: f64 },
    Spot {
        #[serde(default)]
        name: Option<String>,
        #[serde(default = "default_tint")]
        tint: f64,
    },
}

impl Document {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// スポットカラーを名前で検索
    pub fn spot_color(&self, name: &str) -> Option<&SpotColor> {
        self.spot_colors.iter().find(|s| s.name == name)
    }

    /// 各レイヤーの表示状態
    pub fn layer_visibility(&self) -> Vec<bool> {
        self.layers.iter().map(|l| l.visible).collect()
    }
}

impl Layer {
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            items,
        }
    }
}

impl Item {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            name: None,
            hidden: false,
            kind,
        }
    }

    pub fn path(style: PathStyle) -> Self {
        Self::new(ItemKind::Path(style))
    }

    pub fn compound_path(style: PathStyle) -> Self {
        Self::new(ItemKind::CompoundPath(style))
    }

    pub fn text(bounds: [f64; 4]) -> Self {
        Self::new(ItemKind::Text { bounds: Some(bounds) })
    }

    pub fn group(items: Vec<Item>) -> Self {
        Self::new(ItemKind::Group { items })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// パス系（Path / CompoundPath）ならスタイルを返す
    pub fn path_style(&self) -> Option<&PathStyle> {
        match &self.kind {
            ItemKind::Path(style) | ItemKind::CompoundPath(style) => Some(style),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&[Item]> {
        match &self.kind {
            ItemKind::Group { items } => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Item>> {
        match &mut self.kind {
            ItemKind::Group { items } => Some(items),
            _ => None,
        }
    }

    /// 葉要素の座標を検証して返す（Group は対象外）
    pub fn geometric_bounds(&self) -> Result<Bounds> {
        let raw = match &self.kind {
            ItemKind::Path(style) | ItemKind::CompoundPath(style) => style.bounds,
            ItemKind::Text { bounds } | ItemKind::Raster { bounds } => *bounds,
            ItemKind::Group { .. } => {
                return Err(Error::Geometry("グループは座標を持ちません".into()));
            }
        };
        let raw = raw.ok_or_else(|| Error::Geometry("座標がありません".into()))?;
        Bounds::from_raw(raw)
    }
}

impl PathStyle {
    pub fn new(bounds: [f64; 4]) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.filled = true;
        self.fill_color = Some(color);
        self
    }

    pub fn stroke(mut self, color: Color) -> Self {
        self.stroked = true;
        self.stroke_color = Some(color);
        self
    }

    /// 実際に描画される塗り色
    pub fn effective_fill(&self) -> Option<&Color> {
        self.fill_color.as_ref().filter(|_| self.filled)
    }

    /// 実際に描画される線色
    pub fn effective_stroke(&self) -> Option<&Color> {
        self.stroke_color.as_ref().filter(|_| self.stroked)
    }
}

impl Color {
    pub fn spot(name: impl Into<String>) -> Self {
        Color::Spot {
            name: Some(name.into()),
            tint: 1.0,
        }
    }

    /// スポット参照なら参照名を返す。名前なしはエラー
    pub fn spot_name(&self) -> Result<Option<&str>> {
        match self {
            Color::Spot { name: Some(name), .. } if !name.trim().is_empty() => Ok(Some(name.as_str())),
            Color::Spot { .. } => Err(Error::Color("スポットカラー名がありません".into())),
            _ => Ok(None),
        }
    }

    /// 表示用RGBに変換（スポットはドキュメントの代替色×濃度）
    pub fn to_rgb(&self, doc: &Document) -> Result<[u8; 3]> {
        let unit = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        match self {
            Color::Rgb { r, g, b } => Ok([*r, *g, *b]),
            Color::Gray { gray } => {
                // 0 = 白, 100 = 黒
                let v = unit(1.0 - gray / 100.0);
                Ok([v, v, v])
            }
            Color::Cmyk { c, m, y, k } => {
                let k = k / 100.0;
                Ok([
                    unit((1.0 - c / 100.0) * (1.0 - k)),
                    unit((1.0 - m / 100.0) * (1.0 - k)),
                    unit((1.0 - y / 100.0) * (1.0 - k)),
                ])
            }
            Color::Spot { tint, .. } => {
                let name = self.spot_name()?.unwrap_or_default();
                let spot = doc
                    .spot_color(name)
                    .ok_or_else(|| Error::Color(format!("未定義のスポットカラー: {}", name)))?;
                let tint = tint.clamp(0.0, 1.0);
                let mix = |c: u8| (255.0 - (255.0 - c as f64) * tint).round() as u8;
                Ok([mix(spot.rgb[0]), mix(spot.rgb[1]), mix(spot.rgb[2])])
            }
        }
    }
}
