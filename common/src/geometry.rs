//! 矩形ジオメトリ
//!
//! ドキュメント座標系（pt）。縦軸は上向きで、`top` の方が `bottom` より大きい。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 外接矩形（left, top, right, bottom）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// 書き出し領域（一時アートボード相当）
pub type Region = Bounds;

impl Bounds {
    /// 合成の初期値。どの矩形と合成しても相手がそのまま残る
    pub const EMPTY: Bounds = Bounds {
        left: f64::INFINITY,
        top: f64::NEG_INFINITY,
        right: f64::NEG_INFINITY,
        bottom: f64::INFINITY,
    };

    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// 生の座標配列を検証して矩形にする
    pub fn from_raw(raw: [f64; 4]) -> Result<Self> {
        let [left, top, right, bottom] = raw;
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(Error::Geometry(format!("有限でない座標: {:?}", raw)));
        }
        if left > right || bottom > top {
            return Err(Error::Geometry(format!("反転した矩形: {:?}", raw)));
        }
        Ok(Self::new(left, top, right, bottom))
    }

    /// 中心点とサイズから矩形を作る
    pub fn centered(center: (f64, f64), width: f64, height: f64) -> Self {
        let (cx, cy) = center;
        Self {
            left: cx - width / 2.0,
            top: cy + height / 2.0,
            right: cx + width / 2.0,
            bottom: cy - height / 2.0,
        }
    }

    /// 初期値のまま（何も合成されていない）か
    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.bottom > self.top
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            left: self.left.min(other.left),
            top: self.top.max(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    /// 共通部分。重ならなければ None
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        let clipped = Bounds {
            left: self.left.max(other.left),
            top: self.top.min(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.max(other.bottom),
        };
        if clipped.left >= clipped.right || clipped.bottom >= clipped.top {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }
}

impl From<[f64; 4]> for Bounds {
    fn from(raw: [f64; 4]) -> Self {
        Bounds::new(raw[0], raw[1], raw[2], raw[3])
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(b: Bounds) -> Self {
        [b.left, b.top, b.right, b.bottom]
    }
}
