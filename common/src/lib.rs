//! Contour Export Common Library
//!
//! ドキュメントモデルとコア処理（サイズ解決・カットライン判定・非表示/復元・外接矩形）
//! CLIからもテストからも純粋関数として利用される

pub mod error;
pub mod model;
pub mod geometry;
pub mod size;
pub mod contour;
pub mod traverse;
pub mod bounds;
pub mod visibility;
pub mod settings;

pub use error::{Error, Result};
pub use model::{Color, Document, Item, ItemKind, Layer, PathStyle, SpotColor};
pub use geometry::{Bounds, Region};
pub use size::{SizeEntry, SizeResolution, SizeTable};
pub use contour::{is_contour, ContourPatterns};
pub use traverse::{hide_contours, restore_hidden, ContourGuard, HiddenLedger, ItemPath};
pub use bounds::{items_bounds, layer_bounds};
pub use visibility::VisibilityGuard;
pub use settings::ExportSettings;
