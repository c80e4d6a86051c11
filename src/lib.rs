//! contour-export
//!
//! ドキュメントのレイヤーごとに、カットラインを除いた内容を裁ち落とし付きPNGへ書き出す。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod inspect;

pub use contour_export_common as common;
