//! レイヤー表示状態の退避と復元

use crate::model::Document;
use std::ops::{Deref, DerefMut};

/// 生成時のレイヤー表示状態を退避し、破棄時に必ず書き戻すガード
pub struct VisibilityGuard<'a> {
    doc: &'a mut Document,
    original: Vec<bool>,
}

impl<'a> VisibilityGuard<'a> {
    pub fn capture(doc: &'a mut Document) -> Self {
        let original = doc.layer_visibility();
        Self { doc, original }
    }

    /// 指定レイヤーだけを表示する
    pub fn solo(&mut self, index: usize) {
        for (i, layer) in self.doc.layers.iter_mut().enumerate() {
            layer.visible = i == index;
        }
    }

    /// 全レイヤーを表示する
    pub fn show_all(&mut self) {
        for layer in &mut self.doc.layers {
            layer.visible = true;
        }
    }
}

impl Deref for VisibilityGuard<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        &*self.doc
    }
}

impl DerefMut for VisibilityGuard<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        &mut *self.doc
    }
}

impl Drop for VisibilityGuard<'_> {
    fn drop(&mut self) {
        for (layer, &visible) in self.doc.layers.iter_mut().zip(&self.original) {
            layer.visible = visible;
        }
    }
}
