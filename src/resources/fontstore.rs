//! Font store resource.
//!
//! Stores fonts keyed by string IDs. Fonts are registered during setup and
//! handed to [`TextSprite`](crate::components::textsprite::TextSprite)s.
//! Rasterisation belongs to the backend; a font here only needs to know its
//! name (the backend's lookup key) and how large a string will be.

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use rustc_hash::FxHashMap;

/// Measuring side of a font.
pub trait Font: fmt::Debug + Send + Sync {
    /// Key the backend uses to find the rasterised font.
    fn name(&self) -> &str;

    /// Size in pixels of `text` laid out with this font.
    fn measure_string(&self, text: &str) -> Vec2;
}

/// Fixed-advance font: every glyph is `glyph_width` wide, every line
/// `line_height` tall.
#[derive(Debug, Clone, PartialEq)]
pub struct MonospaceFont {
    name: String,
    pub glyph_width: f32,
    pub line_height: f32,
}

impl MonospaceFont {
    pub fn new(name: impl Into<String>, glyph_width: f32, line_height: f32) -> Self {
        Self {
            name: name.into(),
            glyph_width,
            line_height,
        }
    }
}

impl Font for MonospaceFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn measure_string(&self, text: &str) -> Vec2 {
        if text.is_empty() {
            return Vec2::ZERO;
        }
        let lines = text.split('\n');
        let (count, widest) = lines.fold((0usize, 0usize), |(n, w), line| {
            (n + 1, w.max(line.chars().count()))
        });
        Vec2::new(
            widest as f32 * self.glyph_width,
            count as f32 * self.line_height,
        )
    }
}

/// Map of font keys to fonts.
#[derive(Resource, Default, Debug)]
pub struct FontStore {
    fonts: FxHashMap<String, Arc<dyn Font>>,
}

impl FontStore {
    /// Create an empty font store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a font with the given key.
    pub fn add(&mut self, id: impl Into<String>, font: Arc<dyn Font>) {
        self.fonts.insert(id.into(), font);
    }

    /// Get a font by its key.
    pub fn get(&self, id: impl AsRef<str>) -> Option<Arc<dyn Font>> {
        self.fonts.get(id.as_ref()).cloned()
    }

    /// Remove all fonts.
    pub fn clear(&mut self) {
        self.fonts.clear();
    }

    /// Get the number of fonts.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
