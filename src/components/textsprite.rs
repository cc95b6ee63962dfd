//! Single-string text renderable.
//!
//! The text is measured with its [`Font`] whenever the font or the text
//! changes, and the pivot follows the alignment: `Left`/`Top` pivot on the
//! top-left corner, `Center` on the middle, `Right`/`Bottom` on the far edge.
//! The pivot is snapped to whole pixels.

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::renderable::{RenderTransform, Renderable};
use crate::geometry::{Rect, calculate_bounds};
use crate::resources::batcher::Batcher;
use crate::resources::fontstore::Font;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

#[derive(Component, Clone)]
pub struct TextSprite {
    font: Arc<dyn Font>,
    text: String,
    horizontal_align: HorizontalAlign,
    vertical_align: VerticalAlign,
    size: Vec2,
    origin: Vec2,
}

impl fmt::Debug for TextSprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextSprite")
            .field("font", &self.font.name())
            .field("text", &self.text)
            .field("size", &self.size)
            .field("origin", &self.origin)
            .finish()
    }
}

impl TextSprite {
    pub fn new(font: Arc<dyn Font>, text: impl Into<String>) -> Self {
        let mut sprite = Self {
            font,
            text: text.into(),
            horizontal_align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Top,
            size: Vec2::ZERO,
            origin: Vec2::ZERO,
        };
        sprite.update_size();
        sprite
    }

    pub fn with_align(mut self, horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        self.horizontal_align = horizontal;
        self.vertical_align = vertical;
        self.update_centering();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &Arc<dyn Font> {
        &self.font
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn horizontal_align(&self) -> HorizontalAlign {
        self.horizontal_align
    }

    pub fn vertical_align(&self) -> VerticalAlign {
        self.vertical_align
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.update_size();
    }

    pub fn set_font(&mut self, font: Arc<dyn Font>) {
        self.font = font;
        self.update_size();
    }

    pub fn set_horizontal_align(&mut self, align: HorizontalAlign) {
        self.horizontal_align = align;
        self.update_centering();
    }

    pub fn set_vertical_align(&mut self, align: VerticalAlign) {
        self.vertical_align = align;
        self.update_centering();
    }

    fn update_size(&mut self) {
        self.size = self.font.measure_string(&self.text);
        self.update_centering();
    }

    fn update_centering(&mut self) {
        let x = match self.horizontal_align {
            HorizontalAlign::Left => 0.0,
            HorizontalAlign::Center => self.size.x / 2.0,
            HorizontalAlign::Right => self.size.x,
        };
        let y = match self.vertical_align {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Center => self.size.y / 2.0,
            VerticalAlign::Bottom => self.size.y,
        };
        self.origin = Vec2::new(x, y).trunc();
    }

    pub fn bounds(&self, transform: &RenderTransform, local_offset: Vec2) -> Rect {
        calculate_bounds(
            transform.position,
            local_offset,
            self.origin,
            transform.scale,
            transform.rotation,
            self.size.x,
            self.size.y,
        )
    }

    pub fn render(
        &self,
        transform: &RenderTransform,
        renderable: &Renderable,
        batcher: &mut dyn Batcher,
    ) {
        batcher.draw_string(
            self.font.name(),
            &self.text,
            renderable.color,
            transform.placement(
                renderable.local_offset(),
                self.origin,
                renderable.layer_depth(),
            ),
        );
    }
}
