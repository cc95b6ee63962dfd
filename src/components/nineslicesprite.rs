//! Nine-patch sprite.
//!
//! The subtexture is cut into a 3x3 grid by four insets. Corners keep their
//! size, edges stretch along one axis and the center stretches along both, so
//! the sprite can be drawn at any width/height without distorting its border.
//!
//! Patch order in every array here: top-left, top-center, top-right,
//! middle-left, center, middle-right, bottom-left, bottom-center,
//! bottom-right.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::renderable::{RenderTransform, Renderable};
use crate::components::sprite::Subtexture;
use crate::geometry::Rect;
use crate::resources::batcher::Batcher;

/// Border widths in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Insets {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// Splits `rect` into nine patches.
pub fn nine_patch_rects(rect: Rect, insets: Insets) -> [Rect; 9] {
    let center_width = rect.width - insets.left - insets.right;
    let center_height = rect.height - insets.top - insets.bottom;
    let left_x = rect.x + insets.left;
    let right_x = rect.x + rect.width - insets.right;
    let top_y = rect.y + insets.top;
    let bottom_y = rect.y + rect.height - insets.bottom;

    [
        Rect::new(rect.x, rect.y, insets.left, insets.top),
        Rect::new(left_x, rect.y, center_width, insets.top),
        Rect::new(right_x, rect.y, insets.right, insets.top),
        Rect::new(rect.x, top_y, insets.left, center_height),
        Rect::new(left_x, top_y, center_width, center_height),
        Rect::new(right_x, top_y, insets.right, center_height),
        Rect::new(rect.x, bottom_y, insets.left, insets.bottom),
        Rect::new(left_x, bottom_y, center_width, insets.bottom),
        Rect::new(right_x, bottom_y, insets.right, insets.bottom),
    ]
}

#[derive(Component, Debug, Clone)]
pub struct NineSliceSprite {
    subtexture: Subtexture,
    insets: Insets,
    width: f32,
    height: f32,
    source_rects: [Rect; 9],
    /// Relative to `(0, 0)`; `None` until regenerated after a resize.
    dest_rects: Option<[Rect; 9]>,
}

impl NineSliceSprite {
    /// Starts at the subtexture's own size.
    pub fn new(subtexture: Subtexture, insets: Insets) -> Self {
        let source_rects = nine_patch_rects(subtexture.source_rect, insets);
        Self {
            width: subtexture.width().trunc(),
            height: subtexture.height().trunc(),
            subtexture,
            insets,
            source_rects,
            dest_rects: None,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.set_width(width);
        self.set_height(height);
        self
    }

    pub fn subtexture(&self) -> &Subtexture {
        &self.subtexture
    }

    pub fn insets(&self) -> Insets {
        self.insets
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Whole pixels only.
    pub fn set_width(&mut self, width: f32) {
        self.width = width.trunc();
        self.dest_rects = None;
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height.trunc();
        self.dest_rects = None;
    }

    pub fn source_rects(&self) -> &[Rect; 9] {
        &self.source_rects
    }

    /// Destination patches relative to the sprite's top-left, regenerated
    /// after a resize.
    pub fn dest_rects(&mut self) -> [Rect; 9] {
        *self.dest_rects.get_or_insert_with(|| {
            nine_patch_rects(Rect::new(0.0, 0.0, self.width, self.height), self.insets)
        })
    }

    /// Top-left at the entity position plus offset, configured size. Scale and
    /// rotation do not apply.
    pub fn bounds(&self, transform: &RenderTransform, local_offset: Vec2) -> Rect {
        let location = transform.position + local_offset;
        Rect::new(location.x, location.y, self.width, self.height)
    }

    pub fn render(
        &mut self,
        transform: &RenderTransform,
        renderable: &Renderable,
        batcher: &mut dyn Batcher,
    ) {
        let dest_rects = self.dest_rects();
        let pos = (transform.position + renderable.local_offset()).trunc();
        for (dest, source) in dest_rects.iter().zip(self.source_rects.iter()) {
            batcher.draw_rect(
                &self.subtexture.tex_key,
                dest.translated(pos),
                *source,
                renderable.color,
            );
        }
    }
}
