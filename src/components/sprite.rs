use std::sync::Arc;

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::renderable::{RenderTransform, Renderable};
use crate::geometry::{Color, Rect, calculate_bounds};
use crate::resources::batcher::Batcher;

/// Texture key of the 1x1 white pixel every backend is expected to provide.
pub const PIXEL_TEXTURE: &str = "__pixel";

/// A region of a texture plus the pivot used when drawing it.
///
/// `origin` is in pixels relative to the region's top-left corner and defaults
/// to the region's center.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtexture {
    pub tex_key: Arc<str>,
    pub source_rect: Rect,
    pub origin: Vec2,
}

impl Subtexture {
    pub fn new(tex_key: impl Into<Arc<str>>, source_rect: Rect) -> Self {
        Self {
            tex_key: tex_key.into(),
            source_rect,
            origin: source_rect.size() * 0.5,
        }
    }

    /// The 1x1 pixel region, used by prototyping renderables.
    pub fn pixel() -> Self {
        Self::new(PIXEL_TEXTURE, Rect::new(0.0, 0.0, 1.0, 1.0))
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn width(&self) -> f32 {
        self.source_rect.width
    }

    pub fn height(&self) -> f32 {
        self.source_rect.height
    }

    pub fn center(&self) -> Vec2 {
        self.source_rect.size() * 0.5
    }
}

/// Sprite displays a [`Subtexture`]. The displayed region is swapped by the
/// animator when a clip is playing.
///
/// The origin selects the pivot point (in pixels) relative to the region's
/// top-left, used for placement/rotation/scaling when rendering. Setting a
/// subtexture resets the origin to that subtexture's origin; set a custom
/// origin afterwards if you need a different one.
#[derive(Component, Clone, Debug, Default)]
pub struct Sprite {
    subtexture: Option<Subtexture>,
    origin: Vec2,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Sprite {
    pub fn new(subtexture: Subtexture) -> Self {
        Self {
            origin: subtexture.origin,
            subtexture: Some(subtexture),
            flip_x: false,
            flip_y: false,
        }
    }

    /// A sprite with nothing to draw yet. Give it a subtexture or an animation
    /// before it is rendered or it will have empty bounds.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn subtexture(&self) -> Option<&Subtexture> {
        self.subtexture.as_ref()
    }

    pub fn set_subtexture(&mut self, subtexture: Option<Subtexture>) {
        if let Some(sub) = &subtexture {
            self.origin = sub.origin;
        }
        self.subtexture = subtexture;
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    pub fn width(&self) -> f32 {
        self.subtexture.as_ref().map_or(0.0, Subtexture::width)
    }

    pub fn height(&self) -> f32 {
        self.subtexture.as_ref().map_or(0.0, Subtexture::height)
    }

    /// Origin in 0..1 space relative to the sprite size.
    pub fn origin_normalized(&self) -> Vec2 {
        let (w, h) = (self.width(), self.height());
        if w == 0.0 || h == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(self.origin.x / w, self.origin.y / h)
    }

    pub fn set_origin_normalized(&mut self, value: Vec2) {
        self.origin = Vec2::new(value.x * self.width(), value.y * self.height());
    }

    /// World-space AABB of the displayed region.
    pub fn bounds(&self, transform: &RenderTransform, local_offset: Vec2) -> Rect {
        calculate_bounds(
            transform.position,
            local_offset,
            self.origin,
            transform.scale,
            transform.rotation,
            self.width(),
            self.height(),
        )
    }

    pub fn render(
        &self,
        transform: &RenderTransform,
        renderable: &Renderable,
        batcher: &mut dyn Batcher,
    ) {
        self.render_with(
            transform,
            renderable.local_offset(),
            renderable.color,
            renderable.layer_depth(),
            batcher,
        );
    }

    /// Draws the sprite eight times around its position, `offset` pixels out,
    /// in `outline_color` and just behind the sprite itself. Meant for
    /// disabled renderables that are drawn manually.
    pub fn draw_outline(
        &self,
        transform: &RenderTransform,
        renderable: &Renderable,
        batcher: &mut dyn Batcher,
        outline_color: Color,
        offset: f32,
    ) {
        let depth = renderable.layer_depth() + 0.01;
        for i in -1..=1 {
            for j in -1..=1 {
                if i == 0 && j == 0 {
                    continue;
                }
                let shifted = renderable.local_offset() + Vec2::new(i as f32, j as f32) * offset;
                self.render_with(transform, shifted, outline_color, depth, batcher);
            }
        }
    }

    fn render_with(
        &self,
        transform: &RenderTransform,
        local_offset: Vec2,
        color: Color,
        depth: f32,
        batcher: &mut dyn Batcher,
    ) {
        let Some(sub) = &self.subtexture else {
            return;
        };
        let mut placement = transform.placement(local_offset, self.origin, depth);
        placement.flip_x = self.flip_x;
        placement.flip_y = self.flip_y;
        batcher.draw(sub, color, placement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::batcher::{DrawCommand, DrawList};

    fn sub(x: f32) -> Subtexture {
        Subtexture::new("hero", Rect::new(x, 0.0, 16.0, 32.0))
    }

    #[test]
    fn test_subtexture_origin_defaults_to_center() {
        assert_eq!(sub(0.0).origin, Vec2::new(8.0, 16.0));
    }

    #[test]
    fn test_new_sprite_takes_subtexture_origin() {
        let s = Sprite::new(sub(0.0).with_origin(Vec2::new(1.0, 2.0)));
        assert_eq!(s.origin(), Vec2::new(1.0, 2.0));
        assert_eq!(s.width(), 16.0);
    }

    #[test]
    fn test_set_subtexture_resets_origin() {
        let mut s = Sprite::new(sub(0.0));
        s.set_origin(Vec2::ZERO);
        s.set_subtexture(Some(sub(16.0)));
        assert_eq!(s.origin(), Vec2::new(8.0, 16.0));
    }

    #[test]
    fn test_clearing_subtexture_keeps_origin() {
        let mut s = Sprite::new(sub(0.0));
        s.set_subtexture(None);
        assert!(s.subtexture().is_none());
        assert_eq!(s.origin(), Vec2::new(8.0, 16.0));
        assert_eq!(s.width(), 0.0);
    }

    #[test]
    fn test_origin_normalized_roundtrip() {
        let mut s = Sprite::new(sub(0.0));
        s.set_origin_normalized(Vec2::new(0.25, 1.0));
        assert_eq!(s.origin(), Vec2::new(4.0, 32.0));
        assert_eq!(s.origin_normalized(), Vec2::new(0.25, 1.0));
    }

    #[test]
    fn test_bounds_use_origin_and_scale() {
        let s = Sprite::new(sub(0.0));
        let mut t = RenderTransform::at(Vec2::new(100.0, 100.0));
        t.scale = Vec2::splat(2.0);
        assert_eq!(s.bounds(&t, Vec2::ZERO), Rect::new(84.0, 68.0, 32.0, 64.0));
    }

    #[test]
    fn test_render_passes_flips_and_depth() {
        let mut s = Sprite::new(sub(16.0));
        s.flip_x = true;
        let r = Renderable::new().with_layer_depth(0.5);
        let mut list = DrawList::new();
        s.render(&RenderTransform::at(Vec2::new(5.0, 6.0)), &r, &mut list);
        match &list.commands[..] {
            [DrawCommand::Sprite { source, placement, .. }] => {
                assert_eq!(source.x, 16.0);
                assert!(placement.flip_x);
                assert_eq!(placement.depth, 0.5);
                assert_eq!(placement.position, Vec2::new(5.0, 6.0));
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn test_empty_sprite_draws_nothing() {
        let mut list = DrawList::new();
        Sprite::empty().render(&RenderTransform::default(), &Renderable::new(), &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_draw_outline_draws_eight_copies_behind() {
        let s = Sprite::new(sub(0.0));
        let r = Renderable::new()
            .with_layer_depth(0.2)
            .with_local_offset(Vec2::new(1.0, 1.0));
        let mut list = DrawList::new();
        s.draw_outline(&RenderTransform::default(), &r, &mut list, Color::BLACK, 2.0);
        assert_eq!(list.len(), 8);
        for cmd in &list.commands {
            let DrawCommand::Sprite { color, placement, .. } = cmd else {
                panic!("expected sprite draw");
            };
            assert_eq!(*color, Color::BLACK);
            assert!((placement.depth - 0.21).abs() < 1e-6);
            assert_ne!(placement.position, Vec2::new(1.0, 1.0));
        }
        // the renderable itself is untouched
        assert_eq!(r.local_offset(), Vec2::new(1.0, 1.0));
        assert_eq!(r.color, Color::WHITE);
    }

    #[test]
    fn test_empty_sprite_normalized_origin_is_zero() {
        assert_eq!(Sprite::empty().origin_normalized(), Vec2::ZERO);
    }
}
