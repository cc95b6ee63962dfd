//! Shared rendering state of anything that can be drawn.
//!
//! Every drawable entity carries a [`Renderable`] next to exactly one kind
//! component ([`Sprite`](super::sprite::Sprite),
//! [`NineSliceSprite`](super::nineslicesprite::NineSliceSprite),
//! [`TiledMapComponent`](super::tiledmap::TiledMapComponent), a light...). The
//! renderable holds what every kind has in common: draw order, tint, offset
//! from the entity position, material, visibility and memoised bounds.
//!
//! Draw order: higher render layers go first (they are further back), then
//! higher layer depth, then renderables with a material before those without.

use std::cmp::Ordering;

use bevy_ecs::prelude::Component;
use glam::Vec2;
use log::trace;

use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::geometry::{Color, Rect};
use crate::resources::batcher::Placement;

/// Opaque handle of a backend material (shader + state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Snapshot of an entity's transform as the render code consumes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTransform {
    pub position: Vec2,
    /// Radians.
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for RenderTransform {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}

impl RenderTransform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Missing rotation/scale components mean identity.
    pub fn from_components(
        position: &MapPosition,
        rotation: Option<&Rotation>,
        scale: Option<&Scale>,
    ) -> Self {
        Self {
            position: position.pos,
            rotation: rotation.map_or(0.0, Rotation::radians),
            scale: scale.map_or(Vec2::ONE, |s| s.scale),
        }
    }

    /// Batcher placement of a quad pivoted at `origin`, `offset` away from
    /// the entity position.
    pub fn placement(&self, offset: Vec2, origin: Vec2, depth: f32) -> Placement {
        Placement {
            position: self.position + offset,
            rotation: self.rotation,
            origin,
            scale: self.scale,
            flip_x: false,
            flip_y: false,
            depth,
        }
    }
}

/// Memoised world-space bounds plus the flag saying they are stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsCache {
    dirty: bool,
    value: Rect,
}

impl Default for BoundsCache {
    fn default() -> Self {
        Self {
            dirty: true,
            value: Rect::default(),
        }
    }
}

impl BoundsCache {
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// The cached value, or `None` when it must be recomputed.
    pub fn get(&self) -> Option<Rect> {
        (!self.dirty).then_some(self.value)
    }

    pub fn store(&mut self, value: Rect) {
        self.value = value;
        self.dirty = false;
    }
}

#[derive(Component, Clone, Debug)]
pub struct Renderable {
    layer_depth: f32,
    render_layer: i32,
    /// Tint passed along to the batcher.
    pub color: Color,
    local_offset: Vec2,
    pub material: Option<MaterialId>,
    /// Disabled renderables are skipped by every renderer.
    pub enabled: bool,
    is_visible: bool,
    bounds: BoundsCache,
}

impl Default for Renderable {
    fn default() -> Self {
        Self {
            layer_depth: 0.0,
            render_layer: 0,
            color: Color::WHITE,
            local_offset: Vec2::ZERO,
            material: None,
            enabled: true,
            is_visible: false,
            bounds: BoundsCache::default(),
        }
    }
}

impl Renderable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer_depth(mut self, depth: f32) -> Self {
        self.set_layer_depth(depth);
        self
    }

    pub fn with_render_layer(mut self, layer: i32) -> Self {
        self.render_layer = layer;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_local_offset(mut self, offset: Vec2) -> Self {
        self.set_local_offset(offset);
        self
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    /// 0 is in front and 1 is in back.
    pub fn layer_depth(&self) -> f32 {
        self.layer_depth
    }

    /// Clamped to `[0, 1]`.
    pub fn set_layer_depth(&mut self, depth: f32) {
        self.layer_depth = depth.clamp(0.0, 1.0);
    }

    pub fn render_layer(&self) -> i32 {
        self.render_layer
    }

    pub fn set_render_layer(&mut self, layer: i32) {
        self.render_layer = layer;
    }

    pub fn local_offset(&self) -> Vec2 {
        self.local_offset
    }

    pub fn set_local_offset(&mut self, offset: Vec2) {
        if self.local_offset != offset {
            self.local_offset = offset;
            self.bounds.mark_dirty();
        }
    }

    /// Result of the last camera test.
    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Records the camera test result. Returns true when visibility flipped.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.is_visible == visible {
            return false;
        }
        self.is_visible = visible;
        trace!(
            "Renderable on layer {} became {}",
            self.render_layer,
            if visible { "visible" } else { "invisible" }
        );
        true
    }

    pub fn bounds_cache(&self) -> &BoundsCache {
        &self.bounds
    }

    pub fn bounds_cache_mut(&mut self) -> &mut BoundsCache {
        &mut self.bounds
    }

    pub fn mark_bounds_dirty(&mut self) {
        self.bounds.mark_dirty();
    }

    /// Draw order: render layer descending, layer depth descending, then
    /// material before no material, then material id.
    pub fn draw_order(&self, other: &Renderable) -> Ordering {
        other
            .render_layer
            .cmp(&self.render_layer)
            .then_with(|| other.layer_depth.total_cmp(&self.layer_depth))
            .then_with(|| match (&self.material, &other.material) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}
