use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::geometry::Rect;

/// Every physics layer bit set.
pub const ALL_LAYERS: u32 = u32::MAX;

/// Axis-aligned box collider. Used for light occlusion and as the collision
/// shape spawned for tile-map collision layers.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vec2,
    pub offset: Vec2,
    /// Triggers report overlaps but never block or occlude.
    pub is_trigger: bool,
    /// Bit mask of the physics layers this collider lives in.
    pub physics_layer: u32,
}

impl BoxCollider {
    /// Create a BoxCollider with given size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
            is_trigger: false,
            physics_layer: 1,
        }
    }

    /// Modify BoxCollider with given size and offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_physics_layer(mut self, layer: u32) -> Self {
        self.physics_layer = layer;
        self
    }

    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Returns (min, max) of the collider AABB for a given entity position.
    /// Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, position: Vec2) -> (Vec2, Vec2) {
        let p0 = position + self.offset;
        let p1 = p0 + self.size;
        (p0.min(p1), p0.max(p1))
    }

    /// World-space bounds at `position`.
    pub fn bounds(&self, position: Vec2) -> Rect {
        let (min, max) = self.aabb(position);
        Rect::from_corners(min, max)
    }

    /// AABB vs AABB overlap test against another BoxCollider at a different entity position.
    pub fn overlaps(&self, position: Vec2, other: &Self, other_position: Vec2) -> bool {
        let (min_a, max_a) = self.aabb(position);
        let (min_b, max_b) = other.aabb(other_position);
        min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
    }

    /// Point containment in world space.
    pub fn contains_point(&self, position: Vec2, point: Vec2) -> bool {
        let (min, max) = self.aabb(position);
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// True when this collider is in any layer of `mask`.
    pub fn in_layers(&self, mask: u32) -> bool {
        self.physics_layer & mask != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_size_normalizes() {
        let c = BoxCollider::new(-10.0, -4.0);
        let (min, max) = c.aabb(Vec2::new(10.0, 10.0));
        assert_eq!(min, Vec2::new(0.0, 6.0));
        assert_eq!(max, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_overlaps_is_strict() {
        let a = BoxCollider::new(10.0, 10.0);
        let b = BoxCollider::new(10.0, 10.0);
        assert!(a.overlaps(Vec2::ZERO, &b, Vec2::new(9.0, 0.0)));
        assert!(!a.overlaps(Vec2::ZERO, &b, Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_bounds_with_offset() {
        let c = BoxCollider::new(4.0, 6.0).with_offset(Vec2::new(-2.0, -3.0));
        assert_eq!(c.bounds(Vec2::new(10.0, 10.0)), Rect::new(8.0, 7.0, 4.0, 6.0));
        assert!(c.contains_point(Vec2::new(10.0, 10.0), Vec2::new(12.0, 13.0)));
    }

    #[test]
    fn test_layer_mask() {
        let c = BoxCollider::new(1.0, 1.0).with_physics_layer(0b100);
        assert!(c.in_layers(0b110));
        assert!(!c.in_layers(0b011));
        assert!(c.in_layers(ALL_LAYERS));
    }
}
