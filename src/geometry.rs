//! Plain 2D geometry shared by renderables.
//!
//! - [`Rect`] – float axis-aligned rectangle used for bounds, source regions and culling
//! - [`Color`] – 8-bit RGBA color passed along to the batcher
//! - [`calculate_bounds`] – world-space AABB of a transformed, origin-pivoted quad

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rect from two corners, normalizing to proper min/max.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn location(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Returns a copy moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Strict overlap test. Rects that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// True when a circle overlaps this rect.
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = Vec2::new(
            center.x.clamp(self.left(), self.right()),
            center.y.clamp(self.top(), self.bottom()),
        );
        closest.distance_squared(center) <= radius * radius
    }
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0, 255);
    pub const GREEN: Color = Color::new(0, 128, 0, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0, 255);
    pub const DARK_ORCHID: Color = Color::new(153, 50, 204, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channel-wise linear interpolation. `t` is clamped to `[0, 1]`.
    pub fn lerp(self, to: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let v = a as f32 + (b as f32 - a as f32) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Color::new(
            mix(self.r, to.r),
            mix(self.g, to.g),
            mix(self.b, to.b),
            mix(self.a, to.a),
        )
    }

    /// RGB as normalized floats, the layout effects expect for light colors.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// World-space AABB of a `width` x `height` quad.
///
/// The quad is placed at `parent_position + local_offset`, pivoted around
/// `origin` (in unscaled local pixels), scaled, then rotated by `rotation`
/// radians around the pivot.
pub fn calculate_bounds(
    parent_position: Vec2,
    local_offset: Vec2,
    origin: Vec2,
    scale: Vec2,
    rotation: f32,
    width: f32,
    height: f32,
) -> Rect {
    let world_pos = parent_position + local_offset;

    if rotation == 0.0 {
        return Rect::new(
            world_pos.x - origin.x * scale.x,
            world_pos.y - origin.y * scale.y,
            width * scale.x,
            height * scale.y,
        );
    }

    let rot = Vec2::from_angle(rotation);
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(width, 0.0),
        Vec2::new(0.0, height),
        Vec2::new(width, height),
    ];

    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for corner in corners {
        let p = world_pos + rot.rotate((corner - origin) * scale);
        min = min.min(p);
        max = max.max(p);
    }

    Rect::from_corners(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
    }

    #[test]
    fn test_rect_intersects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_rect_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_rect_from_corners_normalizes() {
        let r = Rect::from_corners(Vec2::new(5.0, 8.0), Vec2::new(1.0, 2.0));
        assert_eq!(r, Rect::new(1.0, 2.0, 4.0, 6.0));
    }

    #[test]
    fn test_rect_overlaps_circle() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.overlaps_circle(Vec2::new(12.0, 5.0), 3.0));
        assert!(!r.overlaps_circle(Vec2::new(14.0, 5.0), 3.0));
    }

    #[test]
    fn test_color_lerp_endpoints() {
        let a = Color::new(0, 0, 0, 0);
        let b = Color::new(200, 100, 50, 255);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::new(100, 50, 25, 128));
    }

    #[test]
    fn test_color_default_is_white() {
        assert_eq!(Color::default(), Color::WHITE);
    }

    #[test]
    fn test_bounds_unrotated() {
        let b = calculate_bounds(
            Vec2::new(100.0, 50.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(8.0, 8.0),
            Vec2::new(2.0, 2.0),
            0.0,
            16.0,
            16.0,
        );
        assert_eq!(b, Rect::new(94.0, 34.0, 32.0, 32.0));
    }

    #[test]
    fn test_bounds_rotated_quarter_turn() {
        // 20x10 quad pivoted at its center, rotated 90 degrees: becomes 10x20.
        let b = calculate_bounds(
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::new(10.0, 5.0),
            Vec2::ONE,
            std::f32::consts::FRAC_PI_2,
            20.0,
            10.0,
        );
        assert!(approx_eq(b.x, -5.0));
        assert!(approx_eq(b.y, -10.0));
        assert!(approx_eq(b.width, 10.0));
        assert!(approx_eq(b.height, 20.0));
    }
}
