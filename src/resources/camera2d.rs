//! Shared 2D camera resource.
//!
//! Systems agree on a single world/screen transform through this resource.
//! Update it to pan/zoom the view. Renderers without a camera of their own
//! use it for culling.

use bevy_ecs::prelude::Resource;
use glam::Vec2;

use crate::geometry::Rect;

/// `position` is the world point at the center of the viewport.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
    /// Viewport size in screen pixels.
    pub viewport: Vec2,
}

impl Camera2D {
    pub fn new(position: Vec2, viewport: Vec2) -> Self {
        Self {
            position,
            zoom: 1.0,
            viewport,
        }
    }

    /// Fixed camera whose bounds are exactly `(0, 0, width, height)`.
    pub fn screen_space(width: f32, height: f32) -> Self {
        Self::new(Vec2::new(width * 0.5, height * 0.5), Vec2::new(width, height))
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.set_zoom(zoom);
        self
    }

    /// Zoom is kept strictly positive.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(f32::EPSILON);
    }

    /// World-space rectangle visible through the camera.
    pub fn bounds(&self) -> Rect {
        let size = self.viewport / self.zoom;
        let top_left = self.position - size * 0.5;
        Rect::new(top_left.x, top_left.y, size.x, size.y)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.position) * self.zoom + self.viewport * 0.5
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.viewport * 0.5) / self.zoom + self.position
    }

    /// Follow a resized back buffer, keeping the camera centered where it was.
    pub fn on_viewport_resized(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::screen_space(640.0, 360.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_centered_on_position() {
        let cam = Camera2D::new(Vec2::new(100.0, 50.0), Vec2::new(200.0, 100.0));
        assert_eq!(cam.bounds(), Rect::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_zoom_shrinks_bounds() {
        let cam = Camera2D::new(Vec2::ZERO, Vec2::new(200.0, 100.0)).with_zoom(2.0);
        assert_eq!(cam.bounds(), Rect::new(-50.0, -25.0, 100.0, 50.0));
    }

    #[test]
    fn test_screen_space_bounds() {
        assert_eq!(
            Camera2D::screen_space(320.0, 240.0).bounds(),
            Rect::new(0.0, 0.0, 320.0, 240.0)
        );
    }

    #[test]
    fn test_screen_world_roundtrip() {
        let cam = Camera2D::new(Vec2::new(30.0, -10.0), Vec2::new(640.0, 360.0)).with_zoom(1.5);
        let p = Vec2::new(12.0, 34.0);
        let back = cam.screen_to_world(cam.world_to_screen(p));
        assert!((back - p).length() < 1e-4);
    }
}
