//! Deferred lights.
//!
//! These are plain data read by the external deferred lighting pass. The
//! regular render pass draws nothing for them; only the debug pass shows their
//! extents. The light color is the [`Renderable`] color.

use bevy_ecs::prelude::Component;
use glam::{Vec2, Vec3};

use crate::components::renderable::RenderTransform;
use crate::geometry::{Color, Rect, calculate_bounds};
use crate::resources::batcher::Batcher;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// Height of the light above the 2D plane.
    pub z_position: f32,
    radius: f32,
    pub intensity: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            z_position: 150.0,
            radius: 400.0,
            intensity: 3.0,
        }
    }
}

impl PointLight {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_z_position(mut self, z: f32) -> Self {
        self.z_position = z;
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    /// Square around the light; only the x scale applies.
    pub fn bounds(&self, transform: &RenderTransform, local_offset: Vec2) -> Rect {
        let r = self.radius * transform.scale.x;
        calculate_bounds(
            transform.position,
            local_offset,
            Vec2::splat(r),
            Vec2::ONE,
            0.0,
            r * 2.0,
            r * 2.0,
        )
    }

    pub fn debug_render(
        &self,
        transform: &RenderTransform,
        local_offset: Vec2,
        batcher: &mut dyn Batcher,
    ) {
        batcher.draw_circle(
            transform.position + local_offset,
            self.radius * transform.scale.x,
            Color::DARK_ORCHID,
            2.0,
        );
    }
}

/// Directional light filling a rectangle anchored at its top-left corner.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AreaLight {
    pub width: f32,
    pub height: f32,
    /// Direction the light shines from, relative to the lit area.
    pub direction: Vec3,
    pub intensity: f32,
}

impl AreaLight {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            direction: Vec3::new(500.0, 500.0, 50.0),
            intensity: 12.0,
        }
    }

    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn bounds(&self, transform: &RenderTransform, local_offset: Vec2) -> Rect {
        calculate_bounds(
            transform.position,
            local_offset,
            Vec2::ZERO,
            transform.scale,
            transform.rotation,
            self.width,
            self.height,
        )
    }

    pub fn debug_render(
        &self,
        transform: &RenderTransform,
        local_offset: Vec2,
        batcher: &mut dyn Batcher,
    ) {
        batcher.draw_hollow_rect(self.bounds(transform, local_offset), Color::DARK_ORCHID);
    }
}
