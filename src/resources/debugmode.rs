//! Debug toggle resource.
//!
//! The mere presence of this resource enables the debug render pass: bounds
//! outlines, pivots and collider rectangles. Remove it to disable.

use bevy_ecs::prelude::Resource;

use crate::geometry::Color;

/// Marker resource carrying the overlay palette.
#[derive(Resource, Clone, Copy, Debug)]
pub struct DebugMode {
    pub renderable_bounds: Color,
    pub renderable_center: Color,
    pub collider_bounds: Color,
    pub collider_edge: Color,
    /// Side of the square drawn on a renderable's pivot.
    pub pivot_size: f32,
}

impl Default for DebugMode {
    fn default() -> Self {
        Self {
            renderable_bounds: Color::YELLOW,
            renderable_center: Color::DARK_ORCHID,
            collider_bounds: Color::new(255, 255, 255, 77),
            collider_edge: Color::new(139, 0, 0, 255),
            pivot_size: 4.0,
        }
    }
}
