use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::renderable::{RenderTransform, Renderable};
use crate::geometry::{Rect, calculate_bounds};
use crate::resources::batcher::{Batcher, Skew};

/// Solid, optionally skewed rectangle for prototyping. Drawn with the 1x1
/// pixel texture tinted by the renderable color; the pivot is the center.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PrototypeSprite {
    width: f32,
    height: f32,
    pub skew: Skew,
}

impl PrototypeSprite {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            skew: Skew::default(),
        }
    }

    pub fn with_skew(mut self, top_x: f32, bottom_x: f32, left_y: f32, right_y: f32) -> Self {
        self.set_skew(top_x, bottom_x, left_y, right_y);
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    pub fn set_skew(&mut self, top_x: f32, bottom_x: f32, left_y: f32, right_y: f32) {
        self.skew = Skew {
            top_x,
            bottom_x,
            left_y,
            right_y,
        };
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    pub fn bounds(&self, transform: &RenderTransform, local_offset: Vec2) -> Rect {
        calculate_bounds(
            transform.position,
            local_offset,
            self.origin(),
            transform.scale,
            transform.rotation,
            self.width,
            self.height,
        )
    }

    pub fn render(
        &self,
        transform: &RenderTransform,
        renderable: &Renderable,
        batcher: &mut dyn Batcher,
    ) {
        let pos = transform.position - self.origin() * transform.scale + renderable.local_offset();
        let dest = Rect::new(
            pos.x.trunc(),
            pos.y.trunc(),
            (self.width * transform.scale.x).trunc(),
            (self.height * transform.scale.y).trunc(),
        );
        batcher.draw_skewed(
            dest,
            renderable.color,
            transform.rotation,
            renderable.layer_depth(),
            self.skew,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Color;
    use crate::resources::batcher::{DrawCommand, DrawList};

    #[test]
    fn test_origin_is_centered() {
        assert_eq!(PrototypeSprite::new(20.0, 10.0).origin(), Vec2::new(10.0, 5.0));
    }

    #[test]
    fn test_bounds_centered_on_position() {
        let p = PrototypeSprite::new(20.0, 10.0);
        let b = p.bounds(&RenderTransform::at(Vec2::new(50.0, 50.0)), Vec2::ZERO);
        assert_eq!(b, Rect::new(40.0, 45.0, 20.0, 10.0));
    }

    #[test]
    fn test_render_scaled_skewed_rect() {
        let p = PrototypeSprite::new(20.0, 10.0).with_skew(2.0, -2.0, 0.0, 1.0);
        let mut t = RenderTransform::at(Vec2::new(50.0, 50.0));
        t.scale = Vec2::splat(2.0);
        let r = Renderable::new().with_color(Color::RED);
        let mut list = DrawList::new();
        p.render(&t, &r, &mut list);
        assert_eq!(
            list.commands,
            vec![DrawCommand::Skewed {
                dest: Rect::new(30.0, 40.0, 40.0, 20.0),
                color: Color::RED,
                rotation: 0.0,
                depth: 0.0,
                skew: Skew {
                    top_x: 2.0,
                    bottom_x: -2.0,
                    left_y: 0.0,
                    right_y: 1.0
                },
            }]
        );
    }
}
