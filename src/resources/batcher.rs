//! Draw primitives handed to the rendering backend.
//!
//! Renderables never talk to a GPU. They describe what to draw through the
//! [`Batcher`] trait; a backend implements [`Batcher::push`] and translates
//! each [`DrawCommand`] into its own calls. [`DrawList`] is the recording
//! implementation: it keeps commands in submission order so a backend can
//! replay them later (and tests can inspect them).

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use glam::Vec2;

use crate::components::renderable::MaterialId;
use crate::components::sprite::{PIXEL_TEXTURE, Subtexture};
use crate::geometry::{Color, Rect};
use crate::resources::camera2d::Camera2D;

/// Placement of a textured quad: where the pivot lands and how the quad is
/// rotated and scaled around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    /// Radians.
    pub rotation: f32,
    pub origin: Vec2,
    pub scale: Vec2,
    pub flip_x: bool,
    pub flip_y: bool,
    pub depth: f32,
}

impl Placement {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            origin: Vec2::ZERO,
            scale: Vec2::ONE,
            flip_x: false,
            flip_y: false,
            depth: 0.0,
        }
    }
}

/// Per-edge skew of a prototype quad.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Skew {
    pub top_x: f32,
    pub bottom_x: f32,
    pub left_y: f32,
    pub right_y: f32,
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Begin {
        camera_bounds: Rect,
    },
    End,
    SetMaterial(Option<MaterialId>),
    Sprite {
        tex_key: Arc<str>,
        source: Rect,
        color: Color,
        placement: Placement,
    },
    /// Texture region stretched into `dest`.
    Rect {
        tex_key: Arc<str>,
        source: Rect,
        dest: Rect,
        color: Color,
    },
    Skewed {
        dest: Rect,
        color: Color,
        rotation: f32,
        depth: f32,
        skew: Skew,
    },
    Text {
        font: String,
        text: String,
        color: Color,
        placement: Placement,
    },
    HollowRect {
        rect: Rect,
        color: Color,
        thickness: f32,
    },
    Pixel {
        position: Vec2,
        color: Color,
        size: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        thickness: f32,
    },
    Points {
        origin: Vec2,
        points: Vec<Vec2>,
        color: Color,
        closed: bool,
    },
    /// Additive triangle list for a shadow-casting light.
    LightMesh {
        vertices: Vec<Vec2>,
        indices: Vec<u16>,
        primitive_count: usize,
        light_source: Vec2,
        radius: f32,
        color: glam::Vec3,
    },
}

/// Consumer side of the draw primitives.
///
/// Only [`push`](Batcher::push) is required; every other method builds the
/// matching [`DrawCommand`].
pub trait Batcher {
    fn push(&mut self, command: DrawCommand);

    fn begin(&mut self, camera: &Camera2D) {
        self.push(DrawCommand::Begin {
            camera_bounds: camera.bounds(),
        });
    }

    fn end(&mut self) {
        self.push(DrawCommand::End);
    }

    fn set_material(&mut self, material: Option<MaterialId>) {
        self.push(DrawCommand::SetMaterial(material));
    }

    fn draw(&mut self, subtexture: &Subtexture, color: Color, placement: Placement) {
        self.push(DrawCommand::Sprite {
            tex_key: Arc::clone(&subtexture.tex_key),
            source: subtexture.source_rect,
            color,
            placement,
        });
    }

    fn draw_rect(&mut self, tex_key: &Arc<str>, dest: Rect, source: Rect, color: Color) {
        self.push(DrawCommand::Rect {
            tex_key: Arc::clone(tex_key),
            source,
            dest,
            color,
        });
    }

    /// Pixel-texture quad with skewed edges.
    fn draw_skewed(&mut self, dest: Rect, color: Color, rotation: f32, depth: f32, skew: Skew) {
        self.push(DrawCommand::Skewed {
            dest,
            color,
            rotation,
            depth,
            skew,
        });
    }

    fn draw_string(&mut self, font: &str, text: &str, color: Color, placement: Placement) {
        self.push(DrawCommand::Text {
            font: font.to_string(),
            text: text.to_string(),
            color,
            placement,
        });
    }

    fn draw_hollow_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCommand::HollowRect {
            rect,
            color,
            thickness: 1.0,
        });
    }

    fn draw_pixel(&mut self, position: Vec2, color: Color, size: f32) {
        self.push(DrawCommand::Pixel {
            position,
            color,
            size,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, thickness: f32) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            color,
            thickness,
        });
    }

    fn draw_points(&mut self, origin: Vec2, points: &[Vec2], color: Color, closed: bool) {
        self.push(DrawCommand::Points {
            origin,
            points: points.to_vec(),
            color,
            closed,
        });
    }

    fn draw_light_mesh(
        &mut self,
        vertices: &[Vec2],
        indices: &[u16],
        primitive_count: usize,
        light_source: Vec2,
        radius: f32,
        color: glam::Vec3,
    ) {
        self.push(DrawCommand::LightMesh {
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
            primitive_count,
            light_source,
            radius,
            color,
        });
    }
}

/// Recording batcher. Insert it as a resource to collect a frame's commands.
#[derive(Resource, Debug, Default, Clone)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands other than begin/end/material switches.
    pub fn draws(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| {
            !matches!(
                c,
                DrawCommand::Begin { .. } | DrawCommand::End | DrawCommand::SetMaterial(_)
            )
        })
    }

    /// Texture keys of every textured draw, in order.
    pub fn texture_keys(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { tex_key, .. } | DrawCommand::Rect { tex_key, .. } => {
                    Some(tex_key.as_ref())
                }
                DrawCommand::Skewed { .. } => Some(PIXEL_TEXTURE),
                _ => None,
            })
            .collect()
    }
}

impl Batcher for DrawList {
    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
