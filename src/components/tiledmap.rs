//! Tile map renderable.
//!
//! Wraps a shared [`TileMap`] and renders either every layer or a chosen
//! subset. One layer can be designated the collision layer: its solid tiles
//! are turned into [`BoxCollider`](super::boxcollider::BoxCollider) entities by
//! [`systems::tiledmap`](crate::systems::tiledmap), and it answers the tile
//! queries below.
//!
//! World positions passed to the queries are converted to map-local
//! coordinates by subtracting the map origin, i.e. the entity position plus
//! the renderable's local offset.

use std::sync::Arc;

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

use crate::components::renderable::{RenderTransform, Renderable};
use crate::errors::RenderError;
use crate::geometry::Rect;
use crate::resources::batcher::Batcher;
use crate::resources::debugmode::DebugMode;
use crate::resources::tilemap::{ObjectShape, Tile, TileMap};

#[derive(Component, Debug, Clone)]
pub struct TiledMapComponent {
    map: Arc<TileMap>,
    collision_layer: Option<usize>,
    /// Physics layer bits given to the spawned colliders.
    pub physics_layer: u32,
    pub should_create_colliders: bool,
    /// `None` renders every visible layer.
    layer_indices_to_render: Option<Vec<usize>>,
}

/// Marks a collider entity spawned for the collision layer of `map`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMapCollider {
    pub map: Entity,
}

impl TiledMapComponent {
    pub fn new(map: Arc<TileMap>) -> Self {
        Self {
            map,
            collision_layer: None,
            physics_layer: 1,
            should_create_colliders: true,
            layer_indices_to_render: None,
        }
    }

    /// Uses the named layer for collisions and tile queries.
    pub fn with_collision_layer(mut self, name: &str) -> Result<Self, RenderError> {
        self.collision_layer = Some(self.layer_index(name)?);
        Ok(self)
    }

    pub fn with_physics_layer(mut self, layer: u32) -> Self {
        self.physics_layer = layer;
        self
    }

    pub fn map(&self) -> &Arc<TileMap> {
        &self.map
    }

    pub fn collision_layer(&self) -> Option<usize> {
        self.collision_layer
    }

    pub fn layer_indices_to_render(&self) -> Option<&[usize]> {
        self.layer_indices_to_render.as_deref()
    }

    fn layer_index(&self, name: &str) -> Result<usize, RenderError> {
        self.map
            .layer_index(name)
            .ok_or_else(|| RenderError::UnknownLayer {
                name: name.to_string(),
            })
    }

    /// Restricts rendering to a single layer.
    pub fn set_layer_to_render(&mut self, name: &str) -> Result<(), RenderError> {
        let index = self.layer_index(name)?;
        self.layer_indices_to_render = Some(vec![index]);
        Ok(())
    }

    /// Restricts rendering to the named layers, in the given order. Nothing
    /// changes when any name is unknown.
    pub fn set_layers_to_render(&mut self, names: &[&str]) -> Result<(), RenderError> {
        let indices = names
            .iter()
            .map(|name| self.layer_index(name))
            .collect::<Result<Vec<_>, _>>()?;
        self.layer_indices_to_render = Some(indices);
        Ok(())
    }

    fn layers_to_render(&self) -> Vec<usize> {
        match &self.layer_indices_to_render {
            Some(indices) => indices.clone(),
            None => (0..self.map.layers.len()).collect(),
        }
    }

    pub fn render_all_layers(&mut self) {
        self.layer_indices_to_render = None;
    }

    /// Top-left of the map in world space.
    pub fn map_origin(transform: &RenderTransform, local_offset: Vec2) -> Vec2 {
        transform.position + local_offset
    }

    pub fn row_at_world_position(&self, map_origin: Vec2, y: f32) -> i32 {
        self.map.world_to_tile_y(y - map_origin.y)
    }

    pub fn column_at_world_position(&self, map_origin: Vec2, x: f32) -> i32 {
        self.map.world_to_tile_x(x - map_origin.x)
    }

    /// Tile of the collision layer under a world position.
    pub fn tile_at_world_position(
        &self,
        map_origin: Vec2,
        world: Vec2,
    ) -> Result<Option<Tile>, RenderError> {
        let layer = self
            .collision_layer
            .ok_or(RenderError::MissingCollisionLayer)?;
        let local = world - map_origin;
        Ok(self.map.tile_at(
            layer,
            self.map.world_to_tile_x(local.x),
            self.map.world_to_tile_y(local.y),
        ))
    }

    /// Tiles of the collision layer under a world-space rect.
    pub fn tiles_intersecting_bounds(
        &self,
        map_origin: Vec2,
        bounds: Rect,
    ) -> Result<Vec<Tile>, RenderError> {
        let layer = self
            .collision_layer
            .ok_or(RenderError::MissingCollisionLayer)?;
        Ok(self
            .map
            .tiles_intersecting(layer, bounds.translated(-map_origin)))
    }

    /// Map-local collision rectangles, empty without a collision layer.
    pub fn collision_rects(&self) -> Vec<Rect> {
        self.collision_layer
            .map(|layer| self.map.collision_rects(layer))
            .unwrap_or_default()
    }

    pub fn bounds(&self, transform: &RenderTransform, local_offset: Vec2) -> Rect {
        let origin = Self::map_origin(transform, local_offset);
        Rect::new(
            origin.x,
            origin.y,
            self.map.pixel_width(),
            self.map.pixel_height(),
        )
    }

    /// Draws the selected layers, culled to `camera_bounds`.
    pub fn render(
        &self,
        transform: &RenderTransform,
        renderable: &Renderable,
        batcher: &mut dyn Batcher,
        camera_bounds: Rect,
    ) {
        let origin = Self::map_origin(transform, renderable.local_offset());
        for index in self.layers_to_render() {
            self.map
                .draw_layer(index, batcher, origin, renderable.color, camera_bounds);
        }
    }

    /// Object groups plus the collision rectangles.
    pub fn debug_render(
        &self,
        transform: &RenderTransform,
        renderable: &Renderable,
        batcher: &mut dyn Batcher,
        debug: &DebugMode,
    ) {
        let origin = Self::map_origin(transform, renderable.local_offset());
        for group in self.map.object_groups.iter().filter(|g| g.visible) {
            for obj in group.objects.iter().filter(|o| o.visible) {
                let at = origin + Vec2::new(obj.x, obj.y);
                match &obj.shape {
                    ObjectShape::Ellipse => batcher.draw_circle(
                        at + Vec2::new(obj.width, obj.height) * 0.5,
                        obj.width * 0.5,
                        group.color,
                        1.0,
                    ),
                    ObjectShape::Polygon { points } => {
                        batcher.draw_points(at, points, group.color, true)
                    }
                    ObjectShape::Polyline { points } => {
                        batcher.draw_points(at, points, group.color, false)
                    }
                    ObjectShape::Rectangle => batcher.draw_hollow_rect(
                        Rect::new(at.x, at.y, obj.width, obj.height),
                        group.color,
                    ),
                }
            }
        }
        for rect in self.collision_rects() {
            batcher.draw_hollow_rect(rect.translated(origin), debug.collider_edge);
        }
    }
}
