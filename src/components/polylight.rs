//! Shadow-casting point light.
//!
//! Each frame the light collects nearby [`BoxCollider`]s as occluders, asks a
//! [`VisibilityComputer`] for the visible polygon around it and draws that
//! polygon as an additive triangle fan through
//! [`Batcher::draw_light_mesh`].

use std::fmt;

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Component;
use glam::Vec2;
use log::warn;

use crate::components::boxcollider::{ALL_LAYERS, BoxCollider};
use crate::components::renderable::{RenderTransform, Renderable};
use crate::geometry::{Rect, calculate_bounds};
use crate::resources::batcher::Batcher;
use crate::resources::debugmode::DebugMode;

/// Most colliders considered per light per frame.
pub const MAX_OCCLUDERS: usize = 10;

const INITIAL_TRIANGLES: usize = 20;

/// Most encounter points a mesh keeps; every index must fit in a `u16`.
pub const MAX_ENCOUNTERS: usize = u16::MAX as usize - 1;

/// Computes the polygon visible from a point inside a circle.
pub trait VisibilityComputer: Send + Sync {
    fn begin(&mut self, origin: Vec2, radius: f32);

    /// Adds the square enclosing the light circle as a boundary.
    fn load_rectangle_boundaries(&mut self);

    fn add_occluder(&mut self, bounds: Rect);

    /// Visible polygon points, in fan order.
    fn end(&mut self) -> Vec<Vec2>;
}

/// Triangle fan around the light. Vertex 0 is the light center.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightMesh {
    pub vertices: Vec<Vec2>,
    pub indices: Vec<u16>,
}

impl LightMesh {
    fn new() -> Self {
        let mut mesh = Self::default();
        mesh.compute_triangle_indices(INITIAL_TRIANGLES);
        mesh
    }

    fn compute_triangle_indices(&mut self, total: usize) {
        self.indices.clear();
        for i in (0..total.min(MAX_ENCOUNTERS)).step_by(2) {
            self.indices
                .extend_from_slice(&[0, (i + 2) as u16, (i + 1) as u16]);
        }
    }

    /// Rebuilds the vertices from the encounter points, growing the index
    /// list when it has fewer triangles than encounters.
    pub fn rebuild(&mut self, center: Vec2, encounters: &[Vec2]) {
        let encounters = if encounters.len() > MAX_ENCOUNTERS {
            warn!(
                "Light mesh has {} encounter points, keeping {}",
                encounters.len(),
                MAX_ENCOUNTERS
            );
            &encounters[..MAX_ENCOUNTERS]
        } else {
            encounters
        };
        self.vertices.clear();
        self.vertices.push(center);
        self.vertices.extend_from_slice(encounters);
        if encounters.len() > self.indices.len() / 3 {
            self.compute_triangle_indices(encounters.len());
        }
    }

    pub fn primitive_count(&self) -> usize {
        self.vertices.len() / 2
    }
}

#[derive(Component)]
pub struct PolyLight {
    radius: f32,
    /// 0 is off, 1 is full brightness.
    pub power: f32,
    /// Layer mask of the colliders that cast shadows.
    pub collides_with_layers: u32,
    visibility: Box<dyn VisibilityComputer>,
    mesh: LightMesh,
}

impl fmt::Debug for PolyLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolyLight")
            .field("radius", &self.radius)
            .field("power", &self.power)
            .field("collides_with_layers", &self.collides_with_layers)
            .field("mesh", &self.mesh)
            .finish()
    }
}

impl PolyLight {
    pub fn new(radius: f32, visibility: Box<dyn VisibilityComputer>) -> Self {
        Self {
            radius,
            power: 1.0,
            collides_with_layers: ALL_LAYERS,
            visibility,
            mesh: LightMesh::new(),
        }
    }

    pub fn with_power(mut self, power: f32) -> Self {
        self.power = power;
        self
    }

    pub fn with_layers(mut self, mask: u32) -> Self {
        self.collides_with_layers = mask;
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    pub fn mesh(&self) -> &LightMesh {
        &self.mesh
    }

    /// Square around the light, unaffected by scale and rotation.
    pub fn bounds(&self, transform: &RenderTransform, local_offset: Vec2) -> Rect {
        calculate_bounds(
            transform.position,
            local_offset,
            Vec2::splat(self.radius),
            Vec2::ONE,
            0.0,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    /// First [`MAX_OCCLUDERS`] colliders in the layer mask that overlap the
    /// light circle, as `(bounds, is_trigger)`.
    pub fn gather_occluders<'a>(
        &self,
        origin: Vec2,
        colliders: impl IntoIterator<Item = (Vec2, &'a BoxCollider)>,
    ) -> ArrayVec<(Rect, bool), MAX_OCCLUDERS> {
        let mut cache = ArrayVec::new();
        for (position, collider) in colliders {
            if !collider.in_layers(self.collides_with_layers) {
                continue;
            }
            let bounds = collider.bounds(position);
            if !bounds.overlaps_circle(origin, self.radius) {
                continue;
            }
            if cache.try_push((bounds, collider.is_trigger)).is_err() {
                break;
            }
        }
        cache
    }

    /// Draws the lit polygon. `occluders` come from
    /// [`gather_occluders`](Self::gather_occluders); triggers are skipped.
    pub fn render(
        &mut self,
        transform: &RenderTransform,
        renderable: &Renderable,
        batcher: &mut dyn Batcher,
        occluders: &[(Rect, bool)],
    ) {
        if self.power <= 0.0 {
            return;
        }
        let origin = transform.position + renderable.local_offset();

        self.visibility.begin(origin, self.radius);
        self.visibility.load_rectangle_boundaries();
        for (bounds, _) in occluders.iter().filter(|(_, trigger)| !trigger) {
            self.visibility.add_occluder(*bounds);
        }
        let encounters = self.visibility.end();
        if encounters.is_empty() {
            return;
        }
        self.mesh.rebuild(origin, &encounters);

        let primitive_count = self.mesh.primitive_count();
        if primitive_count == 0 {
            return;
        }
        batcher.draw_light_mesh(
            &self.mesh.vertices,
            &self.mesh.indices,
            primitive_count,
            origin,
            self.radius,
            renderable.color.to_vec3() * self.power,
        );
    }

    pub fn debug_render(
        &self,
        transform: &RenderTransform,
        local_offset: Vec2,
        batcher: &mut dyn Batcher,
        debug: &DebugMode,
    ) {
        batcher.draw_pixel(
            transform.position + local_offset,
            debug.renderable_center,
            debug.pivot_size,
        );
        batcher.draw_hollow_rect(
            self.bounds(transform, local_offset),
            debug.renderable_bounds,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use glam::Vec3;

    use super::*;
    use crate::geometry::Color;
    use crate::resources::batcher::{DrawCommand, DrawList};

    /// Returns a fixed polygon and records the occluders it was given.
    struct FixedVisibility {
        points: Vec<Vec2>,
        occluders: Arc<Mutex<Vec<Rect>>>,
    }

    impl VisibilityComputer for FixedVisibility {
        fn begin(&mut self, _origin: Vec2, _radius: f32) {}

        fn load_rectangle_boundaries(&mut self) {}

        fn add_occluder(&mut self, bounds: Rect) {
            if let Ok(mut seen) = self.occluders.lock() {
                seen.push(bounds);
            }
        }

        fn end(&mut self) -> Vec<Vec2> {
            self.points.clone()
        }
    }

    fn light(points: Vec<Vec2>) -> (PolyLight, Arc<Mutex<Vec<Rect>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let vis = FixedVisibility {
            points,
            occluders: Arc::clone(&seen),
        };
        (PolyLight::new(50.0, Box::new(vis)), seen)
    }

    #[test]
    fn test_initial_indices_form_fan() {
        let mesh = LightMesh::new();
        assert_eq!(mesh.indices.len(), 30);
        assert_eq!(&mesh.indices[..6], &[0, 2, 1, 0, 4, 3]);
    }

    #[test]
    fn test_indices_grow_with_encounters() {
        let mut mesh = LightMesh::new();
        let encounters = vec![Vec2::ZERO; 30];
        mesh.rebuild(Vec2::ZERO, &encounters);
        assert_eq!(mesh.indices.len(), 45);
        assert_eq!(mesh.vertices.len(), 31);
        assert_eq!(mesh.primitive_count(), 15);
    }

    #[test]
    fn test_oversized_encounters_keep_indices_in_range() {
        let mut mesh = LightMesh::new();
        let points: Vec<Vec2> = (0..70_000).map(|i| Vec2::new(i as f32, 0.0)).collect();
        mesh.rebuild(Vec2::ZERO, &points);
        assert_eq!(mesh.vertices.len(), MAX_ENCOUNTERS + 1);
        assert!(
            mesh.indices
                .iter()
                .all(|&i| (i as usize) < mesh.vertices.len())
        );
        assert_eq!(mesh.indices.iter().copied().max(), Some(MAX_ENCOUNTERS as u16));
    }

    #[test]
    fn test_bounds_ignore_scale() {
        let (l, _) = light(vec![]);
        let mut t = RenderTransform::at(Vec2::new(100.0, 100.0));
        t.scale = Vec2::splat(3.0);
        assert_eq!(l.bounds(&t, Vec2::ZERO), Rect::new(50.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_gather_filters_by_layer_and_distance() {
        let (l, _) = light(vec![]);
        let l = l.with_layers(0b10);
        let near = BoxCollider::new(10.0, 10.0).with_physics_layer(0b10);
        let wrong_layer = BoxCollider::new(10.0, 10.0).with_physics_layer(0b01);
        let far = BoxCollider::new(10.0, 10.0).with_physics_layer(0b10);
        let cache = l.gather_occluders(
            Vec2::ZERO,
            [
                (Vec2::new(20.0, 0.0), &near),
                (Vec2::new(20.0, 0.0), &wrong_layer),
                (Vec2::new(500.0, 0.0), &far),
            ],
        );
        assert_eq!(cache.len(), 1);
        assert_eq!(cache[0].0, Rect::new(20.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_gather_caps_at_max() {
        let (l, _) = light(vec![]);
        let c = BoxCollider::new(1.0, 1.0);
        let cache = l.gather_occluders(Vec2::ZERO, (0..20).map(|_| (Vec2::ZERO, &c)));
        assert_eq!(cache.len(), MAX_OCCLUDERS);
    }

    #[test]
    fn test_render_skips_triggers_and_scales_color() {
        let (mut l, seen) = light(vec![Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)]);
        l.power = 0.5;
        let occluders = [
            (Rect::new(1.0, 1.0, 2.0, 2.0), false),
            (Rect::new(5.0, 5.0, 2.0, 2.0), true),
        ];
        let renderable = Renderable::new().with_color(Color::WHITE);
        let mut list = DrawList::new();
        l.render(&RenderTransform::at(Vec2::ONE), &renderable, &mut list, &occluders);

        assert_eq!(seen.lock().map(|s| s.len()).unwrap_or(0), 1);
        let DrawCommand::LightMesh {
            vertices,
            primitive_count,
            color,
            light_source,
            ..
        } = &list.commands[0]
        else {
            panic!("expected light mesh");
        };
        assert_eq!(vertices[0], Vec2::ONE);
        assert_eq!(*primitive_count, 1);
        assert_eq!(*light_source, Vec2::ONE);
        assert_eq!(*color, Vec3::splat(0.5));
    }

    #[test]
    fn test_render_off_or_empty_draws_nothing() {
        let (mut off, _) = light(vec![Vec2::ONE, Vec2::ONE]);
        off.power = 0.0;
        let mut list = DrawList::new();
        off.render(&RenderTransform::default(), &Renderable::new(), &mut list, &[]);
        let (mut empty, _) = light(vec![]);
        empty.render(&RenderTransform::default(), &Renderable::new(), &mut list, &[]);
        assert!(list.is_empty());
    }
}
