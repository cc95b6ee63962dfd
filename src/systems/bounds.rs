//! Renderable bounds upkeep.
//!
//! - [`invalidate_renderable_bounds`] marks the cached bounds of every
//!   renderable whose transform or kind component changed this frame.
//! - [`compute_renderable_bounds`] refreshes every stale cache in one pass.
//! - [`renderable_bounds`] reads one entity's bounds, recomputing on demand.
//!
//! [`SpriteMime`] bounds follow another entity and are never served from the
//! cache.

use bevy_ecs::prelude::*;
use bevy_ecs::world::EntityRef;
use glam::Vec2;

use crate::components::lights::{AreaLight, PointLight};
use crate::components::mapposition::MapPosition;
use crate::components::nineslicesprite::NineSliceSprite;
use crate::components::polylight::PolyLight;
use crate::components::prototypesprite::PrototypeSprite;
use crate::components::renderable::{RenderTransform, Renderable};
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::sprite::Sprite;
use crate::components::spritemime::SpriteMime;
use crate::components::textsprite::TextSprite;
use crate::components::tiledmap::TiledMapComponent;
use crate::geometry::Rect;

/// Any change that moves or resizes what a renderable draws.
pub type BoundsChanged = Or<(
    Changed<MapPosition>,
    Changed<Rotation>,
    Changed<Scale>,
    Changed<Sprite>,
    Changed<NineSliceSprite>,
    Changed<PrototypeSprite>,
    Changed<TextSprite>,
    Changed<TiledMapComponent>,
    Changed<PointLight>,
    Changed<AreaLight>,
    Changed<PolyLight>,
)>;

/// Transform of an entity as drawn. Missing components mean identity.
pub fn render_transform(entity: &EntityRef) -> RenderTransform {
    let position = entity.get::<MapPosition>().copied().unwrap_or_default();
    RenderTransform::from_components(&position, entity.get::<Rotation>(), entity.get::<Scale>())
}

/// Marks bounds dirty after transform or kind changes.
pub fn invalidate_renderable_bounds(
    changed: Query<Entity, (With<Renderable>, BoundsChanged)>,
    mut renderables: Query<&mut Renderable>,
    mut removed_rotation: RemovedComponents<Rotation>,
    mut removed_scale: RemovedComponents<Scale>,
) {
    let removed = removed_rotation.read().chain(removed_scale.read());
    for entity in changed.iter().chain(removed) {
        if let Ok(mut renderable) = renderables.get_mut(entity) {
            renderable.bypass_change_detection().mark_bounds_dirty();
        }
    }
}

/// Bounds from the entity's kind component, ignoring the cache.
pub fn measure_bounds(world: &World, entity: Entity) -> Option<Rect> {
    let e = world.get_entity(entity).ok()?;
    let offset = e.get::<Renderable>()?.local_offset();
    let transform = render_transform(&e);

    if let Some(mime) = e.get::<SpriteMime>() {
        let target = world.get_entity(mime.resolve(entity)).ok()?;
        let target_offset = target
            .get::<Renderable>()
            .map_or(Vec2::ZERO, Renderable::local_offset);
        return Some(target.get::<Sprite>()?.bounds(&render_transform(&target), target_offset));
    }
    if let Some(sprite) = e.get::<Sprite>() {
        return Some(sprite.bounds(&transform, offset));
    }
    if let Some(nine) = e.get::<NineSliceSprite>() {
        return Some(nine.bounds(&transform, offset));
    }
    if let Some(proto) = e.get::<PrototypeSprite>() {
        return Some(proto.bounds(&transform, offset));
    }
    if let Some(text) = e.get::<TextSprite>() {
        return Some(text.bounds(&transform, offset));
    }
    if let Some(map) = e.get::<TiledMapComponent>() {
        return Some(map.bounds(&transform, offset));
    }
    if let Some(light) = e.get::<PointLight>() {
        return Some(light.bounds(&transform, offset));
    }
    if let Some(light) = e.get::<AreaLight>() {
        return Some(light.bounds(&transform, offset));
    }
    if let Some(light) = e.get::<PolyLight>() {
        return Some(light.bounds(&transform, offset));
    }
    None
}

/// Cached bounds of `entity`, recomputed and stored when stale.
/// `None` when the entity has no renderable or no kind component.
pub fn renderable_bounds(world: &mut World, entity: Entity) -> Option<Rect> {
    let cached = world.get::<Renderable>(entity)?.bounds_cache().get();
    let is_mime = world.get::<SpriteMime>(entity).is_some();
    if let Some(bounds) = cached.filter(|_| !is_mime) {
        return Some(bounds);
    }
    let bounds = measure_bounds(world, entity)?;
    if let Some(mut renderable) = world.get_mut::<Renderable>(entity) {
        renderable
            .bypass_change_detection()
            .bounds_cache_mut()
            .store(bounds);
    }
    Some(bounds)
}

/// Refreshes every stale bounds cache.
pub fn compute_renderable_bounds(world: &mut World) {
    let mut query = world.query::<(Entity, &Renderable)>();
    let stale: Vec<Entity> = query
        .iter(world)
        .filter(|(_, r)| r.bounds_cache().is_dirty())
        .map(|(e, _)| e)
        .collect();
    for entity in stale {
        renderable_bounds(world, entity);
    }
}
