//! Tile map collider upkeep.
//!
//! A [`TiledMapComponent`] with a collision layer and
//! `should_create_colliders` set owns one collider entity per collision
//! rectangle. They are spawned when the component is added, rebuilt when the
//! map entity moves or the component changes, and despawned when the
//! component is removed (or its entity despawned).

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::renderable::Renderable;
use crate::components::tiledmap::{TileMapCollider, TiledMapComponent};

pub fn sync_tiled_map_colliders(
    mut commands: Commands,
    maps: Query<
        (
            Entity,
            &TiledMapComponent,
            Option<&MapPosition>,
            Option<&Renderable>,
        ),
        Or<(Changed<TiledMapComponent>, Changed<MapPosition>)>,
    >,
    colliders: Query<(Entity, &TileMapCollider)>,
    mut removed: RemovedComponents<TiledMapComponent>,
) {
    let mut despawn_for = |map: Entity, commands: &mut Commands| {
        for (collider, owner) in colliders.iter() {
            if owner.map == map {
                commands.entity(collider).despawn();
            }
        }
    };

    for map in removed.read() {
        debug!("Tile map removed from {:?}, dropping its colliders", map);
        despawn_for(map, &mut commands);
    }

    for (entity, tiled, position, renderable) in maps.iter() {
        despawn_for(entity, &mut commands);
        if !tiled.should_create_colliders {
            continue;
        }
        let origin = position.map_or(Vec2::ZERO, |p| p.pos)
            + renderable.map_or(Vec2::ZERO, Renderable::local_offset);
        let rects = tiled.collision_rects();
        debug!("Building {} tile colliders for {:?}", rects.len(), entity);
        for rect in rects {
            commands.spawn((
                TileMapCollider { map: entity },
                MapPosition::from_vec(origin + rect.location()),
                BoxCollider::new(rect.width, rect.height).with_physics_layer(tiled.physics_layer),
            ));
        }
    }
}
