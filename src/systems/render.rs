//! Render passes.
//!
//! Rendering runs outside the schedule: the host calls [`render_all`] (or the
//! two halves around its post processing, see [`render_renderers`]) with its
//! [`Batcher`] once per frame. Each [`Renderer`] in the [`Renderers`]
//! resource gets one [`render_pass`]:
//!
//! 1. `begin` with the renderer's camera (or the shared [`Camera2D`]).
//! 2. Renderables the renderer accepts are sorted by
//!    [`Renderable::draw_order`], ties broken by entity.
//! 3. Each one is culled against the camera bounds; the result is recorded
//!    with [`Renderable::set_visible`].
//! 4. The material is switched when it differs from the previous draw, then
//!    the kind component draws itself.
//! 5. With [`DebugMode`] present and `should_debug_render` set, the visible
//!    renderables draw their debug overlay.
//! 6. `end`.

use bevy_ecs::prelude::*;
use log::warn;

use crate::components::boxcollider::BoxCollider;
use crate::components::lights::{AreaLight, PointLight};
use crate::components::mapposition::MapPosition;
use crate::components::nineslicesprite::NineSliceSprite;
use crate::components::polylight::PolyLight;
use crate::components::prototypesprite::PrototypeSprite;
use crate::components::renderable::{MaterialId, Renderable};
use crate::components::sprite::Sprite;
use crate::components::spritemime::SpriteMime;
use crate::components::textsprite::TextSprite;
use crate::components::tiledmap::TiledMapComponent;
use crate::geometry::Rect;
use crate::resources::batcher::Batcher;
use crate::resources::camera2d::Camera2D;
use crate::resources::debugmode::DebugMode;
use crate::resources::renderers::{Renderer, Renderers};
use crate::systems::bounds::{render_transform, renderable_bounds};

/// Runs every renderer: first those rendering before post processing, then
/// the rest.
pub fn render_all(world: &mut World, batcher: &mut dyn Batcher) {
    render_renderers(world, batcher, false);
    render_renderers(world, batcher, true);
}

/// Runs the renderers whose `wants_to_render_after_post_processors` equals
/// `after_post_processors`. Without a [`Renderers`] resource a single default
/// renderer is used.
pub fn render_renderers(world: &mut World, batcher: &mut dyn Batcher, after_post_processors: bool) {
    if !world.contains_resource::<Renderers>() {
        if !after_post_processors {
            render_pass(world, &Renderer::default_renderer(), batcher);
        }
        return;
    }
    world.resource_scope(|world, renderers: Mut<Renderers>| {
        for renderer in renderers
            .iter()
            .filter(|r| r.wants_to_render_after_post_processors == after_post_processors)
        {
            render_pass(world, renderer, batcher);
        }
    });
}

/// Draws everything `renderer` accepts. See the module docs for the steps.
pub fn render_pass(world: &mut World, renderer: &Renderer, batcher: &mut dyn Batcher) {
    let camera = renderer
        .camera
        .or_else(|| world.get_resource::<Camera2D>().copied())
        .unwrap_or_default();
    let camera_bounds = camera.bounds();

    let mut queue: Vec<(Entity, Renderable)> = {
        let mut q = world.query::<(Entity, &Renderable)>();
        q.iter(world)
            .filter(|(_, r)| r.enabled && renderer.kind.includes_layer(r.render_layer()))
            .map(|(e, r)| (e, r.clone()))
            .collect()
    };
    queue.sort_by(|(ea, a), (eb, b)| a.draw_order(b).then_with(|| ea.cmp(eb)));

    batcher.begin(&camera);
    let mut current_material: Option<MaterialId> = None;
    let mut visible = Vec::with_capacity(queue.len());

    for (entity, renderable) in queue {
        let Some(bounds) = renderable_bounds(world, entity) else {
            continue;
        };
        let is_visible = bounds.intersects(&camera_bounds);
        if let Some(mut r) = world.get_mut::<Renderable>(entity) {
            r.bypass_change_detection().set_visible(is_visible);
        }
        if !is_visible {
            continue;
        }
        if renderable.material != current_material {
            batcher.set_material(renderable.material);
            current_material = renderable.material;
        }
        render_entity(world, entity, &renderable, camera_bounds, batcher);
        visible.push((entity, renderable, bounds));
    }

    if renderer.should_debug_render {
        if let Some(debug) = world.get_resource::<DebugMode>().copied() {
            if current_material.is_some() {
                batcher.set_material(None);
            }
            for (entity, renderable, bounds) in &visible {
                debug_render_entity(world, *entity, renderable, *bounds, &debug, batcher);
            }
        }
    }
    batcher.end();
}

fn render_entity(
    world: &mut World,
    entity: Entity,
    renderable: &Renderable,
    camera_bounds: Rect,
    batcher: &mut dyn Batcher,
) {
    let Ok(e) = world.get_entity(entity) else {
        return;
    };
    let transform = render_transform(&e);

    if let Some(mime) = e.get::<SpriteMime>() {
        match world.get::<Sprite>(mime.resolve(entity)) {
            Some(sprite) => mime.render(sprite, &transform, renderable, batcher),
            None => warn!("SpriteMime on {:?} has no sprite to mimic", entity),
        }
        return;
    }
    if let Some(sprite) = e.get::<Sprite>() {
        sprite.render(&transform, renderable, batcher);
        return;
    }
    if let Some(proto) = e.get::<PrototypeSprite>() {
        proto.render(&transform, renderable, batcher);
        return;
    }
    if let Some(text) = e.get::<TextSprite>() {
        text.render(&transform, renderable, batcher);
        return;
    }
    if let Some(map) = e.get::<TiledMapComponent>() {
        map.render(&transform, renderable, batcher, camera_bounds);
        return;
    }
    if e.contains::<NineSliceSprite>() {
        if let Some(mut nine) = world.get_mut::<NineSliceSprite>(entity) {
            nine.bypass_change_detection()
                .render(&transform, renderable, batcher);
        }
        return;
    }
    if e.contains::<PolyLight>() {
        let origin = transform.position + renderable.local_offset();
        let colliders: Vec<(glam::Vec2, BoxCollider)> = {
            let mut q = world.query::<(&MapPosition, &BoxCollider)>();
            q.iter(world).map(|(p, c)| (p.pos, *c)).collect()
        };
        if let Some(mut light) = world.get_mut::<PolyLight>(entity) {
            let occluders =
                light.gather_occluders(origin, colliders.iter().map(|(p, c)| (*p, c)));
            light
                .bypass_change_detection()
                .render(&transform, renderable, batcher, &occluders);
        }
    }
    // point and area lights are drawn by the deferred lighting pass
}

fn debug_render_entity(
    world: &World,
    entity: Entity,
    renderable: &Renderable,
    bounds: Rect,
    debug: &DebugMode,
    batcher: &mut dyn Batcher,
) {
    let Ok(e) = world.get_entity(entity) else {
        return;
    };
    let transform = render_transform(&e);
    let offset = renderable.local_offset();

    if let Some(light) = e.get::<PointLight>() {
        light.debug_render(&transform, offset, batcher);
    } else if let Some(light) = e.get::<AreaLight>() {
        light.debug_render(&transform, offset, batcher);
    } else if let Some(light) = e.get::<PolyLight>() {
        light.debug_render(&transform, offset, batcher, debug);
    } else if let Some(map) = e.get::<TiledMapComponent>() {
        map.debug_render(&transform, renderable, batcher, debug);
    } else {
        match e.get::<BoxCollider>() {
            Some(collider) => {
                batcher.draw_hollow_rect(collider.bounds(transform.position), debug.collider_edge)
            }
            None => batcher.draw_hollow_rect(bounds, debug.renderable_bounds),
        }
        batcher.draw_pixel(
            transform.position + offset,
            debug.renderable_center,
            debug.pivot_size,
        );
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::components::sprite::Subtexture;
    use crate::resources::batcher::{DrawCommand, DrawList};
    use crate::resources::renderers::RendererKind;

    fn spawn_sprite(world: &mut World, key: &str, pos: Vec2, renderable: Renderable) -> Entity {
        world
            .spawn((
                MapPosition::from_vec(pos),
                renderable,
                Sprite::new(Subtexture::new(key, Rect::new(0.0, 0.0, 16.0, 16.0))),
            ))
            .id()
    }

    fn world_with_camera() -> World {
        let mut world = World::new();
        world.insert_resource(Camera2D::screen_space(320.0, 180.0));
        world
    }

    #[test]
    fn test_sorted_by_layer_then_depth() {
        let mut world = world_with_camera();
        spawn_sprite(&mut world, "front", Vec2::new(50.0, 50.0), Renderable::new().with_render_layer(0));
        spawn_sprite(&mut world, "back", Vec2::new(50.0, 50.0), Renderable::new().with_render_layer(3));
        spawn_sprite(
            &mut world,
            "middle",
            Vec2::new(50.0, 50.0),
            Renderable::new().with_render_layer(0).with_layer_depth(0.5),
        );
        let mut list = DrawList::new();
        render_pass(&mut world, &Renderer::default_renderer(), &mut list);
        assert_eq!(list.texture_keys(), vec!["back", "middle", "front"]);
        assert!(matches!(list.commands.first(), Some(DrawCommand::Begin { .. })));
        assert!(matches!(list.commands.last(), Some(DrawCommand::End)));
    }

    #[test]
    fn test_culling_updates_visibility() {
        let mut world = world_with_camera();
        let on = spawn_sprite(&mut world, "on", Vec2::new(50.0, 50.0), Renderable::new());
        let off = spawn_sprite(&mut world, "off", Vec2::new(1000.0, 50.0), Renderable::new());
        let mut list = DrawList::new();
        render_pass(&mut world, &Renderer::default_renderer(), &mut list);
        assert_eq!(list.texture_keys(), vec!["on"]);
        assert!(world.get::<Renderable>(on).unwrap().is_visible());
        assert!(!world.get::<Renderable>(off).unwrap().is_visible());
    }

    #[test]
    fn test_disabled_and_excluded_layers_skipped() {
        let mut world = world_with_camera();
        let mut disabled = Renderable::new();
        disabled.enabled = false;
        spawn_sprite(&mut world, "disabled", Vec2::new(50.0, 50.0), disabled);
        spawn_sprite(&mut world, "ui", Vec2::new(50.0, 50.0), Renderable::new().with_render_layer(9));
        spawn_sprite(&mut world, "world", Vec2::new(50.0, 50.0), Renderable::new());

        let mut list = DrawList::new();
        render_pass(&mut world, &Renderer::render_layer_exclude(0, vec![9]), &mut list);
        assert_eq!(list.texture_keys(), vec!["world"]);

        list.clear();
        let screen = Renderer::screen_space(1, vec![9], 320.0, 180.0);
        assert_eq!(screen.kind, RendererKind::ScreenSpace(vec![9]));
        render_pass(&mut world, &screen, &mut list);
        assert_eq!(list.texture_keys(), vec!["ui"]);
    }

    #[test]
    fn test_material_switches_only_on_change() {
        let mut world = world_with_camera();
        let mat = MaterialId(7);
        spawn_sprite(&mut world, "a", Vec2::new(50.0, 50.0), Renderable::new().with_material(mat));
        spawn_sprite(&mut world, "b", Vec2::new(60.0, 50.0), Renderable::new().with_material(mat));
        spawn_sprite(&mut world, "c", Vec2::new(70.0, 50.0), Renderable::new());
        let mut list = DrawList::new();
        render_pass(&mut world, &Renderer::default_renderer(), &mut list);
        let switches: Vec<_> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetMaterial(m) => Some(*m),
                _ => None,
            })
            .collect();
        assert_eq!(switches, vec![Some(mat), None]);
    }

    #[test]
    fn test_debug_pass_needs_resource_and_flag() {
        let mut world = world_with_camera();
        spawn_sprite(&mut world, "a", Vec2::new(50.0, 50.0), Renderable::new());
        let mut list = DrawList::new();
        render_pass(&mut world, &Renderer::default_renderer(), &mut list);
        assert_eq!(list.draws().count(), 1);

        world.insert_resource(DebugMode::default());
        list.clear();
        render_pass(&mut world, &Renderer::default_renderer(), &mut list);
        let draws: Vec<_> = list.draws().collect();
        assert_eq!(draws.len(), 3);
        assert!(matches!(
            draws[1],
            DrawCommand::HollowRect { rect, .. } if *rect == Rect::new(42.0, 42.0, 16.0, 16.0)
        ));
        assert!(matches!(draws[2], DrawCommand::Pixel { .. }));

        list.clear();
        render_pass(
            &mut world,
            &Renderer::default_renderer().with_debug_render(false),
            &mut list,
        );
        assert_eq!(list.draws().count(), 1);
    }

    #[test]
    fn test_render_all_orders_post_processing_last() {
        let mut world = world_with_camera();
        spawn_sprite(&mut world, "hud", Vec2::new(10.0, 10.0), Renderable::new().with_render_layer(5));
        spawn_sprite(&mut world, "scene", Vec2::new(50.0, 50.0), Renderable::new());
        world.insert_resource(
            Renderers::new()
                .with(Renderer::screen_space(-10, vec![5], 320.0, 180.0))
                .with(Renderer::render_layer_exclude(0, vec![5])),
        );
        let mut list = DrawList::new();
        render_all(&mut world, &mut list);
        assert_eq!(list.texture_keys(), vec!["scene", "hud"]);
    }

    #[test]
    fn test_missing_renderers_uses_default() {
        let mut world = world_with_camera();
        spawn_sprite(&mut world, "a", Vec2::new(50.0, 50.0), Renderable::new());
        let mut list = DrawList::new();
        render_all(&mut world, &mut list);
        assert_eq!(list.texture_keys(), vec!["a"]);
    }
}
