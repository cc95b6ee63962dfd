use bevy_ecs::prelude::{Component, Entity};

use crate::components::renderable::{RenderTransform, Renderable};
use crate::components::sprite::Sprite;
use crate::resources::batcher::{Batcher, Placement};

/// Draws whatever frame another [`Sprite`] currently shows, using this
/// entity's transform, offset, color and depth. Handy for drop shadows
/// (offset + dark tint) and silhouettes (a stencil material).
///
/// With no target the [`Sprite`] on the mime's own entity is mimicked. The
/// bounds are the mimicked sprite's bounds.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteMime {
    pub target: Option<Entity>,
}

impl SpriteMime {
    pub fn new(target: Entity) -> Self {
        Self {
            target: Some(target),
        }
    }

    /// Entity whose sprite is mimicked, given the entity the mime lives on.
    pub fn resolve(&self, own: Entity) -> Entity {
        self.target.unwrap_or(own)
    }

    pub fn render(
        &self,
        mimicked: &Sprite,
        transform: &RenderTransform,
        renderable: &Renderable,
        batcher: &mut dyn Batcher,
    ) {
        let Some(sub) = mimicked.subtexture() else {
            return;
        };
        let placement = Placement {
            flip_x: mimicked.flip_x,
            flip_y: mimicked.flip_y,
            ..transform.placement(
                renderable.local_offset(),
                mimicked.origin(),
                renderable.layer_depth(),
            )
        };
        batcher.draw(sub, renderable.color, placement);
    }
}
