//! Animation playback messages.
//!
//! [`sprite_animation`](crate::systems::animation::sprite_animation) drains the
//! events each [`SpriteAnimator`](crate::components::animation::SpriteAnimator)
//! buffered during its tick and writes them as ECS messages, tagged with the
//! entity that produced them. Systems read them with a `MessageReader`.
//!
//! Per-animator closures registered with `on_completed`/`on_frame_changed`
//! run first, inside the tick itself.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;

use crate::components::animation::AnimationKey;

/// A non-looping clip finished, or a reversed clip ran back to its start.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct AnimationCompleted<K: AnimationKey> {
    pub entity: Entity,
    pub key: K,
}

/// The displayed frame of the active clip changed.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct AnimationFrameChanged<K: AnimationKey> {
    pub entity: Entity,
    pub key: K,
    pub frame: usize,
}
