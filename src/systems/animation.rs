//! Animation systems.
//!
//! - [`sprite_animation`] advances every [`SpriteAnimator<K>`] by the frame
//!   delta, swapping the displayed [`Sprite`] frame, and forwards the events
//!   each animator buffered into ECS messages.
//! - [`update_animation_messages`] rotates the message buffers once per frame.
//!
//! The systems are generic over the key type; register one instance per key
//! type in use:
//!
//! ```ignore
//! init_animation_messages::<String>(&mut world);
//! schedule.add_systems(
//!     (sprite_animation::<String>, update_animation_messages::<String>).chain(),
//! );
//! ```
//!
//! # Related
//!
//! - [`crate::components::animation::SpriteAnimator`] – per-entity playback state
//! - [`crate::resources::animationstore::AnimationStore`] – shared clip definitions
//! - [`crate::events::animation`] – the messages written here

use bevy_ecs::prelude::*;

use crate::components::animation::{AnimationKey, AnimatorEvent, SpriteAnimator};
use crate::components::sprite::Sprite;
use crate::events::animation::{AnimationCompleted, AnimationFrameChanged};
use crate::resources::worldtime::WorldTime;

/// Registers the message resources [`sprite_animation::<K>`] writes to.
pub fn init_animation_messages<K: AnimationKey>(world: &mut World) {
    world.init_resource::<Messages<AnimationCompleted<K>>>();
    world.init_resource::<Messages<AnimationFrameChanged<K>>>();
}

/// Advance animation playback and update the sprite frame.
///
/// Contract
/// - Reads [`WorldTime`] for the scaled delta.
/// - Skips paused and stopped animators without touching them.
/// - Marks the [`Sprite`] changed only when the displayed frame changed or a
///   clip completed, so bounds are not recomputed for idle animators.
/// - Writes [`AnimationFrameChanged`] and [`AnimationCompleted`] in the order
///   the animator produced them.
pub fn sprite_animation<K: AnimationKey>(
    time: Res<WorldTime>,
    mut query: Query<(Entity, &mut SpriteAnimator<K>, &mut Sprite)>,
    mut completed: MessageWriter<AnimationCompleted<K>>,
    mut frame_changed: MessageWriter<AnimationFrameChanged<K>>,
) {
    for (entity, mut animator, mut sprite) in query.iter_mut() {
        if !animator.is_playing() {
            continue;
        }

        animator.update(time.delta, sprite.bypass_change_detection());

        let mut touched = false;
        for event in animator.drain_events() {
            touched = true;
            match event {
                AnimatorEvent::FrameChanged { key, frame } => {
                    frame_changed.write(AnimationFrameChanged { entity, key, frame });
                }
                AnimatorEvent::Completed { key } => {
                    completed.write(AnimationCompleted { entity, key });
                }
            }
        }
        if touched {
            sprite.set_changed();
        }
    }
}

/// Advance the ECS message queues for `K`-keyed animation messages.
pub fn update_animation_messages<K: AnimationKey>(
    mut completed: ResMut<Messages<AnimationCompleted<K>>>,
    mut frame_changed: ResMut<Messages<AnimationFrameChanged<K>>>,
) {
    completed.update();
    frame_changed.update();
}
