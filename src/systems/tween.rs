//! Color tween system.
//!
//! [`tween_color_system`] advances every playing [`TweenColor`] by the world
//! delta time and writes the eased color into the entity's [`Renderable`].

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::renderable::Renderable;
use crate::components::tween::{Easing, LoopMode, TweenColor};
use crate::resources::worldtime::WorldTime;

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub(crate) fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
    }
}

/// Advance tween time and handle looping/completion.
pub(crate) fn advance(tw: &mut TweenColor, dt: f32) {
    let dir = if tw.forward { 1.0 } else { -1.0 };
    tw.time += dt * dir;

    let finished_forward = tw.forward && tw.time >= tw.duration;
    let finished_backward = !tw.forward && tw.time <= 0.0;
    if !(finished_forward || finished_backward) {
        return;
    }
    match tw.loop_mode {
        LoopMode::Once => {
            tw.playing = false;
            tw.time = tw.time.clamp(0.0, tw.duration);
        }
        LoopMode::Loop => {
            tw.time = if finished_forward { 0.0 } else { tw.duration };
        }
        LoopMode::PingPong => {
            tw.forward = !tw.forward;
            tw.time = tw.time.clamp(0.0, tw.duration);
        }
    }
}

/// Fade renderable colors based on [`TweenColor`] components.
pub fn tween_color_system(
    world_time: Res<WorldTime>,
    mut query: Query<(&mut Renderable, &mut TweenColor)>,
) {
    let dt = world_time.delta.max(0.0);
    for (mut renderable, mut tw) in query.iter_mut() {
        if !tw.playing {
            continue;
        }
        advance(&mut tw, dt);
        let t = ease(tw.easing, tw.progress());
        renderable.color = tw.from.lerp(tw.to, t);
        if !tw.playing {
            trace!("Color tween finished at {:?}", renderable.color);
        }
    }
}
