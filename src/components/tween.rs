//! Renderable color tween.
//!
//! [`TweenColor`] fades an entity's [`Renderable`](super::renderable::Renderable)
//! tint between two colors, shaped by an [`Easing`] curve and repeated per
//! its [`LoopMode`]. See [`crate::systems::tween`] for the update system.

use bevy_ecs::prelude::Component;

use crate::geometry::Color;

/// Determines how a tween behaves when it reaches the end.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopMode {
    /// Play once and stop.
    Once,
    /// Restart from the beginning when finished.
    Loop,
    /// Reverse direction when reaching either end.
    PingPong,
}

/// Easing curves applied to the normalized tween time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
}

/// Animates [`Renderable::color`](super::renderable::Renderable::color)
/// from `from` to `to` over `duration` seconds.
#[derive(Component, Clone, Debug)]
pub struct TweenColor {
    pub from: Color,
    pub to: Color,
    /// Seconds.
    pub duration: f32,
    pub easing: Easing,
    pub loop_mode: LoopMode,
    pub playing: bool,
    /// Current time within the tween.
    pub time: f32,
    /// Direction of playback (true = forward).
    pub forward: bool,
}

impl TweenColor {
    pub fn new(from: Color, to: Color, duration: f32) -> Self {
        TweenColor {
            from,
            to,
            duration,
            easing: Easing::Linear,
            loop_mode: LoopMode::Once,
            playing: true,
            time: 0.0,
            forward: true,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    /// Starts at `to` and plays towards `from`.
    pub fn with_backwards(mut self) -> Self {
        self.time = self.duration;
        self.forward = false;
        self
    }

    /// Normalized progress, 0 at `from` and 1 at `to`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.time / self.duration
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_color_new() {
        let tw = TweenColor::new(Color::WHITE, Color::TRANSPARENT, 2.0);
        assert_eq!(tw.from, Color::WHITE);
        assert_eq!(tw.to, Color::TRANSPARENT);
        assert_eq!(tw.easing, Easing::Linear);
        assert_eq!(tw.loop_mode, LoopMode::Once);
        assert!(tw.playing);
        assert!(tw.forward);
        assert_eq!(tw.progress(), 0.0);
    }

    #[test]
    fn test_tween_color_builder_chaining() {
        let tw = TweenColor::new(Color::RED, Color::YELLOW, 4.0)
            .with_easing(Easing::CubicOut)
            .with_loop_mode(LoopMode::PingPong)
            .with_backwards();
        assert_eq!(tw.easing, Easing::CubicOut);
        assert_eq!(tw.loop_mode, LoopMode::PingPong);
        assert_eq!(tw.time, 4.0);
        assert!(!tw.forward);
        assert_eq!(tw.progress(), 1.0);
    }

    #[test]
    fn test_zero_duration_is_complete() {
        assert_eq!(TweenColor::new(Color::RED, Color::BLACK, 0.0).progress(), 1.0);
    }
}
