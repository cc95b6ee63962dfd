use bevy_ecs::prelude::Component;

/// Entity rotation in degrees, clockwise in screen space.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
}

impl Rotation {
    pub fn new(degrees: f32) -> Self {
        Self { degrees }
    }

    pub fn radians(&self) -> f32 {
        self.degrees.to_radians()
    }
}
